use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// English contractions and their expansions. Keys are lowercase since the
/// normalizer lowercases before expanding.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "are not"),
    ("aren't", "are not"),
    ("can't", "cannot"),
    ("can't've", "cannot have"),
    ("could've", "could have"),
    ("couldn't", "could not"),
    ("couldn't've", "could not have"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("hadn't", "had not"),
    ("hadn't've", "had not have"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("he'd", "he would"),
    ("he'll", "he will"),
    ("he's", "he is"),
    ("here's", "here is"),
    ("how'd", "how did"),
    ("how'll", "how will"),
    ("how's", "how is"),
    ("i'd", "i would"),
    ("i'd've", "i would have"),
    ("i'll", "i will"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("isn't", "is not"),
    ("it'd", "it would"),
    ("it'll", "it will"),
    ("it's", "it is"),
    ("let's", "let us"),
    ("ma'am", "madam"),
    ("mightn't", "might not"),
    ("might've", "might have"),
    ("mustn't", "must not"),
    ("must've", "must have"),
    ("needn't", "need not"),
    ("o'clock", "of the clock"),
    ("shan't", "shall not"),
    ("she'd", "she would"),
    ("she'll", "she will"),
    ("she's", "she is"),
    ("should've", "should have"),
    ("shouldn't", "should not"),
    ("shouldn't've", "should not have"),
    ("that'd", "that would"),
    ("that's", "that is"),
    ("there'd", "there would"),
    ("there's", "there is"),
    ("they'd", "they would"),
    ("they'll", "they will"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("wasn't", "was not"),
    ("we'd", "we would"),
    ("we'll", "we will"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("weren't", "were not"),
    ("what'll", "what will"),
    ("what're", "what are"),
    ("what's", "what is"),
    ("what've", "what have"),
    ("when's", "when is"),
    ("where'd", "where did"),
    ("where's", "where is"),
    ("where've", "where have"),
    ("who'll", "who will"),
    ("who's", "who is"),
    ("who've", "who have"),
    ("why's", "why is"),
    ("won't", "will not"),
    ("would've", "would have"),
    ("wouldn't", "would not"),
    ("y'all", "you all"),
    ("you'd", "you would"),
    ("you'll", "you will"),
    ("you're", "you are"),
    ("you've", "you have"),
];

static EXPANSIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| CONTRACTIONS.iter().copied().collect());

static CONTRACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // Longest first so "can't've" wins over "can't" in the alternation.
    let mut keys: Vec<&str> = CONTRACTIONS.iter().map(|(k, _)| *k).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("contraction table is a valid pattern")
});

/// Expands contractions in already-lowercased text.
///
/// Typographic apostrophes (U+2019) are folded to `'` first so "don’t" and
/// "don't" expand the same way.
pub fn expand(text: &str) -> String {
    let folded = text.replace('\u{2019}', "'");
    CONTRACTION_REGEX
        .replace_all(&folded, |caps: &Captures| {
            let matched = &caps[0];
            EXPANSIONS.get(matched).copied().unwrap_or(matched).to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_common_contractions() {
        assert_eq!(expand("i can't sell"), "i cannot sell");
        assert_eq!(expand("it's going up, isn't it"), "it is going up, is not it");
    }

    #[test]
    fn test_prefers_longest_contraction() {
        assert_eq!(expand("could've shouldn't've"), "could have should not have");
    }

    #[test]
    fn test_folds_typographic_apostrophe() {
        assert_eq!(expand("don\u{2019}t"), "do not");
    }

    #[test]
    fn test_leaves_other_apostrophes_alone() {
        assert_eq!(expand("gme's moon"), "gme's moon");
    }
}

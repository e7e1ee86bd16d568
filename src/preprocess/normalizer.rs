use super::contractions;
use crate::data::StopWordSet;
use regex::Regex;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url pattern"));

/// Prefix the scraper injects in place of inline images and emotes.
const IMAGE_PLACEHOLDER_PREFIX: &str = "imgemotet";

/// Turns a post body into whitespace-separated, lowercase, punctuation-free
/// tokens with URLs, stop words and image placeholders removed.
///
/// The transforms run in a fixed order:
/// 1. lowercase
/// 2. contraction expansion (needs the apostrophes still present)
/// 3. URL stripping
/// 4. non-ASCII removal
/// 5. punctuation removal
/// 6. stop-word removal
/// 7. image placeholder removal
///
/// Normalizing already-normalized text returns it unchanged.
pub struct TextNormalizer<'a> {
    stop_words: &'a StopWordSet,
}

impl<'a> TextNormalizer<'a> {
    /// Creates a normalizer that filters against the given stop words.
    ///
    /// # Arguments
    /// * `stop_words`: Lowercase words to drop after punctuation removal
    pub fn new(stop_words: &'a StopWordSet) -> Self {
        Self { stop_words }
    }

    /// Normalizes an optional body; a missing body normalizes to "".
    pub fn normalize_opt(&self, body: Option<&str>) -> String {
        body.map(|b| self.normalize(b)).unwrap_or_default()
    }

    /// Normalizes one post body.
    ///
    /// # Arguments
    /// * `text`: Raw post body, any casing, may contain URLs and emoji
    ///
    /// # Returns
    /// Tokens joined by single spaces, or an empty string when nothing
    /// survives.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let expanded = contractions::expand(&lowered);
        let without_urls = URL_REGEX.replace_all(&expanded, "");

        let cleaned: String = without_urls
            .chars()
            .filter(|c| is_printable_ascii(*c) && !c.is_ascii_punctuation())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| !self.stop_words.contains(token))
            .filter(|token| !is_image_placeholder(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Printable ASCII plus any whitespace, which still separates tokens.
/// Vertical tab and form feed are controls that `is_ascii_whitespace` misses.
fn is_printable_ascii(c: char) -> bool {
    c.is_ascii() && (!c.is_ascii_control() || c.is_whitespace())
}

fn is_image_placeholder(token: &str) -> bool {
    token.starts_with(IMAGE_PLACEHOLDER_PREFIX)
}

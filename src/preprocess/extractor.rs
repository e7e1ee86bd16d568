use crate::data::TickerWhitelist;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Whole-word runs of 2-5 uppercase Latin letters.
static SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,5}\b").expect("valid symbol pattern"));

/// Finds whitelisted ticker symbols in case-preserved post text.
///
/// Extraction has to see the original casing: after normalization every word
/// is lowercase and "gme" can no longer be told apart from an ordinary word.
/// It never rejects a post; an empty result is reported as-is.
pub struct TickerExtractor<'a> {
    whitelist: &'a TickerWhitelist,
}

impl<'a> TickerExtractor<'a> {
    /// # Arguments
    /// * `whitelist`: Known symbols; candidates outside it are ignored
    pub fn new(whitelist: &'a TickerWhitelist) -> Self {
        Self { whitelist }
    }

    /// Collects every whitelisted symbol mentioned in `text`.
    ///
    /// # Arguments
    /// * `text`: Post body with its original casing
    ///
    /// # Returns
    /// Distinct uppercase symbols in sorted order; empty when none match.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        SYMBOL_REGEX
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|candidate| self.whitelist.contains(candidate))
            .map(str::to_string)
            .collect()
    }

    /// A missing body has no tickers.
    pub fn extract_opt(&self, text: Option<&str>) -> BTreeSet<String> {
        text.map(|t| self.extract(t)).unwrap_or_default()
    }
}

/// Recurring r/WallStreetBets thread templates and scraper artifacts that
/// carry no analyzable sentiment.
pub const DEFAULT_BOILERPLATE: &[&str] = &[
    "Your daily trading discussion thread.",
    "Your daily hype thread.",
    "Your weekend discussion thread.",
    "Welcome to WSB",
    "Inductions\n",
    "This is an old Yacht Club thread",
    "*Processing img",
    "You already have a bet",
];

/// Why a post was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    Boilerplate,
    SingleToken,
    TooFewTokens,
    NumericSpam,
    NoTicker,
}

/// Thresholds for the spam and noise checks.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Minimum number of tokens in the normalized text.
    pub min_tokens: usize,
    /// Posts whose numeric-token fraction is strictly above this are dropped.
    pub numeric_threshold: f64,
    /// Raw bodies containing any of these substrings are dropped.
    pub boilerplate: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_tokens: 2,
            numeric_threshold: 0.25,
            boilerplate: DEFAULT_BOILERPLATE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Pure predicates over a raw body and its normalized form.
pub struct SpamFilter<'a> {
    config: &'a FilterConfig,
}

impl<'a> SpamFilter<'a> {
    /// # Arguments
    /// * `config`: Token minimum, numeric threshold and boilerplate phrases
    pub fn new(config: &'a FilterConfig) -> Self {
        Self { config }
    }

    /// Returns the first rule the post breaks, or `None` if it passes.
    ///
    /// Rules are checked in order: boilerplate, single token, too few
    /// tokens, numeric spam.
    ///
    /// # Arguments
    /// * `raw`: Body as scraped, used for the boilerplate and whitespace checks
    /// * `normalized`: Output of the normalizer for the same body
    pub fn check(&self, raw: &str, normalized: &str) -> Option<Rejection> {
        if self.is_boilerplate(raw) {
            return Some(Rejection::Boilerplate);
        }
        if !raw.chars().any(char::is_whitespace) {
            return Some(Rejection::SingleToken);
        }

        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.len() < self.config.min_tokens {
            return Some(Rejection::TooFewTokens);
        }
        if numeric_fraction(&tokens) > self.config.numeric_threshold {
            return Some(Rejection::NumericSpam);
        }
        None
    }

    fn is_boilerplate(&self, raw: &str) -> bool {
        self.config
            .boilerplate
            .iter()
            .any(|phrase| raw.contains(phrase.as_str()))
    }
}

/// Share of tokens made only of digits; 0 for no tokens.
pub fn numeric_fraction(tokens: &[&str]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let numeric = tokens
        .iter()
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        .count();
    numeric as f64 / tokens.len() as f64
}

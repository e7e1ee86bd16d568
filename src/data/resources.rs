use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BUNDLED_STOP_WORDS: &str = include_str!("../../resources/stopwords_en.txt");

/// The set of recognized ticker symbols, stored uppercase.
///
/// Loaded once before processing starts and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TickerWhitelist {
    symbols: HashSet<String>,
}

impl TickerWhitelist {
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { symbols }
    }

    /// Loads the whitelist from a CSV with a `Symbol` column (or `Ticker`).
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has neither column, or
    /// yields no symbols at all. The pipeline cannot run without it.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open ticker whitelist '{}'", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read headers of '{}'", path.display()))?
            .clone();

        let column = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("symbol"))
            .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case("ticker")))
            .ok_or_else(|| {
                anyhow!(
                    "Ticker whitelist '{}' has no 'Symbol' or 'Ticker' column",
                    path.display()
                )
            })?;

        let mut symbols = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(line = idx + 2, error = %e, "skipping malformed whitelist row");
                    continue;
                }
            };
            if let Some(symbol) = record.get(column) {
                symbols.push(symbol.to_string());
            }
        }

        let whitelist = Self::from_symbols(symbols);
        if whitelist.is_empty() {
            return Err(anyhow!("Ticker whitelist '{}' is empty", path.display()));
        }

        tracing::info!(path = %path.display(), symbols = whitelist.len(), "loaded ticker whitelist");
        Ok(whitelist)
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, symbol: &str) -> bool {
        if symbol.bytes().any(|b| b.is_ascii_lowercase()) {
            self.symbols.contains(&symbol.to_uppercase())
        } else {
            self.symbols.contains(symbol)
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Lowercase common words removed during normalization.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// The NLTK English stop-word list bundled with the binary.
    pub fn english() -> Self {
        Self::from_words(BUNDLED_STOP_WORDS.lines())
    }

    /// Loads one word per line from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stop-word list '{}'", path.display()))?;
        let set = Self::from_words(contents.lines());
        tracing::info!(path = %path.display(), words = set.len(), "loaded stop words");
        Ok(set)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// Reads boilerplate phrases, one per line. A literal `\n` in a line stands
/// for a newline so multi-line markers such as "Inductions\n" can be written.
pub fn load_boilerplate(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read boilerplate phrases '{}'", path.display()))?;
    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.replace("\\n", "\n"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_whitelist_is_case_insensitive() {
        let whitelist = TickerWhitelist::from_symbols(["gme", " AMC ", ""]);
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.contains("GME"));
        assert!(whitelist.contains("gme"));
        assert!(whitelist.contains("Amc"));
        assert!(!whitelist.contains("TSLA"));
    }

    #[test]
    fn test_load_whitelist_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Symbol,Security Name").unwrap();
        writeln!(file, "gme,GameStop Corp.").unwrap();
        writeln!(file, "TSLA,\"Tesla, Inc.\"").unwrap();

        let whitelist = TickerWhitelist::load_csv(file.path()).unwrap();
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.contains("GME"));
        assert!(whitelist.contains("TSLA"));
    }

    #[test]
    fn test_load_whitelist_falls_back_to_ticker_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ticker,Name").unwrap();
        writeln!(file, "NVDA,Nvidia").unwrap();

        let whitelist = TickerWhitelist::load_csv(file.path()).unwrap();
        assert!(whitelist.contains("NVDA"));
    }

    #[test]
    fn test_load_whitelist_failures_are_fatal() {
        assert!(TickerWhitelist::load_csv(Path::new("/nonexistent/symbols.csv")).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Exchange").unwrap();
        writeln!(file, "GameStop,NYSE").unwrap();
        assert!(TickerWhitelist::load_csv(file.path()).is_err());

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        writeln!(empty, "Symbol").unwrap();
        assert!(TickerWhitelist::load_csv(empty.path()).is_err());
    }

    #[test]
    fn test_bundled_stop_words() {
        let stop_words = StopWordSet::english();
        assert_eq!(stop_words.len(), 179);
        assert!(stop_words.contains("the"));
        assert!(stop_words.contains("will"));
        assert!(!stop_words.contains("moon"));
    }

    #[test]
    fn test_load_stop_words() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "The\nand\n\n").unwrap();
        let stop_words = StopWordSet::load(file.path()).unwrap();
        assert_eq!(stop_words.len(), 2);
        assert!(stop_words.contains("the"));

        assert!(StopWordSet::load(Path::new("/nonexistent/stopwords.txt")).is_err());
    }

    #[test]
    fn test_load_boilerplate_decodes_newlines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Your daily hype thread.").unwrap();
        writeln!(file, "Inductions\\n").unwrap();
        let phrases = load_boilerplate(file.path()).unwrap();
        assert_eq!(phrases, vec!["Your daily hype thread.", "Inductions\n"]);
    }
}

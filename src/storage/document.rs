use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The shapes a stored or exported ticker field shows up in.
///
/// Older exports hold a single symbol, a stringified list such as
/// `"['GME', 'AMC']"`, or nothing at all. Resolve once with
/// [`TickerField::into_symbols`] at the point where data enters the program.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum TickerField {
    List(Vec<String>),
    Raw(String),
    #[default]
    Absent,
}

impl TickerField {
    /// Wraps a CSV cell; blank cells are absent.
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell.map(str::trim) {
            Some(s) if !s.is_empty() => TickerField::Raw(s.to_string()),
            _ => TickerField::Absent,
        }
    }

    /// Uppercased, deduplicated symbols in first-seen order.
    pub fn into_symbols(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TickerField::List(items) => items,
            TickerField::Raw(s) => parse_raw(&s),
            TickerField::Absent => Vec::new(),
        };

        let mut symbols: Vec<String> = Vec::with_capacity(raw.len());
        for item in raw {
            let symbol = item.trim().to_uppercase();
            if !symbol.is_empty() && !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        symbols
    }
}

fn parse_raw(s: &str) -> Vec<String> {
    let s = s.trim();
    match s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        Some(inner) => inner
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
            .collect(),
        None => vec![s.to_string()],
    }
}

/// A scored post as kept in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredDocument")]
pub struct SentimentDocument {
    pub ticker: Vec<String>,
    /// 1 positive, 0 neutral, -1 negative.
    pub sentiment: i8,
    pub date: Option<NaiveDate>,
    #[serde(rename = "preprocessedPost")]
    pub preprocessed_post: String,
}

impl SentimentDocument {
    pub fn mentions(&self, symbol: &str) -> bool {
        self.ticker.iter().any(|t| t == symbol)
    }
}

/// On-disk shape, tolerant of the legacy layouts.
#[derive(Deserialize)]
struct StoredDocument {
    #[serde(default)]
    ticker: TickerField,
    #[serde(default)]
    sentiment: i8,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default, rename = "preprocessedPost", alias = "post")]
    preprocessed_post: String,
}

impl From<StoredDocument> for SentimentDocument {
    fn from(stored: StoredDocument) -> Self {
        Self {
            ticker: stored.ticker.into_symbols(),
            sentiment: stored.sentiment,
            date: stored.date,
            preprocessed_post: stored.preprocessed_post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_field_variants() {
        assert_eq!(
            TickerField::List(vec!["gme".into(), "AMC".into(), "GME".into()]).into_symbols(),
            vec!["GME", "AMC"]
        );
        assert_eq!(
            TickerField::Raw("['GME', 'AMC']".into()).into_symbols(),
            vec!["GME", "AMC"]
        );
        assert_eq!(
            TickerField::Raw(r#"["TSLA","NVDA"]"#.into()).into_symbols(),
            vec!["TSLA", "NVDA"]
        );
        assert_eq!(TickerField::Raw("PLTR".into()).into_symbols(), vec!["PLTR"]);
        assert_eq!(TickerField::Raw("[]".into()).into_symbols(), Vec::<String>::new());
        assert_eq!(TickerField::Absent.into_symbols(), Vec::<String>::new());
    }

    #[test]
    fn test_ticker_field_from_cell() {
        assert_eq!(TickerField::from_cell(None), TickerField::Absent);
        assert_eq!(TickerField::from_cell(Some("  ")), TickerField::Absent);
        assert_eq!(
            TickerField::from_cell(Some(" GME ")),
            TickerField::Raw("GME".into())
        );
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let doc = SentimentDocument {
            ticker: vec!["GME".into()],
            sentiment: 1,
            date: NaiveDate::from_ymd_opt(2022, 1, 3),
            preprocessed_post: "gme outperform quarter".into(),
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"preprocessedPost\""));
        let back: SentimentDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_reads_legacy_documents() {
        let string_ticker: SentimentDocument =
            serde_json::from_str(r#"{"ticker": "gme", "sentiment": -1, "post": "gme dead"}"#).unwrap();
        assert_eq!(string_ticker.ticker, vec!["GME"]);
        assert_eq!(string_ticker.sentiment, -1);
        assert_eq!(string_ticker.date, None);
        assert_eq!(string_ticker.preprocessed_post, "gme dead");

        let stringified_list: SentimentDocument =
            serde_json::from_str(r#"{"ticker": "['AMC', 'BB']", "sentiment": 0}"#).unwrap();
        assert_eq!(stringified_list.ticker, vec!["AMC", "BB"]);

        let missing: SentimentDocument =
            serde_json::from_str(r#"{"ticker": null, "sentiment": 1}"#).unwrap();
        assert!(missing.ticker.is_empty());
    }
}

//! Command-line interface.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `preprocess` | Clean raw posts and tag them with tickers |
//! | `score` | Classify processed posts and store the documents |
//! | `tickers` | Export every ticker found in the store |
//! | `lookup` | Print stored documents for one ticker, or all of them |
//! | `trend` | Print mean sentiment per day, optionally for one ticker |
//!
//! Every path can also come from the environment (or a `.env` file).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "wsb_sentiment",
    version,
    about = "Ticker extraction and sentiment scoring for r/WallStreetBets posts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize raw posts, drop spam and keep posts that mention a ticker
    Preprocess(PreprocessArgs),
    /// Run sentiment classification on processed posts and store the results
    Score(ScoreArgs),
    /// Write the sorted set of tickers found in the document store
    Tickers(TickersArgs),
    /// Print stored documents that mention a ticker, or every document with --all
    Lookup(LookupArgs),
    /// Print the mean sentiment score of each day as CSV
    Trend(TrendArgs),
}

#[derive(Debug, Args)]
pub struct PreprocessArgs {
    /// CSV dump of posts with a `body` column and a `timestamp` or `date` column
    #[arg(long, env = "WSB_POSTS_CSV")]
    pub input: PathBuf,

    /// CSV of valid ticker symbols (`Symbol` column)
    #[arg(long, env = "WSB_SYMBOLS_CSV", default_value = "symbols.csv")]
    pub symbols: PathBuf,

    /// Where to write the processed posts
    #[arg(long, env = "WSB_PROCESSED_CSV", default_value = "processedWSBposts.csv")]
    pub output: PathBuf,

    /// Stop-word list, one word per line (defaults to the bundled English list)
    #[arg(long, env = "WSB_STOP_WORDS")]
    pub stop_words: Option<PathBuf>,

    /// Boilerplate phrases, one per line (defaults to the built-in list)
    #[arg(long, env = "WSB_BOILERPLATE")]
    pub boilerplate: Option<PathBuf>,

    /// Minimum number of tokens left after normalization
    #[arg(long, default_value_t = 2)]
    pub min_tokens: usize,

    /// Drop posts whose share of numeric tokens is above this
    #[arg(long, default_value_t = 0.25)]
    pub numeric_threshold: f64,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Processed posts CSV written by `preprocess`
    #[arg(long, env = "WSB_PROCESSED_CSV", default_value = "processedWSBposts.csv")]
    pub input: PathBuf,

    /// JSON-lines document store to append to
    #[arg(long, env = "WSB_STORE", default_value = "posts.jsonl")]
    pub store: PathBuf,

    /// Hugging Face API token
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// Text-classification model to query
    #[arg(long, env = "WSB_MODEL", default_value = wsb_sentiment::sentiment::DEFAULT_MODEL)]
    pub model: String,

    /// Skip posts with more tokens than the model accepts
    #[arg(long, default_value_t = wsb_sentiment::sentiment::MAX_MODEL_TOKENS)]
    pub max_tokens: usize,
}

#[derive(Debug, Args)]
pub struct TickersArgs {
    /// JSON-lines document store to read
    #[arg(long, env = "WSB_STORE", default_value = "posts.jsonl")]
    pub store: PathBuf,

    /// Where to write the ticker list
    #[arg(long, default_value = "unique_tickers.csv")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Ticker symbol, any case
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub ticker: Option<String>,

    /// Print every stored document
    #[arg(long)]
    pub all: bool,

    /// JSON-lines document store to read
    #[arg(long, env = "WSB_STORE", default_value = "posts.jsonl")]
    pub store: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct TrendArgs {
    /// Only average posts mentioning this ticker, any case
    pub ticker: Option<String>,

    /// JSON-lines document store to read
    #[arg(long, env = "WSB_STORE", default_value = "posts.jsonl")]
    pub store: PathBuf,

    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_preprocess_defaults() {
        let cli = Cli::try_parse_from(["wsb_sentiment", "preprocess", "--input", "wsb.csv"]).unwrap();
        let Command::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        assert_eq!(args.input, PathBuf::from("wsb.csv"));
        assert_eq!(args.min_tokens, 2);
        assert_eq!(args.numeric_threshold, 0.25);
        assert!(args.boilerplate.is_none());
    }

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::try_parse_from(["wsb_sentiment", "lookup", "gme", "--pretty"]).unwrap();
        let Command::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.ticker.as_deref(), Some("gme"));
        assert!(!args.all);
        assert!(args.pretty);
    }

    #[test]
    fn test_parse_lookup_all() {
        let cli = Cli::try_parse_from(["wsb_sentiment", "lookup", "--all"]).unwrap();
        let Command::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert!(args.all);
        assert!(args.ticker.is_none());

        // Exactly one of a ticker or --all.
        assert!(Cli::try_parse_from(["wsb_sentiment", "lookup"]).is_err());
        assert!(Cli::try_parse_from(["wsb_sentiment", "lookup", "gme", "--all"]).is_err());
    }

    #[test]
    fn test_parse_trend() {
        let cli = Cli::try_parse_from(["wsb_sentiment", "trend", "GME", "--store", "wsb.jsonl"]).unwrap();
        let Command::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert_eq!(args.ticker.as_deref(), Some("GME"));
        assert_eq!(args.store, PathBuf::from("wsb.jsonl"));
        assert!(args.output.is_none());

        let cli = Cli::try_parse_from(["wsb_sentiment", "trend"]).unwrap();
        let Command::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert!(args.ticker.is_none());
    }
}

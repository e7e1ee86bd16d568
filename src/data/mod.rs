pub mod ingestion;
pub mod output;
pub mod resources;

pub use ingestion::{load_processed_posts, load_raw_posts, RawPost};
pub use output::{write_daily_sentiment, write_processed_posts, write_unique_tickers};
pub use resources::{load_boilerplate, StopWordSet, TickerWhitelist};

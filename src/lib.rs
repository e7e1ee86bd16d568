//! Ticker extraction and sentiment scoring for r/WallStreetBets posts.
//!
//! - `data` - CSV ingestion, resource loading and CSV output
//! - `preprocess` - text normalization, spam filtering and ticker extraction
//! - `sentiment` - sentiment labels, the classifier interface and daily trends
//! - `storage` - scored documents and the document store

pub mod data;
pub mod preprocess;
pub mod sentiment;
pub mod storage;

pub mod document;
pub mod store;

pub use document::{SentimentDocument, TickerField};
pub use store::{DocumentSink, JsonLinesStore};

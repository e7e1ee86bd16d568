pub mod classifier;
pub mod trend;

pub use classifier::{HuggingFaceClassifier, DEFAULT_MODEL};
pub use trend::{daily_sentiment, DailySentiment};

use crate::preprocess::NormalizedPost;
use crate::storage::SentimentDocument;
use anyhow::Result;
use async_trait::async_trait;

/// Longest input, in tokens, the classifier accepts (512 minus the two
/// special tokens the model adds).
pub const MAX_MODEL_TOKENS: usize = 510;

/// Sentiment label assigned to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Maps a model label to a sentiment. Unrecognized labels count as neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    /// Numeric score stored with each document: 1, 0 or -1.
    pub fn score(self) -> i8 {
        match self {
            Sentiment::Positive => 1,
            Sentiment::Neutral => 0,
            Sentiment::Negative => -1,
        }
    }
}

/// A pretrained text classifier producing a sentiment per post.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// # Errors
    /// Returns an error when the model cannot be reached or its reply is unusable.
    async fn classify(&self, text: &str) -> Result<Sentiment>;
}

/// Counts from a scoring run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringStats {
    pub scored: usize,
    pub too_long: usize,
    pub failed: usize,
}

/// Classifies each post and builds the documents to store.
///
/// Posts longer than `max_tokens` whitespace tokens are skipped. A failed
/// classification is logged and skipped so one bad post never ends the run.
pub async fn score_posts(
    posts: &[NormalizedPost],
    classifier: &dyn SentimentClassifier,
    max_tokens: usize,
) -> (Vec<SentimentDocument>, ScoringStats) {
    let mut documents = Vec::with_capacity(posts.len());
    let mut stats = ScoringStats::default();

    for (idx, post) in posts.iter().enumerate() {
        if post.text.split_whitespace().count() > max_tokens {
            stats.too_long += 1;
            continue;
        }

        match classifier.classify(&post.text).await {
            Ok(sentiment) => {
                stats.scored += 1;
                documents.push(SentimentDocument {
                    ticker: post.tickers.iter().cloned().collect(),
                    sentiment: sentiment.score(),
                    date: Some(post.date),
                    preprocessed_post: post.text.clone(),
                });
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(post = idx, error = %e, "classification failed, skipping post");
            }
        }

        if (idx + 1) % 500 == 0 {
            tracing::info!(processed = idx + 1, total = posts.len(), "scoring progress");
        }
    }

    (documents, stats)
}

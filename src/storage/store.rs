use super::document::SentimentDocument;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Destination for scored documents.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Persists `documents` and returns how many were written.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn insert_many(&self, documents: &[SentimentDocument]) -> Result<usize>;
}

/// Document store backed by a JSON-lines file, one document per line.
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    /// Opens a store at `path`. The file is created on the first insert.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every stored document. A missing file is an empty store.
    ///
    /// Lines that fail to parse are logged and skipped.
    pub async fn load_all(&self) -> Result<Vec<SentimentDocument>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read document store '{}'", self.path.display())
                })
            }
        };

        let mut documents = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SentimentDocument>(line) {
                Ok(doc) => documents.push(doc),
                Err(e) => tracing::warn!(line = idx + 1, error = %e, "skipping unreadable document"),
            }
        }
        Ok(documents)
    }

    /// Documents mentioning `symbol`, matched after uppercasing it.
    ///
    /// # Errors
    /// Returns an error when no stored document mentions the ticker.
    pub async fn find_by_ticker(&self, symbol: &str) -> Result<Vec<SentimentDocument>> {
        let symbol = symbol.trim().to_uppercase();
        let matches: Vec<SentimentDocument> = self
            .load_all()
            .await?
            .into_iter()
            .filter(|doc| doc.mentions(&symbol))
            .collect();

        if matches.is_empty() {
            return Err(anyhow!("No posts found for ticker {}", symbol));
        }
        Ok(matches)
    }
}

#[async_trait]
impl DocumentSink for JsonLinesStore {
    async fn insert_many(&self, documents: &[SentimentDocument]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let mut buffer = Vec::new();
        for doc in documents {
            serde_json::to_writer(&mut buffer, doc)?;
            buffer.push(b'\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open document store '{}'", self.path.display()))?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(tickers: &[&str], sentiment: i8) -> SentimentDocument {
        SentimentDocument {
            ticker: tickers.iter().map(|t| t.to_string()).collect(),
            sentiment,
            date: NaiveDate::from_ymd_opt(2022, 2, 1),
            preprocessed_post: "some post".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLinesStore::new(dir.path().join("posts.jsonl"));

        assert!(store.load_all().await.unwrap().is_empty());

        let inserted = store
            .insert_many(&[doc(&["GME"], 1), doc(&["AMC", "GME"], -1)])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
        store.insert_many(&[doc(&["TSLA"], 0)]).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1], doc(&["AMC", "GME"], -1));
    }

    #[tokio::test]
    async fn test_find_by_ticker_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLinesStore::new(dir.path().join("posts.jsonl"));
        store
            .insert_many(&[doc(&["GME"], 1), doc(&["AMC", "GME"], -1), doc(&["TSLA"], 0)])
            .await
            .unwrap();

        let gme = store.find_by_ticker("gme").await.unwrap();
        assert_eq!(gme.len(), 2);

        let err = store.find_by_ticker("nvda").await.unwrap_err();
        assert!(err.to_string().contains("NVDA"));
    }

    #[tokio::test]
    async fn test_skips_unreadable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.jsonl");
        std::fs::write(
            &path,
            "{\"ticker\": [\"GME\"], \"sentiment\": 1}\nnot json\n\n{\"ticker\": \"AMC\"}\n",
        )
        .unwrap();

        let store = JsonLinesStore::new(path);
        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].ticker, vec!["AMC"]);
    }
}

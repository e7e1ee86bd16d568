use crate::preprocess::NormalizedPost;
use crate::sentiment::DailySentiment;
use anyhow::{Context, Result};
use std::path::Path;

/// Writes accepted posts as `date,post,symbols`, with `symbols` as a JSON list.
/// The header is written even when there are no posts.
pub fn write_processed_posts(path: &Path, posts: &[NormalizedPost]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    writer.write_record(["date", "post", "symbols"])?;

    for post in posts {
        let symbols: Vec<&String> = post.tickers.iter().collect();
        let date = post.date.format("%Y-%m-%d").to_string();
        let symbols = serde_json::to_string(&symbols)?;
        writer.write_record([date.as_str(), post.text.as_str(), symbols.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes one ticker per row under a `Ticker` header.
pub fn write_unique_tickers<'a, I>(path: &Path, tickers: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    writer.write_record(["Ticker"])?;

    let mut written = 0usize;
    for ticker in tickers {
        writer.write_record([ticker])?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Writes per-day sentiment as `date,mean_sentiment,posts`, oldest first.
///
/// # Arguments
/// * `writer`: Destination, typically a file or stdout
/// * `days`: Output of [`crate::sentiment::daily_sentiment`]
///
/// # Errors
/// Returns an error if writing to the destination fails.
pub fn write_daily_sentiment<W: std::io::Write>(writer: W, days: &[DailySentiment]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["date", "mean_sentiment", "posts"])?;

    for day in days {
        writer.write_record([
            day.date.format("%Y-%m-%d").to_string(),
            format!("{:.4}", day.mean_sentiment),
            day.posts.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ingestion::load_processed_posts;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    #[test]
    fn test_processed_csv_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        let posts = vec![NormalizedPost {
            date: NaiveDate::from_ymd_opt(2022, 1, 4).unwrap(),
            text: "amc gme squeeze".to_string(),
            tickers: BTreeSet::from(["GME".to_string(), "AMC".to_string()]),
        }];

        write_processed_posts(&path, &posts).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("date,post,symbols\n"));
        assert!(contents.contains(r#"2022-01-04,amc gme squeeze,"[""AMC"",""GME""]""#));

        assert_eq!(load_processed_posts(&path).unwrap(), posts);
    }

    #[test]
    fn test_unique_tickers_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unique_tickers.csv");
        let tickers = BTreeSet::from(["TSLA".to_string(), "AMC".to_string()]);

        assert_eq!(write_unique_tickers(&path, &tickers).unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Ticker\nAMC\nTSLA\n");
    }

    #[test]
    fn test_daily_sentiment_csv() {
        let days = vec![
            DailySentiment {
                date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                mean_sentiment: 1.0 / 3.0,
                posts: 3,
            },
            DailySentiment {
                date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
                mean_sentiment: -1.0,
                posts: 1,
            },
        ];

        let mut buffer = Vec::new();
        write_daily_sentiment(&mut buffer, &days).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "date,mean_sentiment,posts\n2025-01-02,0.3333,3\n2025-01-03,-1.0000,1\n"
        );

        let mut empty = Vec::new();
        write_daily_sentiment(&mut empty, &[]).unwrap();
        assert_eq!(String::from_utf8(empty).unwrap(), "date,mean_sentiment,posts\n");
    }
}

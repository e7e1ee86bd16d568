use crate::preprocess::NormalizedPost;
use crate::storage::TickerField;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::collections::BTreeSet;
use std::path::Path;

/// A post as it arrives from the source dump.
///
/// # Fields
/// * `date`: Calendar date the post was made
/// * `body`: Post text; `None` when the source cell was empty
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    pub date: NaiveDate,
    pub body: Option<String>,
}

/// Result of reading a source CSV: the usable posts plus how many rows were
/// skipped because their date could not be read.
#[derive(Debug, Clone)]
pub struct IngestedPosts {
    pub posts: Vec<RawPost>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Reads raw posts from a CSV dump.
///
/// The date comes from a `timestamp` column when there is one, otherwise from
/// `date`. A `body` column is required. Rows with an unreadable date are
/// logged and skipped; they never abort the load.
///
/// # Errors
/// Returns an error if the file cannot be opened or lacks the required columns.
pub fn load_raw_posts(path: &Path) -> Result<IngestedPosts> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open posts CSV '{}'", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read headers of '{}'", path.display()))?
        .clone();

    let date_column = column(&headers, "timestamp")
        .or_else(|| column(&headers, "date"))
        .ok_or_else(|| anyhow!("'{}' has neither a 'timestamp' nor a 'date' column", path.display()))?;
    let body_column = column(&headers, "body")
        .ok_or_else(|| anyhow!("'{}' has no 'body' column", path.display()))?;

    let mut posts = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2;
        rows_read += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping malformed CSV row");
                rows_skipped += 1;
                continue;
            }
        };

        let raw_date = record.get(date_column).unwrap_or("");
        let Some(date) = parse_post_date(raw_date) else {
            tracing::debug!(line, value = raw_date, "skipping row with unreadable date");
            rows_skipped += 1;
            continue;
        };

        let body = record
            .get(body_column)
            .filter(|b| !b.trim().is_empty())
            .map(str::to_string);

        posts.push(RawPost { date, body });
    }

    tracing::info!(
        path = %path.display(),
        rows_read,
        rows_skipped,
        "loaded raw posts"
    );

    Ok(IngestedPosts {
        posts,
        rows_read,
        rows_skipped,
    })
}

/// Reads a processed CSV (`date,post,symbols`) back into posts.
///
/// The `symbols` cell goes through [`TickerField`] so hand-edited or older
/// files with a bare symbol or a Python-style list still load. Rows without
/// any symbol are skipped.
pub fn load_processed_posts(path: &Path) -> Result<Vec<NormalizedPost>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open processed CSV '{}'", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read headers of '{}'", path.display()))?
        .clone();

    let date_column =
        column(&headers, "date").ok_or_else(|| anyhow!("'{}' has no 'date' column", path.display()))?;
    let post_column =
        column(&headers, "post").ok_or_else(|| anyhow!("'{}' has no 'post' column", path.display()))?;
    let symbols_column = column(&headers, "symbols")
        .ok_or_else(|| anyhow!("'{}' has no 'symbols' column", path.display()))?;

    let mut posts = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping malformed CSV row");
                continue;
            }
        };

        let Some(date) = record.get(date_column).and_then(parse_post_date) else {
            tracing::warn!(line, "skipping processed row with unreadable date");
            continue;
        };

        let tickers: BTreeSet<String> = TickerField::from_cell(record.get(symbols_column))
            .into_symbols()
            .into_iter()
            .collect();
        if tickers.is_empty() {
            tracing::warn!(line, "skipping processed row without symbols");
            continue;
        }

        posts.push(NormalizedPost {
            date,
            text: record.get(post_column).unwrap_or("").to_string(),
            tickers,
        });
    }

    tracing::info!(path = %path.display(), posts = posts.len(), "loaded processed posts");
    Ok(posts)
}

/// Parses the date part of the timestamp formats found in post dumps.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 and unix epoch
/// seconds (integer or fractional).
pub fn parse_post_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(epoch) = value.parse::<f64>() {
        if epoch.is_finite() {
            return DateTime::from_timestamp(epoch.trunc() as i64, 0).map(|dt| dt.date_naive());
        }
    }
    None
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

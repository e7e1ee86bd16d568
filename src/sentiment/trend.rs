use crate::storage::SentimentDocument;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Mean sentiment of the posts made on one day.
///
/// # Fields
/// * `date`: Calendar day the posts were made
/// * `mean_sentiment`: Average score, between -1.0 and 1.0
/// * `posts`: Number of documents averaged
#[derive(Debug, Clone, PartialEq)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub mean_sentiment: f64,
    pub posts: usize,
}

/// Averages stored sentiment scores per calendar day.
///
/// # Arguments
/// * `documents`: Scored documents, in any order
/// * `ticker`: When set, only documents mentioning this symbol (any case) count
///
/// # Returns
/// One entry per day with at least one matching document, oldest first.
/// Documents without a date cannot be placed on a day and are left out.
pub fn daily_sentiment(documents: &[SentimentDocument], ticker: Option<&str>) -> Vec<DailySentiment> {
    let symbol = ticker.map(|t| t.trim().to_uppercase());

    let mut by_date: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for doc in documents {
        if let Some(symbol) = &symbol {
            if !doc.mentions(symbol) {
                continue;
            }
        }
        let Some(date) = doc.date else {
            continue;
        };
        let entry = by_date.entry(date).or_default();
        entry.0 += i64::from(doc.sentiment);
        entry.1 += 1;
    }

    by_date
        .into_iter()
        .map(|(date, (sum, posts))| DailySentiment {
            date,
            mean_sentiment: sum as f64 / posts as f64,
            posts,
        })
        .collect()
}

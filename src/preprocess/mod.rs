pub mod contractions;
pub mod extractor;
pub mod filter;
pub mod normalizer;

pub use extractor::TickerExtractor;
pub use filter::{FilterConfig, Rejection, SpamFilter};
pub use normalizer::TextNormalizer;

use crate::data::{RawPost, StopWordSet, TickerWhitelist};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// A post that survived preprocessing, tagged with the tickers it mentions.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPost {
    pub date: NaiveDate,
    pub text: String,
    pub tickers: BTreeSet<String>,
}

/// Outcome of running one post through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(NormalizedPost),
    Rejected(Rejection),
}

/// Per-run tally of accepted posts and drop reasons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: HashMap<Rejection, usize>,
}

impl PipelineStats {
    fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Accepted(_) => self.accepted += 1,
            Verdict::Rejected(reason) => *self.rejected.entry(*reason).or_default() += 1,
        }
    }

    fn merge(mut self, other: PipelineStats) -> Self {
        self.total += other.total;
        self.accepted += other.accepted;
        for (reason, count) in other.rejected {
            *self.rejected.entry(reason).or_default() += count;
        }
        self
    }

    /// Posts dropped for `reason`; 0 when none were.
    pub fn rejected_for(&self, reason: Rejection) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }
}

/// Read-only inputs shared by every post in a run.
///
/// Built once at startup and passed by reference into the pipeline.
pub struct PipelineResources {
    pub whitelist: TickerWhitelist,
    pub stop_words: StopWordSet,
    pub filter: FilterConfig,
}

/// Normalization, spam filtering and ticker extraction for raw posts.
///
/// Posts are independent: the pipeline holds only shared references and can
/// be driven from any number of threads at once.
pub struct Pipeline<'a> {
    normalizer: TextNormalizer<'a>,
    filter: SpamFilter<'a>,
    extractor: TickerExtractor<'a>,
}

impl<'a> Pipeline<'a> {
    /// Builds a pipeline borrowing the run's shared resources.
    ///
    /// # Arguments
    /// * `resources`: Whitelist, stop words and filter thresholds, loaded once
    pub fn new(resources: &'a PipelineResources) -> Self {
        Self {
            normalizer: TextNormalizer::new(&resources.stop_words),
            filter: SpamFilter::new(&resources.filter),
            extractor: TickerExtractor::new(&resources.whitelist),
        }
    }

    /// Runs a single post through extraction, normalization and filtering.
    ///
    /// Tickers come from the raw body, so the case of a symbol survives even
    /// though the normalized text is lowercase.
    ///
    /// # Returns
    /// The normalized post, or the first reason it was dropped. Posts that
    /// pass every filter but mention no ticker get [`Rejection::NoTicker`].
    pub fn evaluate(&self, post: &RawPost) -> Verdict {
        let body = post.body.as_deref();

        let tickers = self.extractor.extract_opt(body);
        let text = self.normalizer.normalize_opt(body);

        if let Some(reason) = self.filter.check(body.unwrap_or(""), &text) {
            return Verdict::Rejected(reason);
        }
        if tickers.is_empty() {
            return Verdict::Rejected(Rejection::NoTicker);
        }

        Verdict::Accepted(NormalizedPost {
            date: post.date,
            text,
            tickers,
        })
    }

    /// Returns the cleaned post, or `None` if it was dropped.
    pub fn process(&self, post: &RawPost) -> Option<NormalizedPost> {
        match self.evaluate(post) {
            Verdict::Accepted(normalized) => Some(normalized),
            Verdict::Rejected(_) => None,
        }
    }

    /// Processes a batch in parallel.
    ///
    /// Dropped posts are only counted. Output follows input order.
    pub fn process_batch(&self, posts: &[RawPost]) -> (Vec<NormalizedPost>, PipelineStats) {
        let verdicts: Vec<Verdict> = posts.par_iter().map(|post| self.evaluate(post)).collect();

        let stats = verdicts
            .par_iter()
            .fold(PipelineStats::default, |mut stats, verdict| {
                stats.record(verdict);
                stats
            })
            .reduce(PipelineStats::default, PipelineStats::merge);

        let accepted = verdicts
            .into_iter()
            .filter_map(|verdict| match verdict {
                Verdict::Accepted(post) => Some(post),
                Verdict::Rejected(_) => None,
            })
            .collect();

        (accepted, stats)
    }
}

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, LookupArgs, PreprocessArgs, ScoreArgs, TickersArgs, TrendArgs};
use dotenv::dotenv;
use std::collections::BTreeSet;
use tracing_subscriber::EnvFilter;
use wsb_sentiment::data::{self, StopWordSet, TickerWhitelist};
use wsb_sentiment::preprocess::{FilterConfig, Pipeline, PipelineResources, PipelineStats, Rejection};
use wsb_sentiment::sentiment::{self, HuggingFaceClassifier};
use wsb_sentiment::storage::{DocumentSink, JsonLinesStore};

/// Loads the whitelist, stop words and filter settings.
///
/// Any failure here is fatal: nothing is processed without these resources.
fn load_resources(args: &PreprocessArgs) -> Result<PipelineResources> {
    let whitelist = TickerWhitelist::load_csv(&args.symbols)?;

    let stop_words = match &args.stop_words {
        Some(path) => StopWordSet::load(path)?,
        None => StopWordSet::english(),
    };

    let mut filter = FilterConfig {
        min_tokens: args.min_tokens,
        numeric_threshold: args.numeric_threshold,
        ..FilterConfig::default()
    };
    if let Some(path) = &args.boilerplate {
        filter.boilerplate = data::load_boilerplate(path)?;
    }

    Ok(PipelineResources {
        whitelist,
        stop_words,
        filter,
    })
}

fn log_pipeline_stats(stats: &PipelineStats) {
    tracing::info!(
        total = stats.total,
        accepted = stats.accepted,
        boilerplate = stats.rejected_for(Rejection::Boilerplate),
        single_token = stats.rejected_for(Rejection::SingleToken),
        too_few_tokens = stats.rejected_for(Rejection::TooFewTokens),
        numeric_spam = stats.rejected_for(Rejection::NumericSpam),
        no_ticker = stats.rejected_for(Rejection::NoTicker),
        "preprocessing finished"
    );
}

fn run_preprocess(args: PreprocessArgs) -> Result<()> {
    let resources = load_resources(&args)?;
    let ingested = data::load_raw_posts(&args.input)?;
    tracing::info!(
        rows_read = ingested.rows_read,
        rows_skipped = ingested.rows_skipped,
        "running pipeline"
    );

    let pipeline = Pipeline::new(&resources);
    let (posts, stats) = pipeline.process_batch(&ingested.posts);
    log_pipeline_stats(&stats);

    data::write_processed_posts(&args.output, &posts)?;
    tracing::info!(path = %args.output.display(), posts = posts.len(), "processed posts saved");
    Ok(())
}

async fn run_score(args: ScoreArgs) -> Result<()> {
    let posts = data::load_processed_posts(&args.input)?;
    let classifier = HuggingFaceClassifier::new(args.api_token, args.model);
    let store = JsonLinesStore::new(args.store);

    tracing::info!(model = classifier.model(), posts = posts.len(), "scoring posts");
    let (documents, stats) = sentiment::score_posts(&posts, &classifier, args.max_tokens).await;

    let inserted = store.insert_many(&documents).await?;
    tracing::info!(
        scored = stats.scored,
        too_long = stats.too_long,
        failed = stats.failed,
        inserted,
        store = %store.path().display(),
        "scoring finished"
    );
    Ok(())
}

async fn run_tickers(args: TickersArgs) -> Result<()> {
    let store = JsonLinesStore::new(args.store);
    let documents = store.load_all().await?;

    let tickers: BTreeSet<String> = documents
        .into_iter()
        .flat_map(|doc| doc.ticker)
        .collect();

    let written = data::write_unique_tickers(&args.output, &tickers)?;
    tracing::info!(path = %args.output.display(), tickers = written, "unique tickers saved");
    Ok(())
}

async fn run_lookup(args: LookupArgs) -> Result<()> {
    let store = JsonLinesStore::new(args.store);

    let body = match &args.ticker {
        Some(ticker) if !args.all => {
            let posts = store.find_by_ticker(ticker).await?;
            serde_json::json!({
                "ticker": ticker.trim().to_uppercase(),
                "posts": posts,
            })
        }
        _ => {
            let posts = store.load_all().await?;
            tracing::info!(posts = posts.len(), "loaded every stored document");
            serde_json::json!({ "posts": posts })
        }
    };
    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", body);
    }
    Ok(())
}

async fn run_trend(args: TrendArgs) -> Result<()> {
    let store = JsonLinesStore::new(args.store);
    let documents = store.load_all().await?;
    let days = sentiment::daily_sentiment(&documents, args.ticker.as_deref());

    if days.is_empty() {
        tracing::warn!(ticker = ?args.ticker, "no dated documents to average");
    }

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            data::write_daily_sentiment(file, &days)?;
            tracing::info!(path = %path.display(), days = days.len(), "daily sentiment saved");
        }
        None => data::write_daily_sentiment(std::io::stdout().lock(), &days)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // CPU-bound and internally parallel; keep it off the async workers.
        Command::Preprocess(args) => tokio::task::spawn_blocking(move || run_preprocess(args)).await?,
        Command::Score(args) => run_score(args).await,
        Command::Tickers(args) => run_tickers(args).await,
        Command::Lookup(args) => run_lookup(args).await,
        Command::Trend(args) => run_trend(args).await,
    }
}

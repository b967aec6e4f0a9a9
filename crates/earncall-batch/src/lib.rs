// Batch retry controller: drives the fragment fetch across
// (ticker x quarter) units of work with rate-limit-aware retry.
//
// Per-unit failures never abort the run; the one fatal condition is a
// unit exhausting its rate-limit retry budget.

pub mod backoff;
pub mod progress;
pub mod tickers;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use earncall_acquire::ratelimit::RateLimitDetector;
use earncall_acquire::{assemble, normalize, FragmentTransport};
use earncall_model::{FetchTarget, ScrapeConfig};
use earncall_segment::{output, SpeakerSegmenter};

pub use backoff::BackoffPolicy;

#[derive(Debug, Error)]
pub enum BatchError {
    /// Raised once a unit's rate-limit retries are exhausted. Aborts the
    /// whole run, not just the unit: the service is telling us to stop.
    #[error("rate limit retries exhausted at {ticker} {year} Q{quarter}")]
    RateLimitExhausted {
        ticker: String,
        year: u16,
        quarter: u8,
    },
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub year: u16,
    /// Quarters attempted per ticker, in this order.
    pub quarters: Vec<u8>,
    pub tickers_csv: PathBuf,
    pub output_dir: PathBuf,
    pub save_txt: bool,
    pub save_csv: bool,
    /// Base pacing delay between units, in seconds.
    pub unit_delay_secs: f64,
    /// Random jitter added to the pacing delay, in seconds.
    pub unit_jitter_secs: f64,
    pub backoff: BackoffPolicy,
}

impl BatchOptions {
    pub fn new(year: u16, tickers_csv: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            year,
            quarters: vec![1, 2, 3, 4],
            tickers_csv: tickers_csv.into(),
            output_dir: output_dir.into(),
            save_txt: true,
            save_csv: true,
            unit_delay_secs: 0.0,
            unit_jitter_secs: 0.35,
            backoff: BackoffPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitOutcome {
    Done,
    Skipped,
    Failed,
}

/// Fetch every (ticker, quarter) transcript for one year.
///
/// Tickers iterate in input-file order, quarters in the configured
/// order. Units whose outputs already exist are skipped with no network
/// activity, so interrupted runs can be resumed by re-running.
pub async fn run_batch<T: FragmentTransport>(
    transport: &T,
    scrape: &ScrapeConfig,
    opts: &BatchOptions,
) -> Result<BatchSummary> {
    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("failed to create {}", opts.output_dir.display()))?;

    let tickers = tickers::read_tickers(&opts.tickers_csv)?;
    anyhow::ensure!(
        !tickers.is_empty(),
        "no tickers found in {}",
        opts.tickers_csv.display()
    );
    tracing::info!(
        tickers = tickers.len(),
        year = opts.year,
        quarters = ?opts.quarters,
        "Starting batch run"
    );

    let detector = RateLimitDetector::default();
    let segmenter = SpeakerSegmenter::default();
    let mut summary = BatchSummary::default();

    for ticker in &tickers {
        for &quarter in &opts.quarters {
            let target = FetchTarget::new(ticker.clone(), opts.year, quarter);
            let ticker_dir = opts.output_dir.join(target.safe_ticker());

            match run_unit(transport, scrape, opts, &detector, &segmenter, &target, &ticker_dir)
                .await?
            {
                UnitOutcome::Done => summary.done += 1,
                UnitOutcome::Skipped => summary.skipped += 1,
                UnitOutcome::Failed => summary.failed += 1,
            }

            // Pace request volume between units, whatever the outcome.
            let pause = backoff::pacing_delay(opts.unit_delay_secs, opts.unit_jitter_secs);
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
    }

    tracing::info!(
        done = summary.done,
        skipped = summary.skipped,
        failed = summary.failed,
        "Batch run complete"
    );
    Ok(summary)
}

async fn run_unit<T: FragmentTransport>(
    transport: &T,
    scrape: &ScrapeConfig,
    opts: &BatchOptions,
    detector: &RateLimitDetector,
    segmenter: &SpeakerSegmenter,
    target: &FetchTarget,
    ticker_dir: &Path,
) -> Result<UnitOutcome, BatchError> {
    let stem = target.file_stem();

    if progress::already_processed(ticker_dir, &stem, opts.save_txt, opts.save_csv) {
        tracing::info!(
            ticker = %target.ticker,
            year = target.year,
            quarter = target.quarter,
            "Outputs already present; skipping"
        );
        return Ok(UnitOutcome::Skipped);
    }

    let url = target.document_url();
    let mut attempt: u32 = 0;

    loop {
        // One fetch per attempt; txt and csv both derive from this text.
        let text = match assemble::assemble_document(transport, &url, scrape).await {
            Ok(html) => normalize::transcript_text(&html),
            Err(err) => {
                // Some throttled responses surface as errors rather than
                // interstitial pages; check the message channel too.
                if detector.is_limited_message(&err.to_string()) {
                    attempt = back_off(opts, target, attempt).await?;
                    continue;
                }
                tracing::warn!(
                    ticker = %target.ticker,
                    year = target.year,
                    quarter = target.quarter,
                    error = %err,
                    "Scrape failed; treating as missing transcript"
                );
                return Ok(UnitOutcome::Skipped);
            }
        };

        if detector.is_limited_text(&text) {
            attempt = back_off(opts, target, attempt).await?;
            continue;
        }

        if opts.save_txt {
            let path = ticker_dir.join(format!("{stem}.txt"));
            if let Err(err) = output::write_transcript_txt(&path, &text) {
                tracing::error!(
                    ticker = %target.ticker,
                    year = target.year,
                    quarter = target.quarter,
                    error = %err,
                    "Failed to write transcript text"
                );
                return Ok(UnitOutcome::Failed);
            }
        }

        if opts.save_csv {
            let blocks = segmenter.segment(&text);
            let path = ticker_dir.join(format!("{stem}.csv"));
            if let Err(err) = output::write_speaker_csv(&path, &blocks) {
                tracing::error!(
                    ticker = %target.ticker,
                    year = target.year,
                    quarter = target.quarter,
                    error = %err,
                    "Failed to write speaker blocks"
                );
                return Ok(UnitOutcome::Failed);
            }
        }

        tracing::info!(
            ticker = %target.ticker,
            year = target.year,
            quarter = target.quarter,
            "Transcript saved"
        );
        return Ok(UnitOutcome::Done);
    }
}

/// Sleep out one backoff step, or fail the run once the budget is spent.
async fn back_off(
    opts: &BatchOptions,
    target: &FetchTarget,
    attempt: u32,
) -> Result<u32, BatchError> {
    if attempt >= opts.backoff.max_retries {
        return Err(BatchError::RateLimitExhausted {
            ticker: target.ticker.clone(),
            year: target.year,
            quarter: target.quarter,
        });
    }
    let delay = opts.backoff.delay(attempt);
    tracing::warn!(
        ticker = %target.ticker,
        year = target.year,
        quarter = target.quarter,
        attempt = attempt + 1,
        delay_secs = format!("{:.1}", delay.as_secs_f64()),
        "Rate limited; backing off"
    );
    tokio::time::sleep(delay).await;
    Ok(attempt + 1)
}

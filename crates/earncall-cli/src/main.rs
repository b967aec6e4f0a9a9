use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use earncall_acquire::ratelimit::RateLimitDetector;
use earncall_acquire::HttpTransport;
use earncall_batch::{BackoffPolicy, BatchOptions};
use earncall_model::{FetchTarget, ScrapeConfig};
use earncall_segment::search::{self, KeywordMatch};
use earncall_segment::{output, SpeakerSegmenter};

#[derive(Parser)]
#[command(name = "earncall")]
#[command(about = "Earnings-call transcript fetching and speaker segmentation")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one transcript and write its text/CSV outputs
    Fetch {
        /// Ticker symbol (e.g., "AAPL")
        #[arg(short, long)]
        ticker: String,

        /// Fiscal year (e.g., 2025)
        #[arg(short, long)]
        year: u16,

        /// Fiscal quarter (1-4)
        #[arg(short, long)]
        quarter: u8,

        /// Output directory
        #[arg(short = 'O', long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        scrape: ScrapeArgs,

        #[command(flatten)]
        outputs: OutputArgs,
    },

    /// Fetch a whole year of transcripts for every ticker in a list
    Batch {
        /// Fiscal year (e.g., 2025)
        #[arg(short, long)]
        year: u16,

        /// Ticker list CSV (header must contain act_symbol)
        #[arg(short, long, default_value = "tickers/sandp.csv")]
        tickers: PathBuf,

        /// Output directory; one subdirectory per ticker
        #[arg(short = 'O', long, default_value = "transcripts")]
        output_dir: PathBuf,

        /// Quarters to attempt, in order
        #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 3, 4])]
        quarters: Vec<u8>,

        /// Base pacing delay between units, in seconds
        #[arg(long, default_value_t = 0.0)]
        sleep: f64,

        /// Random jitter added to the pacing delay, in seconds
        #[arg(long, default_value_t = 0.35)]
        jitter: f64,

        /// Rate-limit retries per unit before the run fails
        #[arg(long, default_value_t = 5)]
        max_retries: u32,

        #[command(flatten)]
        scrape: ScrapeArgs,

        #[command(flatten)]
        outputs: OutputArgs,
    },

    /// Fetch one transcript and print keyword matches with context
    Search {
        /// Ticker symbol (e.g., "AAPL")
        #[arg(short, long)]
        ticker: String,

        /// Fiscal year (e.g., 2025)
        #[arg(short, long)]
        year: u16,

        /// Fiscal quarter (1-4)
        #[arg(short, long)]
        quarter: u8,

        /// Keyword to search for, case-insensitive
        #[arg(short, long)]
        keyword: String,

        /// Context lines shown on each side of a match
        #[arg(long, default_value_t = 2)]
        context: usize,

        /// Match at word boundaries only
        #[arg(long)]
        whole_word: bool,

        #[command(flatten)]
        scrape: ScrapeArgs,
    },

    /// Segment an existing transcript text file into a speaker CSV
    Segment {
        /// Input .txt file (normalized transcript text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output .csv path (defaults to the input with a .csv extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ScrapeArgs {
    /// Raw Cookie header value for gated access (e.g., "csrftoken=...")
    #[arg(long)]
    cookie: Option<String>,

    /// How many numbered fragment pages to attempt per document
    #[arg(long, default_value_t = 200)]
    max_parts: u32,

    /// Politeness delay between fragment requests, in seconds
    #[arg(long, default_value_t = 0.0)]
    fragment_delay: f64,

    /// Request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Skip the normalized-text output
    #[arg(long)]
    no_txt: bool,

    /// Skip the speaker-block CSV output
    #[arg(long)]
    no_csv: bool,
}

impl ScrapeArgs {
    fn to_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            cookies: self.cookie.clone(),
            max_parts: self.max_parts,
            fragment_delay: Duration::from_secs_f64(self.fragment_delay.max(0.0)),
            timeout: Duration::from_secs(self.timeout),
            ..ScrapeConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Fetch {
            ticker,
            year,
            quarter,
            output_dir,
            scrape,
            outputs,
        } => {
            let config = scrape.to_config();
            let transport = HttpTransport::new(config.clone())?;
            let target = FetchTarget::new(ticker, year, quarter);

            let text =
                earncall_acquire::fetch_transcript_text(&transport, &target, &config).await?;

            // Refuse to persist a throttling interstitial as a transcript
            let detector = RateLimitDetector::default();
            anyhow::ensure!(
                !detector.is_limited_text(&text),
                "rate limited by the site; wait and retry (or use the batch command's backoff)"
            );

            write_outputs(&output_dir, &target, &text, &outputs)?;
        }

        Commands::Batch {
            year,
            tickers,
            output_dir,
            quarters,
            sleep,
            jitter,
            max_retries,
            scrape,
            outputs,
        } => {
            let config = scrape.to_config();
            let transport = HttpTransport::new(config.clone())?;

            let mut opts = BatchOptions::new(year, tickers, output_dir);
            opts.quarters = quarters;
            opts.save_txt = !outputs.no_txt;
            opts.save_csv = !outputs.no_csv;
            opts.unit_delay_secs = sleep;
            opts.unit_jitter_secs = jitter;
            opts.backoff = BackoffPolicy {
                max_retries,
                ..BackoffPolicy::default()
            };

            let summary = earncall_batch::run_batch(&transport, &config, &opts).await?;
            tracing::info!(
                done = summary.done,
                skipped = summary.skipped,
                failed = summary.failed,
                "Run finished"
            );
        }

        Commands::Search {
            ticker,
            year,
            quarter,
            keyword,
            context,
            whole_word,
            scrape,
        } => {
            let config = scrape.to_config();
            let transport = HttpTransport::new(config.clone())?;
            let target = FetchTarget::new(ticker, year, quarter);
            let url = target.document_url();

            let text =
                earncall_acquire::fetch_transcript_text(&transport, &target, &config).await?;
            let detector = RateLimitDetector::default();
            anyhow::ensure!(
                !detector.is_limited_text(&text),
                "rate limited by the site; wait and retry"
            );

            let matches = search::find_keyword(&text, &keyword, context, whole_word)?;
            print_matches(&url, &matches);
        }

        Commands::Segment { input, output } => {
            let text = std::fs::read_to_string(&input)?;
            let output = output.unwrap_or_else(|| input.with_extension("csv"));
            let blocks = SpeakerSegmenter::default().segment(&text);
            output::write_speaker_csv(&output, &blocks)?;
        }
    }

    Ok(())
}

fn print_matches(url: &str, matches: &[KeywordMatch]) {
    println!("Source: {url}\n");
    if matches.is_empty() {
        println!("No matches found.");
        return;
    }
    for m in matches {
        println!("--- line {} ---", m.line_no);
        for line in &m.before {
            println!("  {line}");
        }
        println!("> {}", m.line);
        for line in &m.after {
            println!("  {line}");
        }
        println!();
    }
}

fn write_outputs(
    dir: &Path,
    target: &FetchTarget,
    text: &str,
    outputs: &OutputArgs,
) -> Result<()> {
    let stem = target.file_stem();
    if !outputs.no_txt {
        output::write_transcript_txt(&dir.join(format!("{stem}.txt")), text)?;
    }
    if !outputs.no_csv {
        let blocks = SpeakerSegmenter::default().segment(text);
        output::write_speaker_csv(&dir.join(format!("{stem}.csv")), &blocks)?;
    }
    Ok(())
}

use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use wordsheet_acquire::pipeline::{self, ApiRunConfig, RunSummary};
use wordsheet_acquire::{input, DictionaryApi, DictionaryPage, Quoting, RetryPolicy, RowSink};
use wordsheet_model::flatten::SenseMode;

#[derive(Parser)]
#[command(name = "wordsheet")]
#[command(about = "Write word definitions from the dictionary API or a local dictionary to a delimited file")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
#[command(group(ArgGroup::new("terms").required(true).args(["words", "file"])))]
struct Cli {
    /// Terms to look up
    #[arg(short = 'w', long = "words", num_args = 1.., value_name = "TERM")]
    words: Vec<String>,

    /// Text file with one term per line
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Look terms up in this JSON dictionary file instead of the dictionary API
    #[arg(short, long, value_name = "PATH")]
    dictionary: Option<PathBuf>,

    /// Output file, truncated at the start of every run
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,

    /// Field delimiter (a single ASCII character)
    #[arg(long, default_value = "|", value_parser = parse_delimiter)]
    delimiter: u8,

    /// How to write values that contain the delimiter
    #[arg(long, default_value = "necessary", value_enum)]
    quoting: QuotingArg,

    /// Dictionary API attempts per term before giving up (0 retries forever)
    #[arg(long, default_value_t = 10)]
    max_attempts: u32,

    /// Seconds to wait between dictionary API attempts
    #[arg(long, default_value_t = 5)]
    retry_delay: u64,

    /// Write one row per definition instead of only the first of each meaning
    #[arg(long)]
    all_senses: bool,

    /// Skip the dictionary.com page fetch (word form column becomes N/A)
    #[arg(long)]
    no_page: bool,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, clap::ValueEnum)]
enum QuotingArg {
    /// Quote values containing the delimiter, quotes or line breaks
    Necessary,
    /// Write values raw, even if that breaks column alignment
    Never,
}

impl From<QuotingArg> for Quoting {
    fn from(arg: QuotingArg) -> Self {
        match arg {
            QuotingArg::Necessary => Quoting::Necessary,
            QuotingArg::Never => Quoting::Never,
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() && !b.is_ascii_alphanumeric() && !matches!(*b, b'"' | b'\n' | b'\r') => Ok(*b),
        _ => Err(format!("delimiter must be one ASCII punctuation or whitespace character, got '{s}'")),
    }
}

impl Cli {
    fn retry_policy(&self) -> RetryPolicy {
        let delay = Duration::from_secs(self.retry_delay);
        match self.max_attempts {
            0 => RetryPolicy::unbounded(delay),
            n => RetryPolicy::bounded(n, delay),
        }
    }

    fn api_config(&self) -> ApiRunConfig {
        ApiRunConfig {
            retry: self.retry_policy(),
            senses: if self.all_senses { SenseMode::All } else { SenseMode::First },
            ..Default::default()
        }
    }
}

fn init_logging(log_level: &LogLevel, utc: bool) {
    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z".to_string();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if utc {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format))
            .init();
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format))
            .init();
    }
}

/// Print usage and exit with status 1.
fn usage_exit() -> ! {
    let _ = Cli::command().print_help();
    process::exit(1);
}

/// Exit status for a failed argument parse. Usage errors exit 1 (clap's own
/// default is 2); `--help` and `--version` exit 0.
fn usage_status(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let status = usage_status(&e);
            let _ = e.print();
            if status != 0 {
                usage_exit();
            }
            process::exit(status);
        }
    };

    init_logging(&cli.log_level, cli.utc);

    if let Err(e) = run(&cli).await {
        tracing::error!(error = %format!("{e:#}"), "Run failed");
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let terms = match &cli.file {
        Some(path) => input::load_terms(path)?,
        None => cli.words.clone(),
    };
    if terms.is_empty() {
        tracing::error!("No terms to look up");
        usage_exit();
    }

    let mut sink = RowSink::new(&cli.output, cli.delimiter, cli.quoting.clone().into());

    let summary: RunSummary = match &cli.dictionary {
        Some(path) => {
            let mapping = input::load_dictionary(path)?;
            pipeline::run_local(&terms, &mapping, &mut sink)?
        }
        None => {
            let client = wordsheet_acquire::http_client()?;
            let api = DictionaryApi::new(client.clone())?;
            let page = if cli.no_page {
                None
            } else {
                Some(DictionaryPage::new(client)?)
            };
            pipeline::run_api(&terms, &api, page.as_ref(), &mut sink, &cli.api_config()).await?
        }
    };

    tracing::info!(
        terms = summary.terms,
        found = summary.found,
        rows = summary.rows,
        path = %sink.path().display(),
        "Wrote definitions"
    );

    Ok(())
}

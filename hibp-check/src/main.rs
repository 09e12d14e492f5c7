use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hibp_check::{Error, FailurePolicy, RunOptions, TerminalPrompt, run};
use hibp_range::{ClientConfig, DEFAULT_BASE_URL, RangeClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hibp-check")]
#[command(about = "Check passwords against Have I Been Pwned without sending them over the network")]
#[command(long_about = "Reads one password per line from stdin, or prompts without echo when \
    stdin is a terminal. Only the first 5 hex characters of each password's SHA1 hash are \
    sent to the range API; the rest is matched locally.")]
struct Args {
    /// Range API base URL; the hash prefix is appended to it
    #[arg(long, env = "HIBP_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Ask the API to pad responses with decoy entries
    #[arg(long, env = "HIBP_PADDING")]
    padding: bool,

    /// Retries for failed range queries (transport errors, 429 and 5xx only)
    #[arg(long, env = "HIBP_RETRIES", default_value_t = 0)]
    retries: u32,

    /// Request timeout in seconds (default: none)
    #[arg(long, env = "HIBP_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Report failed checks instead of showing the password as safe
    #[arg(long)]
    strict: bool,

    /// Print one JSON object per password
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner
    #[arg(long)]
    no_progress: bool,
}

fn setup_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Error> {
    let args = Args::parse();
    setup_logger();

    let policy = if args.strict { FailurePolicy::Report } else { FailurePolicy::AssumeSafe };

    let mut config = ClientConfig::default()
        .with_base_url(args.api_url)
        .with_padding(args.padding)
        .with_max_retries(args.retries);
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = RangeClient::with_config(config)?;

    let options = RunOptions {
        policy,
        json: args.json,
        show_progress: !args.no_progress && !args.json,
    };

    let mut stdout = std::io::stdout().lock();
    let summary = if std::io::stdin().is_terminal() {
        run(&mut TerminalPrompt, &client, options, &mut stdout).await?
    } else {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        run(&mut lines, &client, options, &mut stdout).await?
    };

    Ok(ExitCode::from(summary.exit_status()))
}

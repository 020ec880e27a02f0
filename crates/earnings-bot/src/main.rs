use std::io;
use std::path::PathBuf;

use clap::Parser;
use earnings_bot::checkpoint::CheckpointFile;
use earnings_bot::feed::{DEFAULT_FEED_URL, StocktwitsFeed};
use earnings_bot::notify::DiscordNotifier;
use earnings_bot::{LOG_TARGET, RunError, run_once};
use snafu::{ResultExt, Snafu};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Snafu)]
pub enum BotError {
    #[snafu(display("Run failed: {source}"))]
    Run { source: RunError },
    #[snafu(display("Logging initialization failed"))]
    Logging,
}

pub type BotResult<T> = std::result::Result<T, BotError>;

/// Earnings feed Discord bot
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    /// Discord webhook URL to publish reports to. For threads, append
    /// ?thread_id=<id> to the URL.
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: String,

    /// Path to the file holding the last processed post id
    #[arg(long, default_value = "last_message_id.txt")]
    pub checkpoint_file: PathBuf,

    /// Feed stream URL to poll for earnings posts
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,
}

#[snafu::report]
#[tokio::main(flavor = "current_thread")]
async fn main() -> BotResult<()> {
    init_logging()?;

    let opts = Opts::parse();

    info!(
        target: LOG_TARGET,
        feed_url = %opts.feed_url,
        checkpoint_file = %opts.checkpoint_file.display(),
        "Starting earnings bot"
    );

    let feed = StocktwitsFeed::new(opts.feed_url);
    let notifier = DiscordNotifier::new(opts.webhook_url);
    let checkpoint_file = CheckpointFile::new(opts.checkpoint_file);

    run_once(&feed, &notifier, &checkpoint_file)
        .await
        .context(RunSnafu)
}

pub fn init_logging() -> BotResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| BotError::Logging)?;

    Ok(())
}

pub mod checkpoint;
pub mod feed;
pub mod notify;
pub mod queue;
pub mod report;

use snafu::{ResultExt, Snafu};
use tracing::{error, info};

use crate::checkpoint::{CheckpointError, CheckpointFile};
use crate::feed::FeedSource;
use crate::notify::Notify;
use crate::queue::QueueError;
use crate::report::Report;

pub const PROJECT_NAME: &str = "earnings-bot";
pub const LOG_TARGET: &str = "earnings_bot::main";

#[derive(Debug, Snafu)]
pub enum RunError {
    #[snafu(display("Failed to build queue: {source}"))]
    Queue { source: QueueError },
    #[snafu(display("Failed to persist checkpoint: {source}"))]
    Persist { source: CheckpointError },
}

pub type RunResult<T> = std::result::Result<T, RunError>;

/// One batch run: drain everything newer than the checkpoint, publish
/// the usable reports, advance the checkpoint.
///
/// A feed failure aborts before any checkpoint write, so the next run
/// resumes from the same boundary. A notifier failure only drops that
/// one report; holding the checkpoint back would re-announce every
/// other report on the next run.
pub async fn run_once(
    feed: &(impl FeedSource + ?Sized),
    notifier: &(impl Notify + ?Sized),
    checkpoint_file: &CheckpointFile,
) -> RunResult<()> {
    let checkpoint = checkpoint_file.load();
    info!(target: LOG_TARGET, checkpoint = ?checkpoint, "Starting run");

    let queue = queue::build_queue(feed, checkpoint)
        .await
        .context(QueueSnafu)?;

    // Nothing new: leave the checkpoint untouched. This also guards the
    // max computation below, which is meaningless on an empty queue.
    let Some(last_id) = queue.iter().map(|post| post.id).max() else {
        info!(target: LOG_TARGET, "No new posts to process");
        return Ok(());
    };

    let mut published = 0_usize;
    let mut skipped = 0_usize;

    for post in &queue {
        let report = Report::extract(post);

        // Posts without both figures are noise (non-earnings chatter or
        // phrasing the extractor does not know).
        if !report.is_complete() {
            skipped += 1;
            continue;
        }

        info!(target: LOG_TARGET, ticker = %report.ticker, "Processing report");
        match notifier.send(&report).await {
            Ok(()) => published += 1,
            Err(err) => {
                error!(target: LOG_TARGET, error = %err, ticker = %report.ticker, "Failed to publish report");
            }
        }
    }

    checkpoint_file.store(last_id).context(PersistSnafu)?;

    info!(
        target: LOG_TARGET,
        queued = queue.len(),
        published,
        skipped,
        checkpoint = last_id,
        "Run complete"
    );

    Ok(())
}

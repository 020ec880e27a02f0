use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::feed::{FeedError, FeedSource, Post};

/// Upper bound on pages walked in a single run. Hitting it means the
/// checkpoint predates everything the feed still serves.
pub const MAX_PAGES: usize = 50;

#[derive(Debug, Snafu)]
pub enum QueueError {
    #[snafu(display("Feed fetch failed: {source}"))]
    Fetch { source: FeedError },
    #[snafu(display("Checkpoint {checkpoint} not reached within {MAX_PAGES} pages"))]
    CheckpointTooOld { checkpoint: u64 },
}

pub type QueueResult<T> = std::result::Result<T, QueueError>;

/// Collect every post strictly newer than `checkpoint`, newest first.
///
/// Without a checkpoint there is no boundary to reconcile against, so a
/// single page is returned and no backfill is attempted.
pub async fn build_queue(
    feed: &(impl FeedSource + ?Sized),
    checkpoint: Option<u64>,
) -> QueueResult<Vec<Post>> {
    info!("Building queue");

    let Some(checkpoint) = checkpoint else {
        return feed.fetch_page(None).await.context(FetchSnafu);
    };

    let mut queue: Vec<Post> = Vec::new();
    let mut bound = None;

    for _ in 0..MAX_PAGES {
        let posts = feed.fetch_page(bound).await.context(FetchSnafu)?;

        // The feed ran out before the checkpoint surfaced.
        if posts.is_empty() {
            return Ok(queue);
        }

        for post in posts {
            if post.id <= checkpoint {
                return Ok(queue);
            }
            queue.push(post);
        }

        // Queue is newest first, so its tail is the lowest id seen and
        // bounds the next page.
        bound = queue.last().map(|post| post.id);
        debug!(bound = ?bound, queued = queue.len(), "Page consumed without crossing checkpoint");
    }

    CheckpointTooOldSnafu { checkpoint }.fail()
}

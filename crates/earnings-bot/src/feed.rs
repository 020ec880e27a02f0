use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

/// StockTwits stream that posts one message per earnings report.
pub const DEFAULT_FEED_URL: &str = "https://api.stocktwits.com/api/2/streams/user/epsguid.json";

/// Posts per page, the most the API returns in one call.
pub const PAGE_LIMIT: u32 = 49;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Snafu)]
pub enum FeedError {
    #[snafu(display("HTTP request failed: {source}"))]
    Http { source: reqwest::Error },
    #[snafu(display("Malformed feed payload: {source}"))]
    Payload { source: reqwest::Error },
}

pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// One ticker attached to a feed post.
#[derive(Debug, Clone, Deserialize)]
pub struct Symbol {
    pub symbol: String,
    pub title: String,
}

/// One feed post: free text plus zero or more tickers.
///
/// Immutable once fetched; ids are feed-assigned, unique and monotonic.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: u64,
    pub body: String,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

#[derive(Debug, Deserialize)]
struct StreamPage {
    messages: Vec<Post>,
}

/// A source of reverse-chronological feed pages.
#[async_trait]
pub trait FeedSource {
    /// Fetch up to [`PAGE_LIMIT`] of the most recent posts, sorted
    /// strictly descending by id. When `max_id` is given, only posts
    /// with an id below it are returned.
    async fn fetch_page(&self, max_id: Option<u64>) -> FeedResult<Vec<Post>>;
}

pub struct StocktwitsFeed {
    client: Client,
    url: String,
}

impl StocktwitsFeed {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("earnings-bot/1.0")
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FeedSource for StocktwitsFeed {
    async fn fetch_page(&self, max_id: Option<u64>) -> FeedResult<Vec<Post>> {
        info!(max_id = ?max_id, "Fetching feed page");

        let limit = PAGE_LIMIT.to_string();
        let mut request = self
            .client
            .get(&self.url)
            .query(&[("filter", "all"), ("limit", limit.as_str())]);

        if let Some(max_id) = max_id {
            let max = max_id.to_string();
            request = request.query(&[("max", max.as_str())]);
        }

        let response = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .context(HttpSnafu)?;

        let page: StreamPage = response.json().await.context(PayloadSnafu)?;

        // The API does not guarantee order; sort newest first.
        let mut posts = page.messages;
        posts.sort_unstable_by(|a, b| b.id.cmp(&a.id));

        debug!(count = posts.len(), "Fetched feed page");
        Ok(posts)
    }
}

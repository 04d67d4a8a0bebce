use async_trait::async_trait;

use super::{BackendTransport, HttpMethod, OnError, Operation};
use crate::controller::CollectionSource;
use crate::error::Result;
use crate::models::{NewsItem, TriggerAck};

pub const LIVE_NEWS: Operation = Operation {
    name: "live_news",
    method: HttpMethod::Get,
    path: "/news/live-news",
    fallback_message: "Failed to fetch news",
    on_error: OnError::Empty,
};

pub const HOT_NEWS: Operation = Operation {
    name: "hot_news",
    method: HttpMethod::Get,
    path: "/news/hot-news",
    fallback_message: "Failed to fetch hot news",
    on_error: OnError::Empty,
};

pub const LATEST_NEWS: Operation = Operation {
    name: "latest_news",
    method: HttpMethod::Get,
    path: "/news/latest-news",
    fallback_message: "Failed to fetch latest news",
    on_error: OnError::Empty,
};

pub const SCRAPE_NOW: Operation = Operation {
    name: "scrape_news",
    method: HttpMethod::Post,
    path: "/news/scrape-now",
    fallback_message: "Failed to trigger news scrape",
    on_error: OnError::Empty,
};

/// Default slice for [`NewsClient::latest_news`].
pub const DEFAULT_LATEST_LIMIT: usize = 5;

#[derive(Clone, Debug)]
pub struct NewsClient {
    transport: BackendTransport,
}

impl NewsClient {
    pub fn new(transport: BackendTransport) -> Self {
        Self { transport }
    }

    /// Run any news-list operation under its declared policy.
    pub async fn fetch(&self, op: Operation) -> Result<Vec<NewsItem>> {
        let res = self
            .transport
            .envelope::<Vec<NewsItem>>(&op, op.path, None)
            .await
            .map(|env| env.data.unwrap_or_default());
        op.settle(res)
    }

    pub async fn live_news(&self) -> Result<Vec<NewsItem>> {
        self.fetch(LIVE_NEWS).await
    }

    pub async fn hot_news(&self) -> Result<Vec<NewsItem>> {
        self.fetch(HOT_NEWS).await
    }

    /// First `limit` items of `/news/latest-news`; the backend does not slice.
    pub async fn latest_news(&self, limit: usize) -> Result<Vec<NewsItem>> {
        let mut items = self.fetch(LATEST_NEWS).await?;
        items.truncate(limit);
        Ok(items)
    }

    /// Ask the backend to re-scrape headlines. `None` when the call failed.
    pub async fn scrape_now(&self) -> Option<TriggerAck> {
        let res = self
            .transport
            .json::<TriggerAck>(&SCRAPE_NOW, SCRAPE_NOW.path)
            .await
            .map(Some);
        SCRAPE_NOW.settle(res).ok().flatten()
    }

    /// Live news as a controller source; failures propagate so the
    /// controller can keep the previous list.
    pub fn live_feed(&self) -> NewsFeed {
        NewsFeed {
            client: self.clone(),
            op: LIVE_NEWS.on_error(OnError::Throw),
        }
    }
}

/// A news operation bound to a client, for use with a refresh controller.
#[derive(Clone, Debug)]
pub struct NewsFeed {
    client: NewsClient,
    op: Operation,
}

impl NewsFeed {
    pub fn new(client: NewsClient, op: Operation) -> Self {
        Self { client, op }
    }
}

#[async_trait]
impl CollectionSource for NewsFeed {
    type Item = NewsItem;

    async fn fetch(&self) -> Result<Vec<NewsItem>> {
        self.client.fetch(self.op).await
    }

    fn name(&self) -> &'static str {
        self.op.name
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::filters::{self, Filter};
use crate::controller::Snapshot;
use crate::models::{NewsItem, Sentiment};

pub const EMPTY_MESSAGE: &str = "No news available for the selected filter";

/// Headline card: the item plus the colour hint its sentiment maps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsCard {
    #[serde(flatten)]
    pub item: NewsItem,
    pub tone: super::Tone,
}

impl From<NewsItem> for NewsCard {
    fn from(item: NewsItem) -> Self {
        let tone = match item.sentiment {
            Sentiment::Positive => super::Tone::Up,
            Sentiment::Negative => super::Tone::Down,
            Sentiment::Neutral => super::Tone::Flat,
        };
        Self { item, tone }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NewsSectionView {
    Loading,
    Error {
        message: String,
    },
    Empty {
        message: &'static str,
        filter: String,
    },
    Items {
        items: Vec<NewsCard>,
        last_updated: Option<DateTime<Utc>>,
        /// A refresh is in flight while older items are still shown.
        refreshing: bool,
        /// The latest refresh failed; `items` are from an earlier one.
        stale_error: Option<String>,
    },
}

/// Build the live-news section for the current snapshot and filter.
pub fn news_section(snap: &Snapshot<NewsItem>, filter: &Filter<Sentiment>) -> NewsSectionView {
    if snap.data.is_empty() {
        if snap.loading {
            return NewsSectionView::Loading;
        }
        if let Some(err) = &snap.error {
            return NewsSectionView::Error {
                message: err.clone(),
            };
        }
    }

    let visible = filters::apply(snap.data.as_slice(), filter, |n| &n.sentiment);
    if visible.is_empty() {
        return NewsSectionView::Empty {
            message: EMPTY_MESSAGE,
            filter: filter.to_string(),
        };
    }

    NewsSectionView::Items {
        items: visible.into_iter().map(NewsCard::from).collect(),
        last_updated: snap.last_updated,
        refreshing: snap.loading,
        stale_error: snap.error.clone(),
    }
}

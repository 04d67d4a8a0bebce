use chrono::{DateTime, Utc};
use serde::Serialize;

use super::filters::{self, Filter};
use crate::controller::Snapshot;
use crate::models::{PredictedStock, Setup};

pub const EMPTY_MESSAGE: &str = "No stocks available";

/// Badge colour bucket for the confidence pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn of(pct: u8) -> Self {
        match pct {
            80.. => ConfidenceBand::High,
            60..=79 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockCard {
    #[serde(flatten)]
    pub stock: PredictedStock,
    pub band: ConfidenceBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PredictedStocksView {
    Loading,
    Error {
        message: String,
    },
    Empty {
        message: &'static str,
        sectors: Vec<String>,
    },
    Items {
        items: Vec<StockCard>,
        sectors: Vec<String>,
        last_updated: Option<DateTime<Utc>>,
        refreshing: bool,
        stale_error: Option<String>,
    },
}

/// `"All"` followed by each distinct sector in first-seen order.
pub fn sector_options(stocks: &[PredictedStock]) -> Vec<String> {
    let mut out = vec!["All".to_string()];
    for s in stocks {
        if !out.contains(&s.sector) {
            out.push(s.sector.clone());
        }
    }
    out
}

pub fn predicted_stocks_section(
    snap: &Snapshot<PredictedStock>,
    setup: &Filter<Setup>,
    sector: &Filter<String>,
) -> PredictedStocksView {
    if snap.data.is_empty() {
        if snap.loading {
            return PredictedStocksView::Loading;
        }
        if let Some(err) = &snap.error {
            return PredictedStocksView::Error {
                message: err.clone(),
            };
        }
    }

    let sectors = sector_options(&snap.data);
    let by_setup = filters::apply(snap.data.as_slice(), setup, |s| &s.setup);
    let visible = filters::apply(&by_setup, sector, |s| &s.sector);
    if visible.is_empty() {
        return PredictedStocksView::Empty {
            message: EMPTY_MESSAGE,
            sectors,
        };
    }

    PredictedStocksView::Items {
        items: visible
            .into_iter()
            .map(|stock| StockCard {
                band: ConfidenceBand::of(stock.confidence.get()),
                stock,
            })
            .collect(),
        sectors,
        last_updated: snap.last_updated,
        refreshing: snap.loading,
        stale_error: snap.error.clone(),
    }
}

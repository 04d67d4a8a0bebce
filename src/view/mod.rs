//! Presentation bindings: pure functions from controller/loader state to
//! render-ready view models. Nothing here performs I/O.

pub mod filters;
pub mod format;
pub mod news;
pub mod report;
pub mod stocks;
pub mod text;

pub use filters::Filter;
pub use news::{news_section, NewsSectionView};
pub use report::{report_view, ReportTab, ReportView};
pub use stocks::{predicted_stocks_section, PredictedStocksView};

use serde::Serialize;

/// Direction marker shared by headlines and price changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Up,
    Down,
    Flat,
}

impl Tone {
    pub fn of_change(change: f64) -> Self {
        if change > 0.0 {
            Tone::Up
        } else if change < 0.0 {
            Tone::Down
        } else {
            Tone::Flat
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Tone::Up => "▲",
            Tone::Down => "▼",
            Tone::Flat => "–",
        }
    }
}

//! Single-symbol analysis loader for the report page.
//!
//! No timer: one `Loading → Ready | Failed` transition per `load`, plus a
//! manual `retry` that re-issues the same request. Loading another symbol or
//! calling `cancel` drops interest in whatever is still pending.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::controller::Sequencer;
use crate::error::Result;
use crate::models::StockAnalysisData;
use crate::symbol;

#[async_trait]
pub trait AnalysisSource: Send + Sync + 'static {
    async fn analyze(&self, symbol: &str) -> Result<StockAnalysisData>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    Loading {
        symbol: String,
    },
    Ready {
        symbol: String,
        data: Arc<StockAnalysisData>,
    },
    Failed {
        symbol: String,
        message: String,
    },
}

impl AnalysisState {
    /// Symbol the state refers to; `None` when idle.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            AnalysisState::Idle => None,
            AnalysisState::Loading { symbol }
            | AnalysisState::Ready { symbol, .. }
            | AnalysisState::Failed { symbol, .. } => Some(symbol),
        }
    }
}

struct Inner<S> {
    source: S,
    state: watch::Sender<AnalysisState>,
    seq: Sequencer,
}

pub struct AnalysisLoader<S: AnalysisSource> {
    inner: Arc<Inner<S>>,
}

impl<S: AnalysisSource> Clone for AnalysisLoader<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AnalysisSource> AnalysisLoader<S> {
    pub fn new(source: S) -> Self {
        let (state, _rx) = watch::channel(AnalysisState::Idle);
        Self {
            inner: Arc::new(Inner {
                source,
                state,
                seq: Sequencer::default(),
            }),
        }
    }

    pub fn state(&self) -> AnalysisState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.inner.state.subscribe()
    }

    /// Load `symbol` (normalized to `XYZ.NS`) and return the state once this
    /// load settles, or the newer state if it was superseded meanwhile.
    pub async fn load(&self, symbol: &str) -> AnalysisState {
        let seq = self.inner.seq.issue();
        let nse = match symbol::normalize(symbol) {
            Ok(s) => s,
            Err(e) => {
                let failed = AnalysisState::Failed {
                    symbol: symbol.trim().to_string(),
                    message: e.to_string(),
                };
                self.inner.state.send_replace(failed.clone());
                return failed;
            }
        };

        self.inner.state.send_replace(AnalysisState::Loading {
            symbol: nse.clone(),
        });
        debug!(target: "loader", symbol = %nse, seq, "loading analysis");

        let next = match self.inner.source.analyze(&nse).await {
            Ok(data) => {
                info!(target: "loader", symbol = %nse, "analysis ready");
                AnalysisState::Ready {
                    symbol: nse.clone(),
                    data: Arc::new(data),
                }
            }
            Err(e) => {
                warn!(target: "loader", symbol = %nse, error = %e, "analysis failed");
                AnalysisState::Failed {
                    symbol: nse.clone(),
                    message: e.to_string(),
                }
            }
        };
        let outcome = match &next {
            AnalysisState::Ready { .. } => "ok",
            _ => "error",
        };

        let applied = self.inner.state.send_if_modified(|s| {
            if !self.inner.seq.is_latest(seq) {
                return false;
            }
            *s = next;
            true
        });
        if applied {
            counter!("analysis_loads_total", "outcome" => outcome).increment(1);
        } else {
            debug!(target: "loader", symbol = %nse, seq, "result no longer wanted");
        }
        self.state()
    }

    /// Re-issue the request for the current symbol. No-op when idle.
    pub async fn retry(&self) -> AnalysisState {
        match self.state().symbol() {
            Some(sym) => {
                let sym = sym.to_string();
                self.load(&sym).await
            }
            None => AnalysisState::Idle,
        }
    }

    /// Navigation away: forget any pending result and go idle.
    pub fn cancel(&self) {
        self.inner.seq.bump();
        self.inner.state.send_replace(AnalysisState::Idle);
    }
}

// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod forms;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod symbol;
pub mod view;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::client::BackendTransport;
pub use crate::config::DashboardConfig;
pub use crate::controller::{ControllerHandle, RefreshController, Snapshot};
pub use crate::error::ClientError;
pub use crate::loader::{AnalysisLoader, AnalysisState};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "stock_sensor_dashboard=info,warn";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter; `DASHBOARD_LOG_JSON=1` switches to JSON lines.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("DASHBOARD_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

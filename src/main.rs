//! Stock Sensor dashboard: binary entrypoint.
//! Loads config, mounts the refresh controllers and serves the dashboard API.

use anyhow::Context;
use tracing::info;

use stock_sensor_dashboard::metrics::Metrics;
use stock_sensor_dashboard::{api, init_tracing, AppState, BackendTransport, DashboardConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; harmless when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = DashboardConfig::load().context("loading dashboard config")?;
    let addr = cfg.bind_addr()?;
    info!(
        target: "server",
        backend = %cfg.api_base_url,
        news_every = cfg.news_refresh_secs,
        stocks_every = cfg.stocks_refresh_secs,
        "starting dashboard"
    );

    let metrics = Metrics::init(&cfg)?;
    let transport = BackendTransport::with_timeout(&cfg.api_base_url, cfg.request_timeout());
    let state = AppState::new(transport, cfg.latest_news_limit);

    // Handles stop the timers when dropped at shutdown.
    let news = state.news.mount(cfg.news_refresh());
    let predicted = state.predicted.mount(cfg.stocks_refresh());

    let router = api::create_router(state).merge(metrics.router());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(target: "server", %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving dashboard")?;

    news.shutdown();
    predicted.shutdown();
    info!(target: "server", "stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler available; run until killed
        std::future::pending::<()>().await;
    }
}

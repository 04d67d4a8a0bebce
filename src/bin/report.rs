//! Terminal view of the dashboard, using the same view models as the server.
//!
//! Usage:
//!   report <SYMBOL> [overview|technical|fundamentals|financials]
//!   report news [All|Positive|Negative|Neutral]
//!   report stocks [All|VCP|IPO Base]

use anyhow::{anyhow, Context};

use stock_sensor_dashboard::client::{NewsClient, PredictedStocksClient, StockClient};
use stock_sensor_dashboard::models::{Sentiment, Setup};
use stock_sensor_dashboard::view::{self, text, Filter, ReportTab};
use stock_sensor_dashboard::{
    init_tracing, AnalysisLoader, BackendTransport, DashboardConfig, RefreshController,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let target = args
        .next()
        .ok_or_else(|| anyhow!("usage: report <SYMBOL|news|stocks> [filter|tab]"))?;
    let extra = args.collect::<Vec<_>>().join(" ");

    let cfg = DashboardConfig::load().context("loading dashboard config")?;
    let transport = BackendTransport::with_timeout(&cfg.api_base_url, cfg.request_timeout());

    let out = match target.as_str() {
        "news" => {
            let filter: Filter<Sentiment> = extra.parse().map_err(|e: String| anyhow!(e))?;
            let ctrl = RefreshController::new(NewsClient::new(transport).live_feed());
            ctrl.refresh().await;
            text::render_news(&view::news_section(&ctrl.snapshot(), &filter))
        }
        "stocks" => {
            let setup: Filter<Setup> = extra.parse().map_err(|e: String| anyhow!(e))?;
            let ctrl = RefreshController::new(PredictedStocksClient::new(transport).feed());
            ctrl.refresh().await;
            text::render_stocks(&view::predicted_stocks_section(
                &ctrl.snapshot(),
                &setup,
                &Filter::All,
            ))
        }
        symbol => {
            let tab: ReportTab = extra.parse().map_err(|e: String| anyhow!(e))?;
            let loader = AnalysisLoader::new(StockClient::new(transport));
            let st = loader.load(symbol).await;
            text::render_report(&view::report_view(&st, tab))
        }
    };
    print!("{out}");
    Ok(())
}

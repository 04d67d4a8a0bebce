//! Dashboard HTTP surface: the presentation bindings served as JSON.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::client::{
    BackendTransport, NewsClient, NewsFeed, PredictedStocksClient, PredictedStocksFeed,
    StockClient,
};
use crate::controller::RefreshController;
use crate::forms::{self, FormKind};
use crate::loader::AnalysisLoader;
use crate::models::{Sentiment, Setup, TriggerAck};
use crate::symbol;
use crate::view::{self, Filter, ReportTab, ReportView};

#[derive(Clone)]
pub struct AppState {
    pub news: RefreshController<NewsFeed>,
    pub predicted: RefreshController<PredictedStocksFeed>,
    pub news_client: NewsClient,
    pub predicted_client: PredictedStocksClient,
    pub stocks: StockClient,
    pub latest_news_limit: usize,
}

impl AppState {
    /// Wire clients and controllers over one shared transport. Controllers
    /// start unmounted from any timer; `main` mounts them.
    pub fn new(transport: BackendTransport, latest_news_limit: usize) -> Self {
        let news_client = NewsClient::new(transport.clone());
        let predicted_client = PredictedStocksClient::new(transport.clone());
        Self {
            news: RefreshController::new(news_client.live_feed()),
            predicted: RefreshController::new(predicted_client.feed()),
            news_client,
            predicted_client,
            stocks: StockClient::new(transport),
            latest_news_limit,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/news", get(news))
        .route("/api/news/refresh", post(news_refresh))
        .route("/api/news/hot", get(hot_news))
        .route("/api/news/latest", get(latest_news))
        .route("/api/predicted-stocks", get(predicted_stocks))
        .route("/api/predicted-stocks/refresh", post(predicted_refresh))
        .route("/api/predicted-stocks/vcp", get(vcp_results))
        .route("/api/predicted-stocks/ipo", get(ipo_results))
        .route("/api/stocks/search", get(search))
        .route("/api/stocks/popular", get(popular))
        .route("/api/stocks/{symbol}/report", get(report))
        .route("/api/admin/news/scrape", post(admin_scrape_news))
        .route("/api/admin/stocks/scrape", post(admin_scrape_stocks))
        .route("/api/admin/stocks/run-vcp", post(admin_run_vcp))
        .route("/api/admin/stocks/run-ipo", post(admin_run_ipo))
        .route("/api/forms/{kind}/validate", post(validate_form))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Parse an optional query filter; a bad value is the caller's fault.
fn filter_param<T>(q: &HashMap<String, String>, key: &str) -> Result<Filter<T>, Response>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match q.get(key) {
        None => Ok(Filter::All),
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| error_response(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

async fn news(State(state): State<AppState>, Query(q): Query<HashMap<String, String>>) -> Response {
    let filter = match filter_param::<Sentiment>(&q, "sentiment") {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let snap = state.news.snapshot();
    Json(view::news_section(&snap, &filter)).into_response()
}

async fn news_refresh(State(state): State<AppState>) -> StatusCode {
    info!(target: "server", "manual news refresh");
    state.news.spawn_refresh();
    StatusCode::ACCEPTED
}

async fn hot_news(State(state): State<AppState>) -> Response {
    match state.news_client.hot_news().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn latest_news(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let limit = q
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(state.latest_news_limit);
    match state.news_client.latest_news(limit).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn predicted_stocks(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let setup = match filter_param::<Setup>(&q, "setup") {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let sector = match filter_param::<String>(&q, "sector") {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let snap = state.predicted.snapshot();
    Json(view::predicted_stocks_section(&snap, &setup, &sector)).into_response()
}

async fn predicted_refresh(State(state): State<AppState>) -> StatusCode {
    info!(target: "server", "manual predicted-stocks refresh");
    state.predicted.spawn_refresh();
    StatusCode::ACCEPTED
}

async fn vcp_results(State(state): State<AppState>) -> Response {
    match state.predicted_client.vcp_results().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn ipo_results(State(state): State<AppState>) -> Response {
    match state.predicted_client.ipo_results().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn search(State(state): State<AppState>, Query(q): Query<HashMap<String, String>>) -> Response {
    let query = q.get("q").map(|s| s.trim()).unwrap_or_default();
    if query.is_empty() {
        return Json(Vec::<String>::new()).into_response();
    }
    match state.stocks.search(query).await {
        Ok(symbols) => Json(symbols).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn popular(State(state): State<AppState>) -> Response {
    match state.stocks.popular().await {
        Ok(symbols) => Json(symbols).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

/// One loader per request: each page view owns its own load/retry cycle,
/// so concurrent reports for different symbols never supersede each other.
async fn report(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let tab = match q.get("tab").map(|t| t.parse::<ReportTab>()).transpose() {
        Ok(t) => t.unwrap_or_default(),
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };
    if let Err(e) = symbol::normalize(&symbol) {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let loader = AnalysisLoader::new(state.stocks.clone());
    let st = loader.load(&symbol).await;
    match view::report_view(&st, tab) {
        ReportView::Error {
            symbol,
            message,
            retry,
        } => {
            warn!(target: "server", %symbol, error = %message, "report unavailable");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "symbol": symbol, "error": message, "retry": retry })),
            )
                .into_response()
        }
        v => Json(v).into_response(),
    }
}

fn trigger_response(job: &str, ack: Option<TriggerAck>) -> Response {
    match ack {
        Some(ack) => {
            info!(target: "server", job, success = ack.success, "backend job triggered");
            Json(ack).into_response()
        }
        None => error_response(StatusCode::BAD_GATEWAY, format!("Failed to trigger {job}")),
    }
}

async fn admin_scrape_news(State(state): State<AppState>) -> Response {
    trigger_response("news scrape", state.news_client.scrape_now().await)
}

async fn admin_scrape_stocks(State(state): State<AppState>) -> Response {
    trigger_response("stock scraping", state.predicted_client.scrape_stocks().await)
}

async fn admin_run_vcp(State(state): State<AppState>) -> Response {
    trigger_response("VCP analysis", state.predicted_client.run_vcp_analysis().await)
}

async fn admin_run_ipo(State(state): State<AppState>) -> Response {
    trigger_response("IPO analysis", state.predicted_client.run_ipo_analysis().await)
}

async fn validate_form(Path(kind): Path<String>, Json(body): Json<Value>) -> Response {
    let kind = match kind.parse::<FormKind>() {
        Ok(k) => k,
        Err(e) => return error_response(StatusCode::NOT_FOUND, e),
    };
    match forms::validate_json(kind, body) {
        Ok(v) => Json(v).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

// tests/dashboard_http.rs
//
// HTTP-level tests for the dashboard Router without opening a listening
// socket for it. The router is driven via tower::ServiceExt::oneshot; only
// the fake backend behind it runs on 127.0.0.1.
//
// Covered:
// - GET /health
// - GET /api/news (before and after a refresh, sentiment filter, bad filter)
// - GET /api/predicted-stocks (setup + sector filters)
// - GET /api/stocks/{symbol}/report (502 + retry on failure, tab rows on success)
// - POST /api/forms/{kind}/validate
// - POST /api/admin/... when the backend is down

mod common;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt as _; // for `oneshot`

use common::{analysis, news_item, predicted_stock, serve};
use stock_sensor_dashboard::{api, AppState, BackendTransport};

const BODY_LIMIT: usize = 1024 * 1024;

fn fake_backend() -> Router {
    Router::new()
        .route(
            "/api/news/live-news",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": [
                        news_item("1", "Sensex gains", "Positive"),
                        news_item("2", "Metal stocks drag", "Negative"),
                        news_item("3", "Banks rally", "Positive")
                    ]
                }))
            }),
        )
        .route(
            "/api/predict/predicted-stocks",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": [
                        predicted_stock("1", "DIXON", "VCP", "Electronics", 88),
                        predicted_stock("2", "TATAELXSI", "IPO Base", "IT", 72),
                        predicted_stock("3", "KPITTECH", "VCP", "IT", 64)
                    ]
                }))
            }),
        )
        .route(
            "/api/stocks/analyze/{symbol}",
            get(|axum::extract::Path(symbol): axum::extract::Path<String>| async move {
                if symbol == "FAIL.NS" {
                    (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response()
                } else {
                    Json(json!({"success": true, "data": analysis(&symbol)})).into_response()
                }
            }),
        )
}

async fn test_state() -> AppState {
    let base = serve(fake_backend()).await;
    AppState::new(BackendTransport::new(&base), 5)
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .oneshot(req.body(body).expect("build request"))
        .await
        .expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

async fn call_json(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = call(app, method, uri, body).await;
    let v = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let app = api::create_router(test_state().await);
    let (status, bytes) = call(app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap().trim(), "OK");
}

#[tokio::test]
async fn news_is_empty_until_refreshed_then_filterable() {
    let state = test_state().await;

    let (status, v) = call_json(api::create_router(state.clone()), "GET", "/api/news", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["state"], "empty");

    state.news.refresh().await;

    let (status, v) = call_json(
        api::create_router(state.clone()),
        "GET",
        "/api/news?sentiment=Positive",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["state"], "items");
    let ids: Vec<_> = v["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["1", "3"]);
    assert_eq!(v["items"][0]["tone"], "up");
    assert!(v["last_updated"].is_string());
}

#[tokio::test]
async fn unknown_sentiment_is_bad_request() {
    let app = api::create_router(test_state().await);
    let (status, v) = call_json(app, "GET", "/api/news?sentiment=bullish", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().contains("bullish"));
}

#[tokio::test]
async fn manual_refresh_is_accepted() {
    let app = api::create_router(test_state().await);
    let (status, _) = call(app, "POST", "/api/news/refresh", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn predicted_stocks_filter_by_setup_and_sector() {
    let state = test_state().await;
    state.predicted.refresh().await;

    let (status, v) = call_json(
        api::create_router(state),
        "GET",
        "/api/predicted-stocks?setup=VCP&sector=IT",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["state"], "items");
    assert_eq!(v["items"].as_array().unwrap().len(), 1);
    assert_eq!(v["items"][0]["symbol"], "KPITTECH");
    assert_eq!(v["items"][0]["band"], "medium");
    assert_eq!(v["sectors"], json!(["All", "Electronics", "IT"]));
}

#[tokio::test]
async fn report_failure_is_bad_gateway_with_retry() {
    let app = api::create_router(test_state().await);
    let (status, v) = call_json(app, "GET", "/api/stocks/fail/report", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["retry"], true);
    assert_eq!(v["symbol"], "FAIL");
    assert!(v["error"].as_str().unwrap().starts_with("HTTP error! status: 500"));
}

#[tokio::test]
async fn report_renders_requested_tab() {
    let app = api::create_router(test_state().await);
    let (status, v) = call_json(app, "GET", "/api/stocks/TCS/report?tab=technical", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["state"], "report");
    assert_eq!(v["tab"], "technical");
    assert_eq!(v["header"]["symbol"], "TCS");
    assert_eq!(v["header"]["change"], "₹45.00 (+1.17%)");
    let rows = v["rows"].as_array().unwrap();
    assert_eq!(rows[0], json!({"label": "R3", "value": "₹4,010.00"}));
    assert!(rows.iter().any(|r| r["label"] == "RSI (14)" && r["value"] == "56.20"));
}

#[tokio::test]
async fn report_rejects_symbol_with_path_characters() {
    let app = api::create_router(test_state().await);
    let (status, v) = call_json(app, "GET", "/api/stocks/X%2FY/report", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().starts_with("invalid symbol"));
}

#[tokio::test]
async fn report_rejects_unknown_tab() {
    let app = api::create_router(test_state().await);
    let (status, _) = call_json(app, "GET", "/api/stocks/TCS/report?tab=chart", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn form_validation_reports_field_errors() {
    let state = test_state().await;

    let (status, v) = call_json(
        api::create_router(state.clone()),
        "POST",
        "/api/forms/login/validate",
        Some(json!({"email": "nobody", "password": "123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["valid"], false);
    assert_eq!(v["errors"]["email"], "Please enter a valid email");
    assert_eq!(v["errors"]["password"], "Password must be at least 6 characters");

    let (status, v) = call_json(
        api::create_router(state.clone()),
        "POST",
        "/api/forms/contact/validate",
        Some(json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "subject": "Hello",
            "message": "Please add BSE coverage."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, json!({"valid": true, "errors": {}}));

    let (status, _) = call_json(
        api::create_router(state),
        "POST",
        "/api/forms/register/validate",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_trigger_is_bad_gateway_when_backend_fails() {
    // the fake backend has no trigger routes, so every job call gets a 404
    let app = api::create_router(test_state().await);
    let (status, v) = call_json(app, "POST", "/api/admin/stocks/run-ipo", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["error"], "Failed to trigger IPO analysis");
}

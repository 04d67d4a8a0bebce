// tests/client_backend.rs
//
// Clients, controllers and the analysis loader against a fake backend
// served over real HTTP on 127.0.0.1.
//
// Covered:
// - envelope `data` passthrough, success:false and HTTP 500 for list fetches
// - latest-news slicing, raw VCP remapping, trigger endpoints, search body
// - refresh controller keeps data when a later refresh fails
// - analyze 500 → Failed → retry re-issues the identical request
// - "N/A" indicators and financials, symbols that would escape the path

mod common;

use std::sync::{Arc, Mutex};

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use common::{analysis, news_item, predicted_stock, serve, Hits};
use stock_sensor_dashboard::client::{NewsClient, PredictedStocksClient, StockClient};
use stock_sensor_dashboard::models::{Sentiment, Setup};
use stock_sensor_dashboard::view::{self, Filter, ReportTab, ReportView};
use stock_sensor_dashboard::{
    AnalysisLoader, AnalysisState, BackendTransport, ClientError, RefreshController,
};

#[tokio::test]
async fn live_news_returns_envelope_data() {
    let app = Router::new().route(
        "/api/news/live-news",
        get(|| async {
            Json(json!({
                "success": true,
                "count": 2,
                "data": [
                    news_item("1", "Nifty hits record", "Positive"),
                    news_item("2", "Rupee slips", "negative")
                ]
            }))
        }),
    );
    let base = serve(app).await;

    let items = NewsClient::new(BackendTransport::new(&base))
        .live_news()
        .await
        .expect("live news");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].headline, "Nifty hits record");
    assert_eq!(items[1].sentiment, Sentiment::Negative);
}

#[tokio::test]
async fn list_fetches_swallow_failures() {
    let app = Router::new()
        .route(
            "/api/news/hot-news",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/api/predict/predicted-stocks",
            get(|| async { Json(json!({"success": false, "message": "scanner offline"})) }),
        );
    let base = serve(app).await;
    let transport = BackendTransport::new(&base);

    let hot = NewsClient::new(transport.clone()).hot_news().await.unwrap();
    assert!(hot.is_empty());

    let stocks = PredictedStocksClient::new(transport)
        .predicted_stocks()
        .await
        .unwrap();
    assert!(stocks.is_empty());
}

#[tokio::test]
async fn latest_news_is_sliced_client_side() {
    let app = Router::new().route(
        "/api/news/latest-news",
        get(|| async {
            let data: Vec<Value> = (1..=8)
                .map(|i| news_item(&i.to_string(), &format!("headline {i}"), "Neutral"))
                .collect();
            Json(json!({"success": true, "data": data, "count": 8}))
        }),
    );
    let base = serve(app).await;

    let items = NewsClient::new(BackendTransport::new(&base))
        .latest_news(5)
        .await
        .unwrap();
    let ids: Vec<_> = items.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn vcp_results_are_remapped() {
    let app = Router::new().route(
        "/api/predict/vcp-results",
        get(|| async {
            Json(json!({
                "success": true,
                "data": [
                    {"_id": "a1", "symbol": "DIXON", "stock_name": "Dixon Technologies",
                     "current_price": 14250.5, "sector": "Electronics", "confidence": "85%"},
                    {"symbol": "KPITTECH", "confidence": "58%"}
                ]
            }))
        }),
    );
    let base = serve(app).await;

    let rows = PredictedStocksClient::new(BackendTransport::new(&base))
        .vcp_results()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Dixon Technologies");
    assert_eq!(rows[0].confidence.get(), 85);
    assert_eq!(rows[0].target_return, "8-12%");
    assert_eq!(rows[0].setup, Setup::Vcp);
    assert_eq!(rows[1].id, "2");
    assert_eq!(rows[1].sector, "Unknown");
    assert_eq!(rows[1].target_return, "4-8%");
}

#[tokio::test]
async fn triggers_return_ack_or_none() {
    let app = Router::new()
        .route(
            "/api/news/scrape-now",
            post(|| async { Json(json!({"success": true, "message": "Scraping started"})) }),
        )
        .route(
            "/api/predict/run-vcp-analysis",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
    let base = serve(app).await;
    let transport = BackendTransport::new(&base);

    let ack = NewsClient::new(transport.clone())
        .scrape_now()
        .await
        .expect("ack");
    assert!(ack.success);
    assert_eq!(ack.message, "Scraping started");

    assert!(PredictedStocksClient::new(transport)
        .run_vcp_analysis()
        .await
        .is_none());
}

#[tokio::test]
async fn search_posts_query_body() {
    let app = Router::new().route(
        "/api/stocks/search",
        post(|Json(body): Json<Value>| async move {
            let q = body["query"].as_str().unwrap_or_default().to_string();
            Json(json!({"success": true, "data": [format!("{q}.NS")]}))
        }),
    );
    let base = serve(app).await;

    let out = StockClient::new(BackendTransport::new(&base))
        .search("INFY")
        .await
        .unwrap();
    assert_eq!(out, vec!["INFY.NS".to_string()]);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_items() {
    let hits = Hits::default();
    let h = hits.clone();
    let app = Router::new().route(
        "/api/news/live-news",
        get(move || {
            let h = h.clone();
            async move {
                if h.bump() == 1 {
                    Json(json!({"success": true, "data": [news_item("1", "first", "Positive")]}))
                        .into_response()
                } else {
                    (StatusCode::BAD_GATEWAY, "upstream down").into_response()
                }
            }
        }),
    );
    let base = serve(app).await;

    let ctrl = RefreshController::new(NewsClient::new(BackendTransport::new(&base)).live_feed());
    ctrl.refresh().await;
    let first = ctrl.snapshot();
    assert_eq!(first.data.len(), 1);
    assert!(first.last_updated.is_some());

    ctrl.refresh().await;
    let second = ctrl.snapshot();
    assert_eq!(second.data.len(), 1, "failed refresh must not clear data");
    assert_eq!(second.last_updated, first.last_updated);
    let err = second.error.clone().expect("error recorded");
    assert!(err.starts_with("HTTP error! status: 502"), "{err}");
    assert_eq!(hits.get(), 2);

    match view::news_section(&second, &Filter::All) {
        view::NewsSectionView::Items { stale_error, .. } => assert!(stale_error.is_some()),
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn empty_predicted_stocks_render_as_empty_not_error() {
    let app = Router::new().route(
        "/api/predict/predicted-stocks",
        get(|| async {
            Json(json!({"success": true, "data": [], "count": 0, "vcp_count": 0, "ipo_count": 0}))
        }),
    );
    let base = serve(app).await;

    let ctrl = RefreshController::new(
        PredictedStocksClient::new(BackendTransport::new(&base)).feed(),
    );
    ctrl.refresh().await;
    let v = view::predicted_stocks_section(&ctrl.snapshot(), &Filter::All, &Filter::All);
    assert!(
        matches!(v, view::PredictedStocksView::Empty { message, .. } if message == "No stocks available"),
        "got {v:?}"
    );
}

#[tokio::test]
async fn predicted_feed_decodes_combined_list() {
    let app = Router::new().route(
        "/api/predict/predicted-stocks",
        get(|| async {
            Json(json!({
                "success": true,
                "data": [
                    predicted_stock("1", "TATAELXSI", "IPO Base", "IT", 72),
                    predicted_stock("2", "DIXON", "VCP", "Electronics", 88)
                ],
                "count": 2
            }))
        }),
    );
    let base = serve(app).await;

    let ctrl = RefreshController::new(
        PredictedStocksClient::new(BackendTransport::new(&base)).feed(),
    );
    ctrl.refresh().await;
    let v = view::predicted_stocks_section(&ctrl.snapshot(), &Filter::Only(Setup::Vcp), &Filter::All);
    match v {
        view::PredictedStocksView::Items { items, sectors, .. } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].stock.symbol, "DIXON");
            assert_eq!(sectors, ["All", "IT", "Electronics"]);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn analyze_failure_then_retry_reissues_same_request() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let s = seen.clone();
    let app = Router::new().route(
        "/api/stocks/analyze/{symbol}",
        get(move |Path(symbol): Path<String>| {
            let s = s.clone();
            async move {
                let n = {
                    let mut v = s.lock().unwrap();
                    v.push(symbol.clone());
                    v.len()
                };
                if n == 1 {
                    (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response()
                } else {
                    Json(json!({"success": true, "timestamp": "2024-01-01T00:00:00Z", "data": analysis(&symbol)}))
                        .into_response()
                }
            }
        }),
    );
    let base = serve(app).await;

    let loader = AnalysisLoader::new(StockClient::new(BackendTransport::new(&base)));
    let st = loader.load("tcs").await;
    assert!(matches!(st, AnalysisState::Failed { ref symbol, .. } if symbol == "TCS.NS"));
    match view::report_view(&st, ReportTab::Overview) {
        ReportView::Error { message, retry, .. } => {
            assert!(retry);
            assert!(!message.is_empty());
        }
        other => panic!("unexpected view {other:?}"),
    }

    let st = loader.retry().await;
    match view::report_view(&st, ReportTab::Overview) {
        ReportView::Report { header, .. } => {
            assert_eq!(header.symbol, "TCS");
            assert_eq!(header.change, "₹45.00 (+1.17%)");
        }
        other => panic!("unexpected view {other:?}"),
    }
    assert_eq!(*seen.lock().unwrap(), vec!["TCS.NS".to_string(), "TCS.NS".to_string()]);
}

#[tokio::test]
async fn analyze_envelope_failure_carries_backend_message() {
    let app = Router::new().route(
        "/api/stocks/analyze/{symbol}",
        get(|| async { Json(json!({"success": false, "error": "Stock not found"})) }),
    );
    let base = serve(app).await;

    let err = StockClient::new(BackendTransport::new(&base))
        .analyze("NOPE")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Envelope(ref m) if m == "Stock not found"));
}

#[tokio::test]
async fn analyze_accepts_unavailable_indicators_and_financials() {
    let app = Router::new().route(
        "/api/stocks/analyze/{symbol}",
        get(|Path(symbol): Path<String>| async move {
            let mut data = analysis(&symbol);
            data["technical"]["technical_indicators"]["rsi_14"] = json!("N/A");
            data["financial"] = json!({
                "revenue_profit": {"revenue_ttm": "N/A", "net_profit_ttm": "N/A"},
                "balance_sheet": {"total_debt": "N/A", "debt_equity": "N/A", "current_ratio": "N/A"}
            });
            Json(json!({"success": true, "data": data}))
        }),
    );
    let base = serve(app).await;

    let loader = AnalysisLoader::new(StockClient::new(BackendTransport::new(&base)));
    let st = loader.load("NEWCO").await;
    match view::report_view(&st, ReportTab::Financials) {
        ReportView::Report { rows, .. } => {
            assert_eq!(rows.len(), 5);
            assert!(rows.iter().all(|r| r.value == "N/A"), "{rows:?}");
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn analyze_rejects_symbols_that_would_change_the_path() {
    let hits = Hits::default();
    let h = hits.clone();
    let app = Router::new().fallback(move || {
        let h = h.clone();
        async move {
            h.bump();
            Json(json!({"success": true, "data": []}))
        }
    });
    let base = serve(app).await;
    let client = StockClient::new(BackendTransport::new(&base));

    for s in ["A?B", "../../news/live-news#", "X/Y"] {
        let err = client.analyze(s).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidSymbol(_)), "{s}: {err:?}");
    }
    assert_eq!(hits.get(), 0);
}

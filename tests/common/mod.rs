// tests/common/mod.rs
//
// Fake Stock Sensor backend: an axum Router bound to 127.0.0.1:0.
// Each test builds the routes it needs and gets back the `/api` base URL.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use serde_json::{json, Value};

/// Serve `app` on an ephemeral port; returns `http://127.0.0.1:<port>/api`.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });
    format!("http://{addr}/api")
}

/// Shared request counter for handlers that need to see retries.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    /// Record one hit and return the running total.
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn news_item(id: &str, headline: &str, sentiment: &str) -> Value {
    json!({
        "id": id,
        "headline": headline,
        "timestamp": "2 hours ago",
        "sentiment": sentiment,
        "source": "Economic Times",
        "summary": "",
        "url": "https://example.com/n"
    })
}

pub fn predicted_stock(id: &str, symbol: &str, setup: &str, sector: &str, confidence: u8) -> Value {
    json!({
        "id": id,
        "symbol": symbol,
        "name": symbol,
        "price": 1234.5,
        "setup": setup,
        "sector": sector,
        "targetReturn": "8-12%",
        "timeline": "2 weeks",
        "confidence": confidence
    })
}

pub fn analysis(symbol: &str) -> Value {
    json!({
        "symbol": symbol,
        "heading": {
            "sector": "IT",
            "full_name": "Tata Consultancy Services",
            "current_price": 3890.5,
            "change_price": 45.0,
            "change_percent": 1.17
        },
        "overview": {"market_cap": 14100000000000.0, "pe_ratio": 29.8, "52w_high": 4592.25, "52w_low": 3311.0},
        "technical": {
            "support_resistance": {
                "resistance_levels": {"R1": 3920.0, "R2": 3975.5, "R3": 4010.0},
                "current_level": 3890.5,
                "support_levels": {"S1": 3850.0, "S2": 3800.0, "S3": 3755.0}
            },
            "technical_indicators": {
                "rsi_14": 56.2,
                "macd": {"macd_line": 12.1, "signal_line": 10.4, "histogram": 1.7},
                "volume_trend": "Increasing"
            }
        },
        "financial": {
            "revenue_profit": {"revenue_ttm": 2400000000000.0, "net_profit_ttm": 460000000000.0},
            "balance_sheet": {"total_debt": 0.0, "debt_equity": 0.1, "current_ratio": 2.4}
        }
    })
}

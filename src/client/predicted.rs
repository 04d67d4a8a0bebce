use async_trait::async_trait;
use serde_json::Value;

use super::{BackendTransport, HttpMethod, OnError, Operation};
use crate::controller::CollectionSource;
use crate::error::Result;
use crate::models::de::id_from_value;
use crate::models::{Confidence, PredictedStock, Setup, TriggerAck};

pub const PREDICTED_STOCKS: Operation = Operation {
    name: "predicted_stocks",
    method: HttpMethod::Get,
    path: "/predict/predicted-stocks",
    fallback_message: "Failed to fetch predicted stocks",
    on_error: OnError::Empty,
};

pub const VCP_RESULTS: Operation = Operation {
    name: "vcp_results",
    method: HttpMethod::Get,
    path: "/predict/vcp-results",
    fallback_message: "Failed to fetch VCP results",
    on_error: OnError::Empty,
};

pub const IPO_RESULTS: Operation = Operation {
    name: "ipo_results",
    method: HttpMethod::Get,
    path: "/predict/ipo-results",
    fallback_message: "Failed to fetch IPO results",
    on_error: OnError::Empty,
};

pub const SCRAPE_STOCKS: Operation = Operation {
    name: "scrape_stocks",
    method: HttpMethod::Post,
    path: "/predict/scrape-stocks",
    fallback_message: "Failed to trigger stock scraping",
    on_error: OnError::Empty,
};

pub const RUN_VCP_ANALYSIS: Operation = Operation {
    name: "run_vcp_analysis",
    method: HttpMethod::Post,
    path: "/predict/run-vcp-analysis",
    fallback_message: "Failed to trigger VCP analysis",
    on_error: OnError::Empty,
};

pub const RUN_IPO_ANALYSIS: Operation = Operation {
    name: "run_ipo_analysis",
    method: HttpMethod::Post,
    path: "/predict/run-ipo-analysis",
    fallback_message: "Failed to trigger IPO analysis",
    on_error: OnError::Empty,
};

#[derive(Clone, Debug)]
pub struct PredictedStocksClient {
    transport: BackendTransport,
}

impl PredictedStocksClient {
    pub fn new(transport: BackendTransport) -> Self {
        Self { transport }
    }

    /// Combined VCP + IPO-base list, already in display shape.
    pub async fn predicted_stocks(&self) -> Result<Vec<PredictedStock>> {
        self.fetch(PREDICTED_STOCKS).await
    }

    pub async fn fetch(&self, op: Operation) -> Result<Vec<PredictedStock>> {
        let res = self
            .transport
            .envelope::<Vec<PredictedStock>>(&op, op.path, None)
            .await
            .map(|env| env.data.unwrap_or_default());
        op.settle(res)
    }

    /// Raw VCP scanner rows, remapped to [`PredictedStock`].
    pub async fn vcp_results(&self) -> Result<Vec<PredictedStock>> {
        self.raw_results(VCP_RESULTS, Setup::Vcp).await
    }

    /// Raw IPO-base scanner rows, remapped to [`PredictedStock`].
    pub async fn ipo_results(&self) -> Result<Vec<PredictedStock>> {
        self.raw_results(IPO_RESULTS, Setup::IpoBase).await
    }

    async fn raw_results(&self, op: Operation, setup: Setup) -> Result<Vec<PredictedStock>> {
        let res = self
            .transport
            .envelope::<Vec<Value>>(&op, op.path, None)
            .await
            .map(|env| remap_results(env.data.unwrap_or_default(), setup));
        op.settle(res)
    }

    pub async fn scrape_stocks(&self) -> Option<TriggerAck> {
        self.trigger(SCRAPE_STOCKS).await
    }

    pub async fn run_vcp_analysis(&self) -> Option<TriggerAck> {
        self.trigger(RUN_VCP_ANALYSIS).await
    }

    pub async fn run_ipo_analysis(&self) -> Option<TriggerAck> {
        self.trigger(RUN_IPO_ANALYSIS).await
    }

    async fn trigger(&self, op: Operation) -> Option<TriggerAck> {
        let res = self
            .transport
            .json::<TriggerAck>(&op, op.path)
            .await
            .map(Some);
        op.settle(res).ok().flatten()
    }

    /// Combined list as a controller source (failures propagate).
    pub fn feed(&self) -> PredictedStocksFeed {
        PredictedStocksFeed {
            client: self.clone(),
            op: PREDICTED_STOCKS.on_error(OnError::Throw),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PredictedStocksFeed {
    client: PredictedStocksClient,
    op: Operation,
}

#[async_trait]
impl CollectionSource for PredictedStocksFeed {
    type Item = PredictedStock;

    async fn fetch(&self) -> Result<Vec<PredictedStock>> {
        self.client.fetch(self.op).await
    }

    fn name(&self) -> &'static str {
        self.op.name
    }
}

/// Map raw scanner rows onto the display record.
///
/// Field names differ from the combined endpoint (`stock_name`,
/// `current_price`, `"85%"` confidence); ids fall back to the 1-based row
/// index.
pub fn remap_results(rows: Vec<Value>, setup: Setup) -> Vec<PredictedStock> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| remap_row(idx, row, setup))
        .collect()
}

fn remap_row(idx: usize, row: Value, setup: Setup) -> PredictedStock {
    let text = |key: &str| row.get(key).and_then(Value::as_str).map(str::to_string);

    let confidence = parse_confidence(row.get("confidence"));
    PredictedStock {
        id: row
            .get("_id")
            .and_then(id_from_value)
            .unwrap_or_else(|| (idx + 1).to_string()),
        symbol: text("symbol").unwrap_or_default(),
        name: text("stock_name").unwrap_or_default(),
        price: row.get("current_price").and_then(Value::as_f64).unwrap_or(0.0),
        setup,
        sector: text("sector")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        target_return: target_return_for(confidence).to_string(),
        timeline: "Recent".to_string(),
        confidence,
        original_data: Some(row),
    }
}

/// `"85%"` → 85, `"72.5%"` → 72, `90` → 90; anything unreadable → 0.
pub fn parse_confidence(v: Option<&Value>) -> Confidence {
    match v {
        Some(Value::String(s)) => Confidence::saturating(leading_int(&s.replace('%', ""))),
        Some(Value::Number(n)) => {
            let pct = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(0);
            Confidence::saturating(pct)
        }
        _ => Confidence::saturating(0),
    }
}

// Integer prefix after optional whitespace and sign; 0 when there is none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let n = digits[..end].parse::<i64>().unwrap_or(0);
    if neg {
        -n
    } else {
        n
    }
}

/// Display target band derived from confidence.
pub fn target_return_for(confidence: Confidence) -> &'static str {
    match confidence.get() {
        80.. => "8-12%",
        60..=79 => "6-10%",
        _ => "4-8%",
    }
}

use async_trait::async_trait;
use serde_json::json;

use super::{BackendTransport, HttpMethod, OnError, Operation};
use crate::error::{ClientError, Result};
use crate::loader::AnalysisSource;
use crate::models::StockAnalysisData;
use crate::symbol;

pub const ANALYZE: Operation = Operation {
    name: "analyze_stock",
    method: HttpMethod::Get,
    path: "/stocks/analyze",
    fallback_message: "Failed to analyze stock",
    on_error: OnError::Throw,
};

pub const SEARCH: Operation = Operation {
    name: "search_stocks",
    method: HttpMethod::Post,
    path: "/stocks/search",
    fallback_message: "Failed to search stocks",
    on_error: OnError::Empty,
};

pub const POPULAR: Operation = Operation {
    name: "popular_stocks",
    method: HttpMethod::Get,
    path: "/stocks/popular",
    fallback_message: "Failed to get popular stocks",
    on_error: OnError::Empty,
};

#[derive(Clone, Debug)]
pub struct StockClient {
    transport: BackendTransport,
}

impl StockClient {
    pub fn new(transport: BackendTransport) -> Self {
        Self { transport }
    }

    /// Full analysis bundle for one NSE symbol. The `.NS` suffix is added
    /// when missing. Errors are returned to the caller.
    pub async fn analyze(&self, symbol: &str) -> Result<StockAnalysisData> {
        let res = self.analyze_inner(symbol).await;
        ANALYZE.settle(res)
    }

    async fn analyze_inner(&self, symbol: &str) -> Result<StockAnalysisData> {
        let nse = symbol::normalize(symbol)?;
        let path = format!("{}/{}", ANALYZE.path, nse);
        let env = self
            .transport
            .envelope::<StockAnalysisData>(&ANALYZE, &path, None)
            .await?;
        env.data
            .ok_or_else(|| ClientError::Envelope(ANALYZE.fallback_message.to_string()))
    }

    /// Symbol lookup; empty on any failure.
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let body = json!({ "query": query });
        let res = self
            .transport
            .envelope::<Vec<String>>(&SEARCH, SEARCH.path, Some(&body))
            .await
            .map(|env| env.data.unwrap_or_default());
        SEARCH.settle(res)
    }

    pub async fn popular(&self) -> Result<Vec<String>> {
        let res = self
            .transport
            .envelope::<Vec<String>>(&POPULAR, POPULAR.path, None)
            .await
            .map(|env| env.data.unwrap_or_default());
        POPULAR.settle(res)
    }
}

#[async_trait]
impl AnalysisSource for StockClient {
    async fn analyze(&self, symbol: &str) -> Result<StockAnalysisData> {
        StockClient::analyze(self, symbol).await
    }
}

//! HTTP clients for the Stock Sensor backend.
//!
//! Every backend call is declared once as an [`Operation`]: method, path,
//! fallback failure text and what to do when it fails ([`OnError`]). The
//! per-domain clients ([`NewsClient`], [`PredictedStocksClient`],
//! [`StockClient`]) are thin wrappers that pick the operation and decode the
//! payload. They share one [`BackendTransport`], which is built by the caller
//! and injected; there are no process-wide client instances.

pub mod news;
pub mod predicted;
pub mod stocks;

pub use news::{NewsClient, NewsFeed};
pub use predicted::{PredictedStocksClient, PredictedStocksFeed};
pub use stocks::StockClient;

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::models::Envelope;

/// Backend used when neither env nor config file names one.
pub const DEFAULT_API_BASE_URL: &str = "https://stock-sensor-backend.onrender.com/api";

/// What a failed operation hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Log, count, and return the operation's empty value (`[]`, `None`).
    Empty,
    /// Return the error.
    Throw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Static description of one backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Metric/log label.
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path below the base URL. Path parameters are appended by the client.
    pub path: &'static str,
    /// Used when the envelope says `success: false` without a message.
    pub fallback_message: &'static str,
    pub on_error: OnError,
}

impl Operation {
    /// Same call with a different failure policy.
    pub const fn on_error(self, on_error: OnError) -> Self {
        Self { on_error, ..self }
    }

    /// Apply this operation's failure policy to a finished call.
    pub fn settle<T: Default>(&self, res: Result<T>) -> Result<T> {
        match (res, self.on_error) {
            (Ok(v), _) => Ok(v),
            (Err(e), OnError::Throw) => Err(e),
            (Err(e), OnError::Empty) => {
                warn!(target: "client", operation = self.name, error = %e, "backend call failed, returning empty");
                Ok(T::default())
            }
        }
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "backend_requests_total",
            "Backend calls by operation and outcome."
        );
        describe_histogram!(
            "backend_request_ms",
            "Backend call latency in milliseconds."
        );
    });
}

/// Shared HTTP plumbing: one `reqwest::Client` plus the resolved base URL.
///
/// Cheap to clone.
#[derive(Clone, Debug)]
pub struct BackendTransport {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl BackendTransport {
    /// Transport without a request timeout: a hanging backend keeps the caller waiting.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "stock-sensor-dashboard/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().unwrap_or_else(|e| {
            warn!(target: "client", error = %e, "falling back to default HTTP client");
            reqwest::Client::new()
        });
        Self {
            http,
            base_url: Arc::from(base_url.as_ref().trim().trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// One request, status checked, body returned as text.
    async fn send(
        &self,
        op: &Operation,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String> {
        ensure_metrics_described();
        let url = self.url(path);
        let started = Instant::now();

        let req = match op.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        let req = match body {
            Some(b) => req.json(b),
            // trigger endpoints expect a JSON content type even without a body
            None if op.method == HttpMethod::Post => {
                req.header(reqwest::header::CONTENT_TYPE, "application/json")
            }
            None => req,
        };

        let res = execute(req).await;

        let ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("backend_request_ms", "operation" => op.name).record(ms);
        debug!(target: "client", operation = op.name, %url, ms, ok = res.is_ok(), "backend call");
        if let Err(e) = &res {
            counter!("backend_requests_total", "operation" => op.name, "outcome" => e.kind())
                .increment(1);
        }
        res
    }

    /// Send, decode the envelope and reject `success: false`.
    pub(crate) async fn envelope<T: DeserializeOwned>(
        &self,
        op: &Operation,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Envelope<T>> {
        let text = self.send(op, path, body).await?;
        let res = serde_json::from_str::<Envelope<T>>(&text)
            .map_err(ClientError::from)
            .and_then(|env| {
                if env.success {
                    Ok(env)
                } else {
                    let msg = env.failure_text().unwrap_or(op.fallback_message);
                    Err(ClientError::Envelope(msg.to_string()))
                }
            });
        let outcome = match &res {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        counter!("backend_requests_total", "operation" => op.name, "outcome" => outcome)
            .increment(1);
        res
    }

    /// Send and decode the body as `T` directly (no envelope check).
    pub(crate) async fn json<T: DeserializeOwned>(&self, op: &Operation, path: &str) -> Result<T> {
        let text = self.send(op, path, None).await?;
        let res = serde_json::from_str::<T>(&text).map_err(ClientError::from);
        let outcome = match &res {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        counter!("backend_requests_total", "operation" => op.name, "outcome" => outcome)
            .increment(1);
        res
    }
}

async fn execute(req: reqwest::RequestBuilder) -> Result<String> {
    let resp = req.send().await?;
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(text)
}

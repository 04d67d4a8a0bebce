// src/config/dashboard.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use tracing::warn;

use crate::client::news::DEFAULT_LATEST_LIMIT;
use crate::client::DEFAULT_API_BASE_URL;

pub const ENV_CONFIG_PATH: &str = "STOCK_SENSOR_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

const DEFAULT_NEWS_REFRESH_SECS: u64 = 300;
const DEFAULT_STOCKS_REFRESH_SECS: u64 = 600;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub news_refresh_secs: u64,
    pub stocks_refresh_secs: u64,
    pub latest_news_limit: usize,
    /// No client-side timeout when unset.
    pub request_timeout_secs: Option<u64>,
    pub bind_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            news_refresh_secs: DEFAULT_NEWS_REFRESH_SECS,
            stocks_refresh_secs: DEFAULT_STOCKS_REFRESH_SECS,
            latest_news_limit: DEFAULT_LATEST_LIMIT,
            request_timeout_secs: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let cfg: DashboardConfig = toml::from_str(&data)
            .with_context(|| format!("parsing dashboard config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolve config the usual way:
    /// 1) $STOCK_SENSOR_CONFIG_PATH (must exist)
    /// 2) config/dashboard.toml
    /// 3) built-in defaults
    ///
    /// Environment overrides are applied on top.
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            Self::load_from_file(&pb)?
        } else {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Self::load_from_file(&default)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env()?;
        Ok(cfg.sanitized())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = env_str("STOCK_SENSOR_API_URL") {
            self.api_base_url = url;
        }
        if let Some(secs) = env_u64("NEWS_REFRESH_SECS")? {
            self.news_refresh_secs = secs;
        }
        if let Some(secs) = env_u64("STOCKS_REFRESH_SECS")? {
            self.stocks_refresh_secs = secs;
        }
        if let Some(secs) = env_u64("REQUEST_TIMEOUT_SECS")? {
            self.request_timeout_secs = Some(secs);
        }
        if let Some(addr) = env_str("DASHBOARD_BIND_ADDR") {
            self.bind_addr = addr;
        }
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        let url = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if url.is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            url.to_string()
        };
        if self.news_refresh_secs == 0 {
            warn!(target: "config", "news_refresh_secs = 0, using {DEFAULT_NEWS_REFRESH_SECS}");
            self.news_refresh_secs = DEFAULT_NEWS_REFRESH_SECS;
        }
        if self.stocks_refresh_secs == 0 {
            warn!(target: "config", "stocks_refresh_secs = 0, using {DEFAULT_STOCKS_REFRESH_SECS}");
            self.stocks_refresh_secs = DEFAULT_STOCKS_REFRESH_SECS;
        }
        if self.latest_news_limit == 0 {
            self.latest_news_limit = DEFAULT_LATEST_LIMIT;
        }
        // zero would fail every request immediately
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
        self
    }

    pub fn news_refresh(&self) -> Duration {
        Duration::from_secs(self.news_refresh_secs)
    }

    pub fn stocks_refresh(&self) -> Duration {
        Duration::from_secs(self.stocks_refresh_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("invalid bind_addr {:?}", self.bind_addr))
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    env_str(key)
        .map(|v| v.parse::<u64>().with_context(|| format!("{key} must be an integer")))
        .transpose()
}

//! Per-symbol analysis bundle from `/stocks/analyze/{symbol}`.
//!
//! Shapes mirror the backend payload section by section. Values the backend
//! may report either as a number or as text ("N/A", "12.4 Cr") are [`Metric`]s.
//! That covers indicators and financials, which come back as "N/A" when the
//! backend has no data. Price levels are plain numbers that can be missing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A display value that is either numeric or preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Number(f64),
    Text(String),
    /// `null` or absent.
    Missing,
}

impl Metric {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Metric::Number(n) => Some(*n),
            Metric::Text(t) => t.trim().trim_end_matches('%').parse().ok(),
            Metric::Missing => None,
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Missing
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Metric::Number(n) => write!(f, "{n:.2}"),
            Metric::Text(t) => f.write_str(t),
            Metric::Missing => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockAnalysisData {
    pub symbol: String,
    pub heading: Heading,
    pub overview: Overview,
    pub fundamental: Fundamental,
    pub technical: Technical,
    pub financial: Financial,
    /// Base64-encoded chart image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heading {
    pub sector: String,
    pub full_name: String,
    pub current_price: Option<f64>,
    pub change_price: Option<f64>,
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overview {
    pub market_cap: Metric,
    pub pe_ratio: Metric,
    #[serde(rename = "52w_high")]
    pub week52_high: Metric,
    #[serde(rename = "52w_low")]
    pub week52_low: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fundamental {
    pub key_ratios: KeyRatios,
    pub shareholding_pattern: ShareholdingPattern,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRatios {
    pub pe_ratio: Metric,
    pub sector_pe: Metric,
    pub roe: Metric,
    pub dividend_yield: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareholdingPattern {
    pub promoter: String,
    pub institutions: String,
    pub retail: String,
    pub others: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Technical {
    pub support_resistance: SupportResistance,
    pub technical_indicators: TechnicalIndicators,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportResistance {
    pub resistance_levels: ResistanceLevels,
    pub current_level: Option<f64>,
    pub support_levels: SupportLevels,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistanceLevels {
    #[serde(rename = "R1")]
    pub r1: Option<f64>,
    #[serde(rename = "R2")]
    pub r2: Option<f64>,
    #[serde(rename = "R3")]
    pub r3: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportLevels {
    #[serde(rename = "S1")]
    pub s1: Option<f64>,
    #[serde(rename = "S2")]
    pub s2: Option<f64>,
    #[serde(rename = "S3")]
    pub s3: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalIndicators {
    pub rsi_14: Metric,
    pub macd: Macd,
    pub volume_trend: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macd {
    pub macd_line: Metric,
    pub signal_line: Metric,
    pub histogram: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Financial {
    pub revenue_profit: RevenueProfit,
    pub balance_sheet: BalanceSheet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueProfit {
    pub revenue_ttm: Metric,
    pub net_profit_ttm: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    pub total_debt: Metric,
    pub debt_equity: Metric,
    pub current_ratio: Metric,
}

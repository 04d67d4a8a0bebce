use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::de;

/// Chart setup category reported by the pattern scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Setup {
    #[serde(rename = "VCP")]
    Vcp,
    #[serde(rename = "IPO Base")]
    IpoBase,
}

impl Setup {
    pub const ALL: [Setup; 2] = [Setup::Vcp, Setup::IpoBase];

    pub fn as_str(self) -> &'static str {
        match self {
            Setup::Vcp => "VCP",
            Setup::IpoBase => "IPO Base",
        }
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Setup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "vcp" => Ok(Setup::Vcp),
            "ipobase" | "ipo" => Ok(Setup::IpoBase),
            _ => Err(format!("unknown setup: {s}")),
        }
    }
}

/// Integer percent in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MAX: u8 = 100;

    pub fn new(pct: u8) -> Option<Self> {
        (pct <= Self::MAX).then_some(Self(pct))
    }

    /// Clamp any integer into range.
    pub fn saturating(pct: i64) -> Self {
        Self(pct.clamp(0, i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = String;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        if v.fract() != 0.0 || !(0.0..=f64::from(Self::MAX)).contains(&v) {
            return Err(format!("confidence out of range: {v}"));
        }
        Ok(Self(v as u8))
    }
}

impl From<Confidence> for u8 {
    fn from(c: Confidence) -> u8 {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A stock flagged by the VCP or IPO-base scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedStock {
    #[serde(deserialize_with = "de::opaque_id")]
    pub id: String,
    pub symbol: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub price: f64,
    pub setup: Setup,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub sector: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub target_return: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub timeline: String,
    pub confidence: Confidence,
    #[serde(
        rename = "original_data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_data: Option<serde_json::Value>,
}

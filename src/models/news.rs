use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::de;

/// Sentiment label attached to a headline by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(alias = "positive", alias = "POSITIVE")]
    Positive,
    #[serde(alias = "negative", alias = "NEGATIVE")]
    Negative,
    #[serde(alias = "neutral", alias = "NEUTRAL")]
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(format!("unknown sentiment: {other}")),
        }
    }
}

/// One headline as shown in the live news section.
///
/// `timestamp` is a display string ("3 hours ago") computed by the backend,
/// not an instant; do not sort on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(alias = "_id", deserialize_with = "de::opaque_id", default)]
    pub id: String,
    pub headline: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub timestamp: String,
    pub sentiment: Sentiment,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub url: String,
}

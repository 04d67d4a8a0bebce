//! Records returned by the Stock Sensor backend.
//!
//! These are display snapshots: nothing here is mutated after decode.

pub mod analysis;
pub(crate) mod de;
pub mod envelope;
pub mod news;
pub mod stock;

pub use analysis::{Metric, StockAnalysisData};
pub use envelope::{Envelope, TriggerAck};
pub use news::{NewsItem, Sentiment};
pub use stock::{Confidence, PredictedStock, Setup};

//! NSE ticker normalization.

use crate::error::{ClientError, Result};

/// Exchange suffix the analysis endpoint expects.
pub const NSE_SUFFIX: &str = ".NS";

/// Characters an NSE ticker may contain (`M&M`, `BAJAJ-AUTO`, `TCS.NS`).
/// Anything else would change the backend path once placed in the URL.
fn is_ticker_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '&' | '.' | '_' | '-')
}

/// Trim, uppercase and make sure the symbol carries the `.NS` suffix.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(symbol: &str) -> Result<String> {
    let s = symbol.trim().to_ascii_uppercase();
    if s.is_empty() || s == NSE_SUFFIX || !s.chars().all(is_ticker_char) {
        return Err(ClientError::InvalidSymbol(symbol.to_string()));
    }
    if s.ends_with(NSE_SUFFIX) {
        Ok(s)
    } else {
        Ok(format!("{s}{NSE_SUFFIX}"))
    }
}

/// Symbol without the exchange suffix, for headings.
pub fn display(symbol: &str) -> &str {
    symbol.strip_suffix(NSE_SUFFIX).unwrap_or(symbol)
}

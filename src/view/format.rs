//! Display formatting for rupee amounts and percentages.

use chrono::{DateTime, Local, Utc};

const CRORE: f64 = 1e7;
const LAKH_CRORE: f64 = 1e12;

/// Indian digit grouping: `195867.5` → `1,95,867.50`.
pub fn group_inr(value: f64, decimals: usize) -> String {
    let neg = value < 0.0;
    let s = format!("{:.*}", decimals, value.abs());
    let (int_part, frac) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };

    let mut out = String::with_capacity(s.len() + 8);
    let n = int_part.len();
    if n <= 3 {
        out.push_str(int_part);
    } else {
        let (head, last3) = int_part.split_at(n - 3);
        // groups of two in front of the last three digits
        let first = head.len() % 2;
        if first == 1 {
            out.push_str(&head[..1]);
        }
        for (i, chunk) in head.as_bytes()[first..].chunks(2).enumerate() {
            if i > 0 || first == 1 {
                out.push(',');
            }
            out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        }
        out.push(',');
        out.push_str(last3);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    if neg && value != 0.0 {
        out.insert(0, '-');
    }
    out
}

/// `₹3,890.50`
pub fn rupees(value: f64) -> String {
    if value < 0.0 {
        format!("-₹{}", group_inr(-value, 2))
    } else {
        format!("₹{}", group_inr(value, 2))
    }
}

/// Large amounts in crores: `₹1,95,867 Cr`, `₹12.45 Lakh Cr`.
pub fn crores(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let v = value.abs();
    if v >= LAKH_CRORE {
        format!("{sign}₹{:.2} Lakh Cr", v / LAKH_CRORE)
    } else {
        format!("{sign}₹{} Cr", group_inr(v / CRORE, 0))
    }
}

/// `+1.20%` / `-0.32%`
pub fn signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// `₹12.30 (+1.20%)`: absolute change with signed percentage.
pub fn price_change(change: f64, percent: f64) -> String {
    format!("{} ({})", rupees(change.abs()), signed_percent(percent))
}

pub fn optional(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| "N/A".to_string())
}

/// `Last updated: 14:05:09` in local time.
pub fn last_updated_label(ts: DateTime<Utc>) -> String {
    format!(
        "Last updated: {}",
        ts.with_timezone(&Local).format("%H:%M:%S")
    )
}

//! Stock report page: header plus one labelled table per tab.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::format::{crores, optional, price_change, rupees};
use super::Tone;
use crate::loader::AnalysisState;
use crate::models::analysis::Metric;
use crate::models::StockAnalysisData;
use crate::symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTab {
    #[default]
    Overview,
    Technical,
    Fundamentals,
    Financials,
}

impl ReportTab {
    pub const ALL: [ReportTab; 4] = [
        ReportTab::Overview,
        ReportTab::Technical,
        ReportTab::Fundamentals,
        ReportTab::Financials,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportTab::Overview => "overview",
            ReportTab::Technical => "technical",
            ReportTab::Fundamentals => "fundamentals",
            ReportTab::Financials => "financials",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportTab::Overview => "Overview",
            ReportTab::Technical => "Technical Analysis",
            ReportTab::Fundamentals => "Fundamentals",
            ReportTab::Financials => "Financials",
        }
    }
}

impl fmt::Display for ReportTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ReportTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "overview" => Ok(ReportTab::Overview),
            "technical" => Ok(ReportTab::Technical),
            "fundamentals" | "fundamental" => Ok(ReportTab::Fundamentals),
            "financials" | "financial" => Ok(ReportTab::Financials),
            other => Err(format!("unknown report tab: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHeader {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: String,
    pub change: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
}

fn row(label: &'static str, value: impl Into<String>) -> Row {
    Row {
        label,
        value: value.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportView {
    Idle,
    Loading {
        symbol: String,
    },
    Error {
        symbol: String,
        message: String,
        /// The page offers a retry button.
        retry: bool,
    },
    Report {
        header: ReportHeader,
        tab: ReportTab,
        rows: Vec<Row>,
        has_chart: bool,
    },
}

pub fn report_view(state: &AnalysisState, tab: ReportTab) -> ReportView {
    match state {
        AnalysisState::Idle => ReportView::Idle,
        AnalysisState::Loading { symbol } => ReportView::Loading {
            symbol: symbol::display(symbol).to_string(),
        },
        AnalysisState::Failed { symbol, message } => ReportView::Error {
            symbol: symbol::display(symbol).to_string(),
            message: message.clone(),
            retry: true,
        },
        AnalysisState::Ready { symbol, data } => ReportView::Report {
            header: header(symbol, data),
            tab,
            rows: tab_rows(data, tab),
            has_chart: data.chart.as_deref().is_some_and(|c| !c.is_empty()),
        },
    }
}

pub fn header(symbol: &str, data: &StockAnalysisData) -> ReportHeader {
    let h = &data.heading;
    let change = h.change_price.unwrap_or(0.0);
    let pct = h.change_percent.unwrap_or(0.0);
    ReportHeader {
        symbol: symbol::display(symbol).to_string(),
        name: if h.full_name.is_empty() {
            symbol::display(symbol).to_string()
        } else {
            h.full_name.clone()
        },
        sector: h.sector.clone(),
        price: optional(h.current_price, rupees),
        change: price_change(change, pct),
        tone: Tone::of_change(change),
    }
}

fn crore_metric(m: &Metric) -> String {
    match m {
        Metric::Number(n) => crores(*n),
        other => other.to_string(),
    }
}

fn price_metric(m: &Metric) -> String {
    match m.as_f64() {
        Some(n) if matches!(m, Metric::Number(_)) => rupees(n),
        _ => m.to_string(),
    }
}

fn percent(v: &str) -> String {
    if v.is_empty() {
        "N/A".to_string()
    } else if v.ends_with('%') {
        v.to_string()
    } else {
        format!("{v}%")
    }
}

fn num(m: &Metric) -> String {
    match m {
        Metric::Number(n) => format!("{n:.2}"),
        other => other.to_string(),
    }
}

pub fn tab_rows(data: &StockAnalysisData, tab: ReportTab) -> Vec<Row> {
    match tab {
        ReportTab::Overview => {
            let o = &data.overview;
            vec![
                row("Market Cap", crore_metric(&o.market_cap)),
                row("P/E Ratio", o.pe_ratio.to_string()),
                row("52W High", price_metric(&o.week52_high)),
                row("52W Low", price_metric(&o.week52_low)),
            ]
        }
        ReportTab::Technical => {
            let sr = &data.technical.support_resistance;
            let ti = &data.technical.technical_indicators;
            vec![
                row("R3", optional(sr.resistance_levels.r3, rupees)),
                row("R2", optional(sr.resistance_levels.r2, rupees)),
                row("R1", optional(sr.resistance_levels.r1, rupees)),
                row("Current", optional(sr.current_level, rupees)),
                row("S1", optional(sr.support_levels.s1, rupees)),
                row("S2", optional(sr.support_levels.s2, rupees)),
                row("S3", optional(sr.support_levels.s3, rupees)),
                row("RSI (14)", num(&ti.rsi_14)),
                row("MACD Line", num(&ti.macd.macd_line)),
                row("Signal Line", num(&ti.macd.signal_line)),
                row("Histogram", num(&ti.macd.histogram)),
                row(
                    "Volume Trend",
                    if ti.volume_trend.is_empty() {
                        "N/A".to_string()
                    } else {
                        ti.volume_trend.clone()
                    },
                ),
            ]
        }
        ReportTab::Fundamentals => {
            let k = &data.fundamental.key_ratios;
            let sh = &data.fundamental.shareholding_pattern;
            vec![
                row("P/E Ratio", k.pe_ratio.to_string()),
                row("Sector P/E", k.sector_pe.to_string()),
                row("ROE", k.roe.to_string()),
                row("Dividend Yield", k.dividend_yield.to_string()),
                row("Promoter", percent(&sh.promoter)),
                row("Institutions", percent(&sh.institutions)),
                row("Retail", percent(&sh.retail)),
                row("Others", percent(&sh.others)),
            ]
        }
        ReportTab::Financials => {
            let rp = &data.financial.revenue_profit;
            let bs = &data.financial.balance_sheet;
            vec![
                row("Revenue (TTM)", crore_metric(&rp.revenue_ttm)),
                row("Net Profit (TTM)", crore_metric(&rp.net_profit_ttm)),
                row("Total Debt", crore_metric(&bs.total_debt)),
                row("Debt/Equity", num(&bs.debt_equity)),
                row("Current Ratio", num(&bs.current_ratio)),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::Heading;
    use std::sync::Arc;

    fn ready() -> AnalysisState {
        let mut data = StockAnalysisData {
            symbol: "TCS.NS".into(),
            heading: Heading {
                sector: "IT".into(),
                full_name: "Tata Consultancy Services".into(),
                current_price: Some(3890.5),
                change_price: Some(-12.3),
                change_percent: Some(-0.32),
            },
            ..Default::default()
        };
        data.overview.market_cap = Metric::Number(14_100_000_000_000.0);
        data.overview.pe_ratio = Metric::Text("N/A".into());
        data.fundamental.shareholding_pattern.promoter = "72.3".into();
        AnalysisState::Ready {
            symbol: "TCS.NS".into(),
            data: Arc::new(data),
        }
    }

    #[test]
    fn header_carries_signed_change() {
        match report_view(&ready(), ReportTab::Overview) {
            ReportView::Report { header, rows, .. } => {
                assert_eq!(header.symbol, "TCS");
                assert_eq!(header.price, "₹3,890.50");
                assert_eq!(header.change, "₹12.30 (-0.32%)");
                assert_eq!(header.tone, Tone::Down);
                assert_eq!(rows[0], row("Market Cap", "₹14.10 Lakh Cr"));
                assert_eq!(rows[1], row("P/E Ratio", "N/A"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_load_offers_retry() {
        let st = AnalysisState::Failed {
            symbol: "TCS.NS".into(),
            message: "HTTP error! status: 500".into(),
        };
        assert_eq!(
            report_view(&st, ReportTab::Overview),
            ReportView::Error {
                symbol: "TCS".into(),
                message: "HTTP error! status: 500".into(),
                retry: true
            }
        );
    }

    #[test]
    fn missing_values_render_as_na() {
        let data = StockAnalysisData::default();
        let rows = tab_rows(&data, ReportTab::Technical);
        assert!(rows.iter().all(|r| r.value == "N/A"));
        let rows = tab_rows(&data, ReportTab::Fundamentals);
        assert_eq!(rows[4], row("Promoter", "N/A"));
    }

    #[test]
    fn unavailable_financials_show_backend_text() {
        let mut data = StockAnalysisData::default();
        data.technical.technical_indicators.rsi_14 = Metric::Text("N/A".into());
        data.financial.revenue_profit.revenue_ttm = Metric::Text("N/A".into());
        data.financial.revenue_profit.net_profit_ttm = Metric::Number(460_000_000_000.0);
        data.financial.balance_sheet.debt_equity = Metric::Number(0.1);

        let technical = tab_rows(&data, ReportTab::Technical);
        assert_eq!(technical[7], row("RSI (14)", "N/A"));

        let rows = tab_rows(&data, ReportTab::Financials);
        assert_eq!(rows[0], row("Revenue (TTM)", "N/A"));
        assert_eq!(rows[1], row("Net Profit (TTM)", crores(460_000_000_000.0)));
        assert_eq!(rows[2], row("Total Debt", "N/A"));
        assert_eq!(rows[3], row("Debt/Equity", "0.10"));
    }

    #[test]
    fn shareholding_gets_percent_sign() {
        match report_view(&ready(), ReportTab::Fundamentals) {
            ReportView::Report { rows, .. } => {
                assert_eq!(rows[4], row("Promoter", "72.3%"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tab_parsing() {
        assert_eq!("".parse::<ReportTab>(), Ok(ReportTab::Overview));
        assert_eq!("Technical".parse::<ReportTab>(), Ok(ReportTab::Technical));
        assert_eq!("financial".parse::<ReportTab>(), Ok(ReportTab::Financials));
        assert!("chart".parse::<ReportTab>().is_err());
    }
}

//! Plain-text rendering of the view models for terminals and logs.

use std::fmt::Write;

use super::format::last_updated_label;
use super::news::NewsSectionView;
use super::report::ReportView;
use super::stocks::PredictedStocksView;

pub fn render_report(view: &ReportView) -> String {
    let mut out = String::new();
    match view {
        ReportView::Idle => out.push_str("No stock selected.\n"),
        ReportView::Loading { symbol } => {
            let _ = writeln!(out, "Loading analysis for {symbol}...");
        }
        ReportView::Error {
            symbol,
            message,
            retry,
        } => {
            let _ = writeln!(out, "Could not load {symbol}: {message}");
            if *retry {
                out.push_str("Retry to request the analysis again.\n");
            }
        }
        ReportView::Report {
            header, tab, rows, ..
        } => {
            let _ = writeln!(out, "{} ({})", header.name, header.symbol);
            if !header.sector.is_empty() {
                let _ = writeln!(out, "{}", header.sector);
            }
            let _ = writeln!(
                out,
                "{}  {} {}",
                header.price,
                header.tone.arrow(),
                header.change
            );
            let _ = writeln!(out, "\n== {tab} ==");
            let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
            for r in rows {
                let _ = writeln!(out, "{:<width$}  {}", r.label, r.value);
            }
        }
    }
    out
}

pub fn render_news(view: &NewsSectionView) -> String {
    let mut out = String::new();
    match view {
        NewsSectionView::Loading => out.push_str("Loading news...\n"),
        NewsSectionView::Error { message } => {
            let _ = writeln!(out, "Failed to load news: {message}");
        }
        NewsSectionView::Empty { message, .. } => {
            let _ = writeln!(out, "{message}");
        }
        NewsSectionView::Items {
            items,
            last_updated,
            stale_error,
            ..
        } => {
            if let Some(ts) = last_updated {
                let _ = writeln!(out, "{}", last_updated_label(*ts));
            }
            if let Some(err) = stale_error {
                let _ = writeln!(out, "(showing earlier results: {err})");
            }
            for card in items {
                let n = &card.item;
                let _ = writeln!(out, "{} [{}] {}", card.tone.arrow(), n.sentiment, n.headline);
                let _ = writeln!(out, "    {} · {}", n.source, n.timestamp);
            }
        }
    }
    out
}

pub fn render_stocks(view: &PredictedStocksView) -> String {
    let mut out = String::new();
    match view {
        PredictedStocksView::Loading => out.push_str("Loading predicted stocks...\n"),
        PredictedStocksView::Error { message } => {
            let _ = writeln!(out, "Failed to load predicted stocks: {message}");
        }
        PredictedStocksView::Empty { message, .. } => {
            let _ = writeln!(out, "{message}");
        }
        PredictedStocksView::Items {
            items, last_updated, ..
        } => {
            if let Some(ts) = last_updated {
                let _ = writeln!(out, "{}", last_updated_label(*ts));
            }
            for card in items {
                let s = &card.stock;
                let _ = writeln!(
                    out,
                    "{:<12} {:<9} {:>5}  {:<10} {}",
                    s.symbol,
                    s.setup.as_str(),
                    s.confidence.to_string(),
                    s.target_return,
                    s.sector
                );
            }
        }
    }
    out
}

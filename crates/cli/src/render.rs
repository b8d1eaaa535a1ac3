//! Plain-text rendering of the dashboard view model.

use std::fmt::Write;

use portfolio_dashboard_core::models::view::{DashboardView, FormMode};
use portfolio_dashboard_core::services::view_service::format_amount;

const BAR_WIDTH: usize = 30;

/// Render the whole view as text.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let m = &view.metrics;

    let _ = writeln!(out, "Portfolio Dashboard — last updated {}", view.last_updated_text());
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total value      {}", m.total_value);
    let _ = writeln!(out, "  {} {}", m.gain_arrow, m.gain_with_return);
    let _ = writeln!(out, "Total invested   {}", m.total_invested);
    let _ = writeln!(out, "Unrealized gain  {}", m.unrealized_gain);
    let _ = writeln!(out, "  {} {}", m.gain_arrow, m.return_text);
    let _ = writeln!(out, "Cash             {}", m.cash_value);
    let _ = writeln!(out, "  {}", m.cash_text);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>4}  {:<30} {:<7} {:<8} {:<4} {:>14} {:>14} {:>14} {:>13} {:>9}",
        "ID", "Name", "Ticker", "Country", "Ccy", "Invested", "Current", "Current (€)", "Gain", "Return"
    );
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:>4}  {:<30} {:<7} {:<8} {:<4} {:>14} {:>14} {:>14} {:>13} {:>9}",
            row.id,
            truncate(&row.name, 30),
            row.ticker,
            truncate(&row.country, 8),
            row.currency,
            row.display_invested,
            row.display_current,
            row.current_eur,
            row.gain,
            row.return_pct,
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Allocation (top {})", view.charts.allocation.len());
    for slice in &view.charts.allocation {
        let _ = writeln!(out, "  {:<16} {}", slice.label, bar(slice.percent));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Asset classes");
    for slice in &view.charts.asset_classes {
        let _ = writeln!(
            out,
            "  {:<22} €{:>12} {}",
            slice.label,
            format_amount(slice.value),
            bar(slice.percent)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Performance (invested → current, €)");
    let perf = &view.charts.performance;
    for ((ticker, invested), current) in perf.tickers.iter().zip(&perf.invested).zip(&perf.current) {
        let _ = writeln!(
            out,
            "  {:<7} {:>12} → {:>12}",
            ticker,
            format_amount(*invested),
            format_amount(*current)
        );
    }

    if let Some(title) = view.form.title() {
        let _ = writeln!(out);
        let _ = writeln!(out, "[{title}]");
    }
    if view.form == FormMode::Closed {
        if let Some(prompt) = &view.delete_prompt {
            let _ = writeln!(out);
            let _ = writeln!(out, "{prompt}");
        }
    }

    out
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    "█".repeat(filled)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

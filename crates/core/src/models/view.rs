use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::analytics::{GainSign, PortfolioMetrics};
use super::chart::ChartSet;
use super::holding::{HoldingId, TradeCurrency};

/// Metric cards, with both raw numbers and display strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsView {
    pub metrics: PortfolioMetrics,

    /// e.g. "€21,880.36"
    pub total_value: String,

    /// e.g. "€12,921.36"
    pub total_invested: String,

    /// e.g. "+€8,959.00"
    pub unrealized_gain: String,

    /// e.g. "+€8,959.00 (+69.3%)"
    pub gain_with_return: String,

    /// e.g. "69.3% return"
    pub return_text: String,

    /// "positive" or "negative"
    pub gain_class: String,

    /// "↑" or "↓"
    pub gain_arrow: String,

    /// e.g. "€2,177.11"
    pub cash_value: String,

    /// e.g. "9.9% of portfolio"
    pub cash_text: String,
}

/// One formatted row of the holdings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRow {
    pub id: HoldingId,
    pub name: String,
    pub ticker: String,
    pub country: String,
    pub currency: TradeCurrency,

    /// Invested amount in the trade currency, with symbol
    pub display_invested: String,

    /// Current value in the trade currency, with symbol
    pub display_current: String,

    /// Current value in EUR, with symbol
    pub current_eur: String,

    /// Signed EUR gain, e.g. "-€151.81"
    pub gain: String,

    /// Signed return, e.g. "+8.34%" or "-99.59%"
    pub return_pct: String,

    pub gain_sign: GainSign,

    /// "gain" or "loss"
    pub row_class: String,
}

/// Which form dialog is open, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "id", rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Closed,
    Adding,
    Editing(HoldingId),
}

impl FormMode {
    /// Title of the form dialog.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            FormMode::Closed => None,
            FormMode::Adding => Some("Add Holding"),
            FormMode::Editing(_) => Some("Edit Holding"),
        }
    }
}

/// Everything a renderer needs for one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub metrics: MetricsView,
    pub rows: Vec<HoldingRow>,
    pub charts: ChartSet,

    /// Rendered as e.g. "October 17, 2026"
    pub last_updated: NaiveDate,

    pub form: FormMode,

    /// Confirmation text while a delete is pending
    pub delete_prompt: Option<String>,

    /// Blocking notice after a failed store operation
    pub notice: Option<String>,
}

impl DashboardView {
    pub fn last_updated_text(&self) -> String {
        self.last_updated.format("%B %-d, %Y").to_string()
    }
}

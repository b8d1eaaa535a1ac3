use serde::{Deserialize, Serialize};

/// Direction of a gain for presentation (arrow, colour, `+`/`-` prefix).
///
/// Zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GainSign {
    Positive,
    Negative,
}

impl GainSign {
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            GainSign::Positive
        } else {
            GainSign::Negative
        }
    }

    /// `"+"` or `"-"`.
    pub fn prefix(&self) -> &'static str {
        match self {
            GainSign::Positive => "+",
            GainSign::Negative => "-",
        }
    }

    /// `"↑"` or `"↓"`.
    pub fn arrow(&self) -> &'static str {
        match self {
            GainSign::Positive => "↑",
            GainSign::Negative => "↓",
        }
    }

    /// CSS-style state for metric cards.
    pub fn metric_class(&self) -> &'static str {
        match self {
            GainSign::Positive => "positive",
            GainSign::Negative => "negative",
        }
    }

    /// CSS-style state for table rows.
    pub fn row_class(&self) -> &'static str {
        match self {
            GainSign::Positive => "gain",
            GainSign::Negative => "loss",
        }
    }
}

/// Portfolio-level metrics over the current snapshot. All amounts in EUR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Number of holdings in the snapshot
    pub holding_count: usize,

    /// Sum of current values
    pub total_current: f64,

    /// Sum of invested amounts
    pub total_invested: f64,

    /// total_current - total_invested
    pub total_gain: f64,

    pub gain_sign: GainSign,

    /// Gain over invested, in percent, 1 decimal (0.0 when nothing invested)
    pub total_return_pct: f64,

    /// Value held in CASH-tickered holdings
    pub cash_value: f64,

    /// Cash over total current value, in percent, 1 decimal
    pub cash_pct: f64,
}

/// Derived values for a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingMetrics {
    /// current_value - invested_amount, EUR
    pub gain: f64,

    pub gain_sign: GainSign,

    /// Gain over invested, in percent, 2 decimals (0.00 when nothing invested)
    pub return_pct: f64,

    /// Invested amount converted to the trade currency
    pub display_invested: f64,

    /// Current value converted to the trade currency
    pub display_current: f64,
}

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Store-assigned identifier of a holding. Never reused after deletion.
pub type HoldingId = i64;

/// Ticker that marks the liquidity bucket.
pub const CASH_TICKER: &str = "CASH";

/// Currency a position is traded in.
///
/// Only affects how amounts are *displayed*; every stored amount is EUR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeCurrency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl TradeCurrency {
    pub const ALL: [TradeCurrency; 3] = [TradeCurrency::Eur, TradeCurrency::Usd, TradeCurrency::Gbp];

    /// ISO code, e.g. "USD".
    pub fn code(&self) -> &'static str {
        match self {
            TradeCurrency::Eur => "EUR",
            TradeCurrency::Usd => "USD",
            TradeCurrency::Gbp => "GBP",
        }
    }

    /// Display symbol used in front of formatted amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            TradeCurrency::Eur => "€",
            TradeCurrency::Usd => "$",
            TradeCurrency::Gbp => "£",
        }
    }
}

impl std::fmt::Display for TradeCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.code())
    }
}

impl std::str::FromStr for TradeCurrency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(TradeCurrency::Eur),
            "USD" => Ok(TradeCurrency::Usd),
            "GBP" => Ok(TradeCurrency::Gbp),
            other => Err(CoreError::Validation(format!(
                "Unsupported trade currency '{other}': expected EUR, USD or GBP"
            ))),
        }
    }
}

/// One investable position or cash balance, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier assigned by the store
    pub id: HoldingId,

    /// Display name (e.g., "Apple Inc")
    pub name: String,

    /// Uppercase symbol (e.g., "AAPL", "CASH")
    pub ticker: String,

    /// Free-text origin label; "—" for non-geographic assets
    pub country: String,

    /// Currency used for original-currency display
    pub trade_currency: TradeCurrency,

    /// Cost basis in EUR
    pub invested_amount: f64,

    /// Current mark in EUR
    pub current_value: f64,
}

impl Holding {
    /// Build a holding from an id and its fields.
    pub fn from_draft(id: HoldingId, draft: HoldingDraft) -> Self {
        Self {
            id,
            name: draft.name,
            ticker: draft.ticker,
            country: draft.country,
            trade_currency: draft.trade_currency,
            invested_amount: draft.invested_amount,
            current_value: draft.current_value,
        }
    }

    /// The editable fields of this holding.
    pub fn to_draft(&self) -> HoldingDraft {
        HoldingDraft {
            name: self.name.clone(),
            ticker: self.ticker.clone(),
            country: self.country.clone(),
            trade_currency: self.trade_currency,
            invested_amount: self.invested_amount,
            current_value: self.current_value,
        }
    }

    #[must_use]
    pub fn is_cash(&self) -> bool {
        self.ticker == CASH_TICKER
    }
}

/// A holding without its identifier: the payload of insert and update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingDraft {
    pub name: String,
    pub ticker: String,
    pub country: String,
    pub trade_currency: TradeCurrency,
    pub invested_amount: f64,
    pub current_value: f64,
}

impl HoldingDraft {
    pub fn new(
        name: impl Into<String>,
        ticker: impl Into<String>,
        country: impl Into<String>,
        trade_currency: TradeCurrency,
        invested_amount: f64,
        current_value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into().to_uppercase(),
            country: country.into(),
            trade_currency,
            invested_amount,
            current_value,
        }
    }
}

/// Raw text as typed into the add/edit form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoldingForm {
    pub name: String,
    pub ticker: String,
    pub country: String,
    pub trade_currency: String,
    pub invested_amount: String,
    pub current_value: String,
}

impl HoldingForm {
    /// Pre-fill the form from an existing holding (edit dialog).
    pub fn from_holding(holding: &Holding) -> Self {
        Self {
            name: holding.name.clone(),
            ticker: holding.ticker.clone(),
            country: holding.country.clone(),
            trade_currency: holding.trade_currency.code().to_string(),
            invested_amount: holding.invested_amount.to_string(),
            current_value: holding.current_value.to_string(),
        }
    }
}

use crate::models::holding::TradeCurrency;
use crate::models::settings::{FxSettings, DEFAULT_USD_TO_EUR};

/// Converts EUR amounts into a holding's trade currency for display.
///
/// Rates are static, expressed as "EUR per one unit of X":
/// - USD: 1 USD = 0.8462 EUR by default, so EUR→USD multiplies by 1 / 0.8462
/// - EUR: identity
/// - GBP: divided by the configured rate; without one the amount passes
///   through unchanged
///
/// All aggregation works in EUR; this is only for the "original currency" columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyService {
    usd_to_eur: f64,
    gbp_to_eur: Option<f64>,
}

impl CurrencyService {
    pub fn new() -> Self {
        Self {
            usd_to_eur: DEFAULT_USD_TO_EUR,
            gbp_to_eur: None,
        }
    }

    /// Build from validated `[fx]` settings.
    pub fn from_settings(fx: &FxSettings) -> Self {
        Self {
            usd_to_eur: fx.usd_to_eur,
            gbp_to_eur: fx.gbp_to_eur,
        }
    }

    /// EUR value of one unit of `currency`, if a rate is known.
    pub fn rate_to_eur(&self, currency: TradeCurrency) -> Option<f64> {
        match currency {
            TradeCurrency::Eur => Some(1.0),
            TradeCurrency::Usd => Some(self.usd_to_eur),
            TradeCurrency::Gbp => self.gbp_to_eur,
        }
    }

    /// Convert a EUR amount into `target`.
    /// E.g., convert(84.62, Usd) → 100.0
    pub fn convert(&self, amount_eur: f64, target: TradeCurrency) -> f64 {
        match self.rate_to_eur(target) {
            Some(rate) => amount_eur / rate,
            None => {
                tracing::debug!(currency = %target, "no EUR rate configured, showing amount unconverted");
                amount_eur
            }
        }
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::analytics::{GainSign, HoldingMetrics, PortfolioMetrics};
use crate::models::holding::Holding;
use crate::services::currency_service::CurrencyService;

/// Round the decimal value of `value` half away from zero to `decimals` places.
///
/// Rounds what the float actually holds: 1.45 is stored as 1.4499… and
/// becomes 1.4, while an exact tie such as 0.125 becomes 0.13.
/// Non-finite input is returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// `part / whole * 100` rounded to `decimals`, or 0 when `whole` is zero.
pub fn percent_of(part: f64, whole: f64, decimals: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_to(part / whole * 100.0, decimals)
}

/// Computes portfolio metrics: totals, gain/loss, return and cash share.
///
/// Pure business logic over a snapshot, no I/O. All inputs and outputs are EUR
/// except the display amounts, which go through `CurrencyService`.
pub struct AnalyticsService {
    currency_service: CurrencyService,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self {
            currency_service: CurrencyService::new(),
        }
    }

    pub fn with_currency_service(currency_service: CurrencyService) -> Self {
        Self { currency_service }
    }

    pub fn currency_service(&self) -> &CurrencyService {
        &self.currency_service
    }

    // ── Portfolio totals ────────────────────────────────────────────

    pub fn total_invested(&self, holdings: &[Holding]) -> f64 {
        holdings.iter().map(|h| h.invested_amount).sum()
    }

    pub fn total_current(&self, holdings: &[Holding]) -> f64 {
        holdings.iter().map(|h| h.current_value).sum()
    }

    pub fn total_gain(&self, holdings: &[Holding]) -> f64 {
        self.total_current(holdings) - self.total_invested(holdings)
    }

    /// Gain over invested in percent, 1 decimal; 0.0 when nothing is invested.
    pub fn total_return_pct(&self, holdings: &[Holding]) -> f64 {
        percent_of(self.total_gain(holdings), self.total_invested(holdings), 1)
    }

    /// Current value of the CASH holdings.
    ///
    /// More than one CASH row is summed, matching the Cash asset-class bucket.
    pub fn cash_value(&self, holdings: &[Holding]) -> f64 {
        holdings
            .iter()
            .filter(|h| h.is_cash())
            .map(|h| h.current_value)
            .sum()
    }

    /// Cash over total current value in percent, 1 decimal; 0.0 for an empty portfolio.
    pub fn cash_pct(&self, holdings: &[Holding]) -> f64 {
        percent_of(self.cash_value(holdings), self.total_current(holdings), 1)
    }

    /// All portfolio-level metrics in one pass over the totals.
    pub fn portfolio_metrics(&self, holdings: &[Holding]) -> PortfolioMetrics {
        let total_invested = self.total_invested(holdings);
        let total_current = self.total_current(holdings);
        let total_gain = total_current - total_invested;
        let cash_value = self.cash_value(holdings);

        let cash_rows = holdings.iter().filter(|h| h.is_cash()).count();
        if cash_rows > 1 {
            tracing::debug!(cash_rows, "multiple CASH holdings, summing their values");
        }

        PortfolioMetrics {
            holding_count: holdings.len(),
            total_current,
            total_invested,
            total_gain,
            gain_sign: GainSign::of(total_gain),
            total_return_pct: percent_of(total_gain, total_invested, 1),
            cash_value,
            cash_pct: percent_of(cash_value, total_current, 1),
        }
    }

    // ── Per-holding values ──────────────────────────────────────────

    pub fn gain(&self, holding: &Holding) -> f64 {
        holding.current_value - holding.invested_amount
    }

    /// Gain over invested in percent, 2 decimals; 0.00 when nothing is invested.
    pub fn return_pct(&self, holding: &Holding) -> f64 {
        percent_of(self.gain(holding), holding.invested_amount, 2)
    }

    pub fn display_invested(&self, holding: &Holding) -> f64 {
        self.currency_service
            .convert(holding.invested_amount, holding.trade_currency)
    }

    pub fn display_current(&self, holding: &Holding) -> f64 {
        self.currency_service
            .convert(holding.current_value, holding.trade_currency)
    }

    pub fn holding_metrics(&self, holding: &Holding) -> HoldingMetrics {
        let gain = self.gain(holding);
        HoldingMetrics {
            gain,
            gain_sign: GainSign::of(gain),
            return_pct: self.return_pct(holding),
            display_invested: self.display_invested(holding),
            display_current: self.display_current(holding),
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

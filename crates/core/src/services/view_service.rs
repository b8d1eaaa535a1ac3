use chrono::NaiveDate;

use crate::models::analytics::GainSign;
use crate::models::holding::{Holding, TradeCurrency};
use crate::models::portfolio::DashboardState;
use crate::models::view::{DashboardView, HoldingRow, MetricsView};
use crate::services::analytics_service::AnalyticsService;
use crate::services::chart_service::ChartService;

/// Absolute value with two decimals and thousands separators: -1234.5 → "1,234.50".
///
/// Sign is never included; callers prefix it from a `GainSign`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    format!("{grouped}.{frac_part}")
}

/// Symbol plus absolute amount, e.g. "$1,234.50".
pub fn format_money(currency: TradeCurrency, value: f64) -> String {
    format!("{}{}", currency.symbol(), format_amount(value))
}

/// Sign, symbol and absolute amount, e.g. "-€151.81".
pub fn format_signed_money(currency: TradeCurrency, value: f64) -> String {
    format!("{}{}", GainSign::of(value).prefix(), format_money(currency, value))
}

/// Builds the `DashboardView` the renderer consumes.
///
/// Pure: reads the state, never touches a rendering surface.
pub struct ViewService {
    analytics: AnalyticsService,
    charts: ChartService,
}

impl ViewService {
    pub fn new() -> Self {
        Self {
            analytics: AnalyticsService::new(),
            charts: ChartService::new(),
        }
    }

    pub fn with_services(analytics: AnalyticsService, charts: ChartService) -> Self {
        Self { analytics, charts }
    }

    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }

    pub fn charts(&self) -> &ChartService {
        &self.charts
    }

    pub fn metrics_view(&self, holdings: &[Holding]) -> MetricsView {
        let metrics = self.analytics.portfolio_metrics(holdings);
        let sign = metrics.gain_sign;
        let eur = TradeCurrency::Eur;

        // A positive return gets an explicit "+"; a negative one already carries "-".
        let signed_return = match sign {
            GainSign::Positive => format!("+{:.1}", metrics.total_return_pct),
            GainSign::Negative => format!("{:.1}", metrics.total_return_pct),
        };
        let unrealized_gain = format!("{}{}", sign.prefix(), format_money(eur, metrics.total_gain));

        MetricsView {
            total_value: format_money(eur, metrics.total_current),
            total_invested: format_money(eur, metrics.total_invested),
            gain_with_return: format!("{unrealized_gain} ({signed_return}%)"),
            unrealized_gain,
            return_text: format!("{:.1}% return", metrics.total_return_pct),
            gain_class: sign.metric_class().to_string(),
            gain_arrow: sign.arrow().to_string(),
            cash_value: format_money(eur, metrics.cash_value),
            cash_text: format!("{:.1}% of portfolio", metrics.cash_pct),
            metrics,
        }
    }

    pub fn holding_row(&self, holding: &Holding) -> HoldingRow {
        let m = self.analytics.holding_metrics(holding);
        let ccy = holding.trade_currency;
        let return_prefix = match m.gain_sign {
            GainSign::Positive => "+",
            GainSign::Negative => "",
        };

        HoldingRow {
            id: holding.id,
            name: holding.name.clone(),
            ticker: holding.ticker.clone(),
            country: holding.country.clone(),
            currency: ccy,
            display_invested: format_money(ccy, m.display_invested),
            display_current: format_money(ccy, m.display_current),
            current_eur: format_money(TradeCurrency::Eur, holding.current_value),
            gain: format_signed_money(TradeCurrency::Eur, m.gain),
            return_pct: format!("{return_prefix}{:.2}%", m.return_pct),
            gain_sign: m.gain_sign,
            row_class: m.gain_sign.row_class().to_string(),
        }
    }

    /// Everything for one render pass, recomputed from the snapshot.
    pub fn build(&self, state: &DashboardState, today: NaiveDate) -> DashboardView {
        tracing::debug!(holdings = state.holdings.len(), "building dashboard view");
        DashboardView {
            metrics: self.metrics_view(&state.holdings),
            rows: state.holdings.iter().map(|h| self.holding_row(h)).collect(),
            charts: self.charts.chart_set(&state.holdings),
            last_updated: today,
            form: state.form,
            delete_prompt: state.delete_prompt(),
            notice: state.notice.clone(),
        }
    }
}

impl Default for ViewService {
    fn default() -> Self {
        Self::new()
    }
}

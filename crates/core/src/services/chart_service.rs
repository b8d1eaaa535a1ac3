use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::chart::{AllocationSlice, AssetClass, AssetClassSlice, ChartSet, PerformanceSeries};
use crate::models::holding::Holding;
use crate::models::settings::AssetClassSettings;
use crate::services::analytics_service::percent_of;

/// How many holdings the allocation and performance charts show.
pub const TOP_HOLDINGS: usize = 10;

/// Allocation colours, assigned by rank.
pub const ALLOCATION_COLORS: [&str; TOP_HOLDINGS] = [
    "#8b5cf6", "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#06b6d4", "#ec4899", "#84cc16",
    "#f97316", "#14b8a6",
];

/// Asset-class colours, in `AssetClass::ALL` order.
pub const ASSET_CLASS_COLORS: [&str; 5] = ["#3b82f6", "#8b5cf6", "#f59e0b", "#10b981", "#64748b"];

/// Assigns each ticker to exactly one asset class.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetClassifier {
    etfs: HashSet<String>,
    tech: HashSet<String>,
    commodities: HashSet<String>,
}

impl AssetClassifier {
    /// Build from membership lists. Overlapping lists are rejected.
    pub fn from_settings(settings: &AssetClassSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        let upper = |tickers: &[String]| -> HashSet<String> {
            tickers.iter().map(|t| t.trim().to_uppercase()).collect()
        };
        Ok(Self {
            etfs: upper(&settings.etfs),
            tech: upper(&settings.tech),
            commodities: upper(&settings.commodities),
        })
    }

    pub fn classify(&self, holding: &Holding) -> AssetClass {
        let ticker = holding.ticker.as_str();
        if holding.is_cash() {
            AssetClass::Cash
        } else if self.etfs.contains(ticker) {
            AssetClass::Etfs
        } else if self.tech.contains(ticker) {
            AssetClass::TechStocks
        } else if self.commodities.contains(ticker) {
            AssetClass::Commodities
        } else {
            AssetClass::OtherStocks
        }
    }
}

impl Default for AssetClassifier {
    fn default() -> Self {
        let defaults = AssetClassSettings::default();
        Self {
            etfs: defaults.etfs.into_iter().collect(),
            tech: defaults.tech.into_iter().collect(),
            commodities: defaults.commodities.into_iter().collect(),
        }
    }
}

/// Generates chart-ready series from a holdings snapshot.
///
/// The core computes all the numbers; the renderer only draws. Every
/// projection is pure and recomputed from scratch on each render.
pub struct ChartService {
    classifier: AssetClassifier,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            classifier: AssetClassifier::default(),
        }
    }

    pub fn with_classifier(classifier: AssetClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &AssetClassifier {
        &self.classifier
    }

    /// Non-cash holdings, largest current value first, at most `TOP_HOLDINGS`.
    ///
    /// The sort is stable, so ties keep snapshot (id) order.
    pub fn top_holdings<'a>(&self, holdings: &'a [Holding]) -> Vec<&'a Holding> {
        let mut top: Vec<&Holding> = holdings.iter().filter(|h| !h.is_cash()).collect();
        top.sort_by(|a, b| b.current_value.total_cmp(&a.current_value));
        top.truncate(TOP_HOLDINGS);
        top
    }

    /// Allocation doughnut: each top holding's share of the top-N sum (not of the portfolio).
    pub fn allocation(&self, holdings: &[Holding]) -> Vec<AllocationSlice> {
        let top = self.top_holdings(holdings);
        let top_sum: f64 = top.iter().map(|h| h.current_value).sum();

        top.iter()
            .zip(ALLOCATION_COLORS.iter())
            .map(|(holding, color)| {
                let percent = percent_of(holding.current_value, top_sum, 1);
                AllocationSlice {
                    ticker: holding.ticker.clone(),
                    label: format!("{}  {:.1}%", holding.ticker, percent),
                    value: holding.current_value,
                    percent,
                    color: (*color).to_string(),
                }
            })
            .collect()
    }

    /// Asset-class doughnut: all five buckets, always in the same order.
    pub fn asset_classes(&self, holdings: &[Holding]) -> Vec<AssetClassSlice> {
        let mut values = [0.0_f64; 5];
        for holding in holdings {
            values[self.classifier.classify(holding).index()] += holding.current_value;
        }
        let total: f64 = values.iter().sum();

        AssetClass::ALL
            .iter()
            .zip(values)
            .zip(ASSET_CLASS_COLORS.iter())
            .map(|((class, value), color)| {
                let percent = percent_of(value, total, 1);
                AssetClassSlice {
                    class: *class,
                    label: format!("{}  {:.1}%", class.name(), percent),
                    value,
                    percent,
                    color: (*color).to_string(),
                }
            })
            .collect()
    }

    /// Paired invested/current bars for the top holdings.
    pub fn performance(&self, holdings: &[Holding]) -> PerformanceSeries {
        let top = self.top_holdings(holdings);
        PerformanceSeries {
            tickers: top.iter().map(|h| h.ticker.clone()).collect(),
            invested: top.iter().map(|h| h.invested_amount).collect(),
            current: top.iter().map(|h| h.current_value).collect(),
        }
    }

    pub fn chart_set(&self, holdings: &[Holding]) -> ChartSet {
        ChartSet {
            allocation: self.allocation(holdings),
            asset_classes: self.asset_classes(holdings),
            performance: self.performance(holdings),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

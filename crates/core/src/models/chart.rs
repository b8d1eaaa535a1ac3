use serde::{Deserialize, Serialize};

/// One slice of the allocation doughnut.
///
/// The core generates these; the renderer only draws them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    /// Ticker of the holding
    pub ticker: String,

    /// Legend label, e.g. "NVDA  17.1%"
    pub label: String,

    /// Current value in EUR
    pub value: f64,

    /// Share of the top-N sum, 1 decimal
    pub percent: f64,

    /// Palette colour assigned by rank
    pub color: String,
}

/// The five fixed asset-class buckets, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Etfs,
    TechStocks,
    OtherStocks,
    Commodities,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Etfs,
        AssetClass::TechStocks,
        AssetClass::OtherStocks,
        AssetClass::Commodities,
        AssetClass::Cash,
    ];

    /// Position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            AssetClass::Etfs => 0,
            AssetClass::TechStocks => 1,
            AssetClass::OtherStocks => 2,
            AssetClass::Commodities => 3,
            AssetClass::Cash => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetClass::Etfs => "ETFs",
            AssetClass::TechStocks => "Tech Stocks",
            AssetClass::OtherStocks => "Other Stocks",
            AssetClass::Commodities => "Commodities",
            AssetClass::Cash => "Cash",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// One bucket of the asset-class breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassSlice {
    pub class: AssetClass,

    /// Legend label, e.g. "ETFs  25.3%"
    pub label: String,

    /// Sum of current values of the bucket's members, EUR
    pub value: f64,

    /// Share of the sum across all buckets, 1 decimal
    pub percent: f64,

    pub color: String,
}

/// Paired invested/current bars keyed by ticker.
///
/// `tickers`, `invested` and `current` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSeries {
    pub tickers: Vec<String>,
    pub invested: Vec<f64>,
    pub current: Vec<f64>,
}

impl PerformanceSeries {
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// All three chart projections for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub allocation: Vec<AllocationSlice>,
    pub asset_classes: Vec<AssetClassSlice>,
    pub performance: PerformanceSeries,
}

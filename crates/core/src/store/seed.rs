use crate::models::holding::{Holding, HoldingDraft, TradeCurrency};
use super::memory::StoreContents;

/// The sample portfolio the dashboard ships with: 12 holdings, next id 13.
pub fn demo_holdings() -> Vec<Holding> {
    use TradeCurrency::{Eur, Usd};

    let rows: [(&str, &str, &str, TradeCurrency, f64, f64); 12] = [
        ("Vanguard S&P 500 UCITS ETF", "VUAA", "USA", Eur, 2502.99, 2712.05),
        ("iShares Nasdaq 100 UCITS ETF", "NQSE", "USA", Eur, 1638.99, 1926.83),
        ("Berkshire Hathaway Class B", "BRK.B", "USA", Usd, 1692.81, 1844.66),
        ("Alphabet Inc Class C", "GOOG", "USA", Usd, 758.00, 1639.32),
        ("Amazon.com Inc", "AMZN", "USA", Usd, 212.34, 215.31),
        ("NVIDIA Corp", "NVDA", "USA", Usd, 916.45, 3295.55),
        ("Apple Inc", "AAPL", "USA", Usd, 1979.04, 2602.34),
        ("Taiwan Semiconductor", "TSM", "Taiwan", Usd, 437.46, 788.44),
        ("Broadcom Inc", "AVGO", "USA", Usd, 248.51, 384.69),
        ("iRobot Corp (bankrupt)", "IRBTQ", "USA", Usd, 152.44, 0.63),
        ("Gold", "XAU", "Global", Eur, 185.22, 293.43),
        ("Cash (Revolut)", "CASH", "—", Eur, 2177.11, 2177.11),
    ];

    rows.into_iter()
        .zip(1..)
        .map(|((name, ticker, country, ccy, invested, current), id)| {
            Holding::from_draft(id, HoldingDraft::new(name, ticker, country, ccy, invested, current))
        })
        .collect()
}

/// Store contents holding the demo portfolio.
pub fn demo_contents() -> StoreContents {
    StoreContents {
        next_id: 13,
        holdings: demo_holdings(),
    }
}

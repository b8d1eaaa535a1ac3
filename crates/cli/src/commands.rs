//! CLI commands
//!
//! Argument parsing for the dashboard front end, via clap derive.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use portfolio_dashboard_core::models::holding::{HoldingForm, HoldingId};

/// Portfolio Dashboard - holdings, gain/loss and allocation in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "portfolio-dashboard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Portfolio holdings dashboard: metrics, charts and holding management"
)]
pub struct CliApp {
    /// The command to execute (defaults to `show`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "dashboard.toml", global = true)]
    pub config: PathBuf,

    /// Print the view model as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show metrics, holdings and charts
    Show,

    /// Add a holding
    Add(HoldingArgs),

    /// Edit a holding; omitted fields keep their current value
    Edit(EditCmd),

    /// Delete a holding
    Delete(DeleteCmd),

    /// Fill an empty store with the sample portfolio
    Seed,
}

/// Holding fields as typed by the user
#[derive(Args, Debug, Default)]
pub struct HoldingArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Ticker symbol (uppercased)
    #[arg(long)]
    pub ticker: Option<String>,

    /// Country label
    #[arg(long)]
    pub country: Option<String>,

    /// Trade currency: EUR, USD or GBP
    #[arg(long = "currency", value_name = "CCY")]
    pub trade_currency: Option<String>,

    /// Invested amount in EUR
    #[arg(long = "invested", value_name = "EUR")]
    pub invested_amount: Option<String>,

    /// Current value in EUR
    #[arg(long = "current", value_name = "EUR")]
    pub current_value: Option<String>,
}

impl HoldingArgs {
    /// Overlay the given fields on `base`.
    pub fn into_form(self, base: HoldingForm) -> HoldingForm {
        HoldingForm {
            name: self.name.unwrap_or(base.name),
            ticker: self.ticker.unwrap_or(base.ticker),
            country: self.country.unwrap_or(base.country),
            trade_currency: self.trade_currency.unwrap_or(base.trade_currency),
            invested_amount: self.invested_amount.unwrap_or(base.invested_amount),
            current_value: self.current_value.unwrap_or(base.current_value),
        }
    }
}

#[derive(Args, Debug)]
pub struct EditCmd {
    /// Id of the holding to edit
    pub id: HoldingId,

    #[command(flatten)]
    pub fields: HoldingArgs,
}

#[derive(Args, Debug)]
pub struct DeleteCmd {
    /// Id of the holding to delete
    pub id: HoldingId,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

//! Portfolio Dashboard - terminal front end
//!
//! Loads configuration, connects to the holding store and renders the
//! dashboard view model, or issues add/edit/delete commands against it.

mod commands;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

use portfolio_dashboard_core::models::holding::HoldingForm;
use portfolio_dashboard_core::models::portfolio::MutationOutcome;
use portfolio_dashboard_core::models::settings::Settings;
use portfolio_dashboard_core::store::seed::demo_holdings;
use portfolio_dashboard_core::Dashboard;

use crate::commands::{CliApp, Command, DeleteCmd, EditCmd, HoldingArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (store URL and API key usually live there)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let settings = Settings::load(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;
    init_logging(app.verbose, app.debug, &settings.logging.level);

    let mut dashboard = Dashboard::connect(&settings)
        .await
        .context("Failed to load holdings from the store")?;
    tracing::info!(store = dashboard.store_name(), holdings = dashboard.holdings().len(), "dashboard loaded");

    match app.command.unwrap_or(Command::Show) {
        Command::Show => {}
        Command::Add(fields) => add_command(&mut dashboard, fields).await?,
        Command::Edit(cmd) => edit_command(&mut dashboard, cmd).await?,
        Command::Delete(cmd) => delete_command(&mut dashboard, cmd).await?,
        Command::Seed => seed_command(&mut dashboard).await?,
    }

    print_view(&dashboard, app.json)
}

fn init_logging(verbose: bool, debug: bool, configured: &str) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
    };

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn print_view(dashboard: &Dashboard, json: bool) -> Result<()> {
    let view = dashboard.view_now();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_text(&view));
    }
    Ok(())
}

/// Map a mutation outcome to the CLI's exit behaviour.
fn check_outcome(outcome: MutationOutcome, action: &str) -> Result<()> {
    match outcome {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Rejected(reason) => bail!("{action} rejected: {reason}"),
        MutationOutcome::Failed(reason) => bail!("{action} failed: {reason}"),
        MutationOutcome::Ignored => bail!("{action}: nothing to submit"),
    }
}

async fn add_command(dashboard: &mut Dashboard, fields: HoldingArgs) -> Result<()> {
    let form = fields.into_form(HoldingForm {
        trade_currency: "EUR".to_string(),
        ..HoldingForm::default()
    });
    check_outcome(dashboard.add_holding(&form).await, "add")
}

async fn edit_command(dashboard: &mut Dashboard, cmd: EditCmd) -> Result<()> {
    let Some(current) = dashboard.holding(cmd.id).map(HoldingForm::from_holding) else {
        bail!("no holding with id {}", cmd.id);
    };
    let form = cmd.fields.into_form(current);
    check_outcome(dashboard.edit_holding(cmd.id, &form).await, "edit")
}

async fn delete_command(dashboard: &mut Dashboard, cmd: DeleteCmd) -> Result<()> {
    let Some(prompt) = dashboard.open_delete(cmd.id) else {
        bail!("no holding with id {}", cmd.id);
    };

    if !cmd.yes && !confirm(&prompt)? {
        dashboard.close_delete();
        println!("Cancelled.");
        return Ok(());
    }

    let outcome = dashboard.confirm_delete().await;
    check_outcome(outcome, "delete")
}

async fn seed_command(dashboard: &mut Dashboard) -> Result<()> {
    if !dashboard.holdings().is_empty() {
        bail!("store already has {} holdings; seed only fills an empty store", dashboard.holdings().len());
    }
    for holding in demo_holdings() {
        let form = HoldingForm::from_holding(&holding);
        check_outcome(dashboard.add_holding(&form).await, "seed")?;
    }
    tracing::info!(count = dashboard.holdings().len(), "store seeded with sample portfolio");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

use crate::errors::CoreError;
use crate::models::holding::{HoldingDraft, HoldingForm, TradeCurrency};
use crate::models::portfolio::{DashboardState, MutationOutcome, OPERATION_FAILED_NOTICE};
use crate::models::view::FormMode;
use crate::store::traits::HoldingStore;

/// Validates holding input and runs create/edit/delete round trips.
///
/// Every mutation goes to the store first and is followed by a full reload;
/// the local snapshot is never patched. Validation failures return before
/// the store is contacted.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Turn raw form text into a draft.
    ///
    /// - `name`, `country` are trimmed; `ticker` is trimmed and uppercased
    /// - empty `name` or `ticker` is rejected
    /// - blank currency means EUR
    /// - blank or unparsable amounts count as 0; negative or non-finite are rejected
    pub fn validate_form(&self, form: &HoldingForm) -> Result<HoldingDraft, CoreError> {
        let name = form.name.trim();
        let ticker = form.ticker.trim().to_uppercase();
        let country = form.country.trim();

        if name.is_empty() {
            return Err(CoreError::Validation("name must not be empty".into()));
        }
        if ticker.is_empty() {
            return Err(CoreError::Validation("ticker must not be empty".into()));
        }

        let trade_currency = if form.trade_currency.trim().is_empty() {
            TradeCurrency::default()
        } else {
            form.trade_currency.parse::<TradeCurrency>()?
        };

        let invested_amount = Self::parse_amount("invested amount", &form.invested_amount)?;
        let current_value = Self::parse_amount("current value", &form.current_value)?;

        Ok(HoldingDraft {
            name: name.to_string(),
            ticker,
            country: country.to_string(),
            trade_currency,
            invested_amount,
            current_value,
        })
    }

    fn parse_amount(field: &str, raw: &str) -> Result<f64, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        let value = match trimmed.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::debug!(field, raw = trimmed, "unparsable amount treated as 0");
                return Ok(0.0);
            }
        };
        if !value.is_finite() {
            return Err(CoreError::Validation(format!("{field} must be a finite number")));
        }
        if value < 0.0 {
            return Err(CoreError::Validation(format!("{field} must not be negative, got {value}")));
        }
        Ok(value)
    }

    // ── Store round trips ───────────────────────────────────────────

    /// Load the full snapshot and swap it in.
    ///
    /// On failure the previous snapshot stays and a notice is set.
    pub async fn reload(
        &self,
        store: &dyn HoldingStore,
        state: DashboardState,
    ) -> (DashboardState, MutationOutcome) {
        match store.list().await {
            Ok(holdings) => {
                tracing::debug!(backend = store.name(), count = holdings.len(), "snapshot reloaded");
                (state.replace_snapshot(holdings).clear_notice(), MutationOutcome::Applied)
            }
            Err(e) => Self::fail(store, state, "reload", e),
        }
    }

    /// Submit the open form: insert when adding, update when editing.
    pub async fn save(
        &self,
        store: &dyn HoldingStore,
        state: DashboardState,
        form: &HoldingForm,
    ) -> (DashboardState, MutationOutcome) {
        if state.form == FormMode::Closed {
            return (state, MutationOutcome::Ignored);
        }

        let draft = match self.validate_form(form) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, "holding form rejected");
                return (state, MutationOutcome::Rejected(e.to_string()));
            }
        };

        let result = match state.form {
            FormMode::Editing(id) => store.update(id, draft).await,
            _ => store.insert(draft).await.map(|holding| {
                tracing::info!(id = holding.id, ticker = %holding.ticker, "holding created");
            }),
        };

        match result {
            Ok(()) => {
                if let FormMode::Editing(id) = state.form {
                    tracing::info!(id, "holding updated");
                }
                self.reload(store, state.close_form()).await
            }
            Err(e) => Self::fail(store, state, "save", e),
        }
    }

    /// Delete the holding awaiting confirmation.
    pub async fn confirm_delete(
        &self,
        store: &dyn HoldingStore,
        state: DashboardState,
    ) -> (DashboardState, MutationOutcome) {
        let Some(id) = state.deleting else {
            return (state, MutationOutcome::Ignored);
        };

        match store.delete(id).await {
            Ok(()) => {
                tracing::info!(id, "holding deleted");
                self.reload(store, state.close_delete()).await
            }
            Err(e) => Self::fail(store, state, "delete", e),
        }
    }

    fn fail(
        store: &dyn HoldingStore,
        state: DashboardState,
        action: &str,
        error: CoreError,
    ) -> (DashboardState, MutationOutcome) {
        tracing::error!(backend = store.name(), action, error = %error, "store operation failed");
        (
            state.with_notice(OPERATION_FAILED_NOTICE),
            MutationOutcome::Failed(error.to_string()),
        )
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

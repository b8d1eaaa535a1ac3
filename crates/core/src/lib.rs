pub mod errors;
pub mod models;
pub mod services;
pub mod store;

use chrono::NaiveDate;
use models::{
    analytics::PortfolioMetrics,
    chart::ChartSet,
    holding::{Holding, HoldingForm, HoldingId},
    portfolio::{DashboardState, MutationOutcome},
    settings::Settings,
    view::DashboardView,
};
use services::{
    analytics_service::AnalyticsService,
    chart_service::{AssetClassifier, ChartService},
    currency_service::CurrencyService,
    portfolio_service::PortfolioService,
    view_service::ViewService,
};
use store::traits::HoldingStore;

use errors::CoreError;

/// Main entry point for the portfolio dashboard core.
/// Owns the store handle, the single application state, and the services
/// that derive metrics and charts from it.
#[must_use]
pub struct Dashboard {
    store: Box<dyn HoldingStore>,
    state: DashboardState,
    portfolio_service: PortfolioService,
    view_service: ViewService,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("store", &self.store.name())
            .field("holdings", &self.state.holdings.len())
            .field("form", &self.state.form)
            .field("deleting", &self.state.deleting)
            .field("notice", &self.state.notice)
            .finish()
    }
}

impl Dashboard {
    /// Dashboard over `store` with default rates and asset classes.
    /// The snapshot is empty until `load()` is called.
    pub fn new(store: Box<dyn HoldingStore>) -> Self {
        Self::build(store, ViewService::new())
    }

    /// Dashboard configured from `[fx]` and `[asset_classes]` settings.
    pub fn with_settings(store: Box<dyn HoldingStore>, settings: &Settings) -> Result<Self, CoreError> {
        let currency_service = CurrencyService::from_settings(&settings.fx);
        let classifier = AssetClassifier::from_settings(&settings.asset_classes)?;
        let view_service = ViewService::with_services(
            AnalyticsService::with_currency_service(currency_service),
            ChartService::with_classifier(classifier),
        );
        Ok(Self::build(store, view_service))
    }

    /// Open the configured store and load the first snapshot.
    pub async fn connect(settings: &Settings) -> Result<Self, CoreError> {
        let store = store::open_store(&settings.store)?;
        let mut dashboard = Self::with_settings(store, settings)?;
        match dashboard.load().await {
            MutationOutcome::Failed(message) => Err(CoreError::Store {
                backend: dashboard.store.name().to_string(),
                message,
            }),
            _ => Ok(dashboard),
        }
    }

    // ── Snapshot ────────────────────────────────────────────────────

    /// Reload the full snapshot from the store.
    pub async fn load(&mut self) -> MutationOutcome {
        let state = std::mem::take(&mut self.state);
        let (state, outcome) = self.portfolio_service.reload(self.store.as_ref(), state).await;
        self.state = state;
        outcome
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.state.holdings
    }

    #[must_use]
    pub fn holding(&self, id: HoldingId) -> Option<&Holding> {
        self.state.holding(id)
    }

    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    // ── Derived views ───────────────────────────────────────────────

    #[must_use]
    pub fn metrics(&self) -> PortfolioMetrics {
        self.view_service.analytics().portfolio_metrics(&self.state.holdings)
    }

    #[must_use]
    pub fn charts(&self) -> ChartSet {
        self.view_service.charts().chart_set(&self.state.holdings)
    }

    /// The full view model for a render pass dated `today`.
    #[must_use]
    pub fn view(&self, today: NaiveDate) -> DashboardView {
        self.view_service.build(&self.state, today)
    }

    /// The view model dated with the local calendar day.
    #[must_use]
    pub fn view_now(&self) -> DashboardView {
        self.view(chrono::Local::now().date_naive())
    }

    // ── Dialogs ─────────────────────────────────────────────────────

    pub fn open_add(&mut self) {
        self.transition(DashboardState::open_add);
    }

    /// Open the edit dialog and return the pre-filled form, or `None` for an unknown id.
    pub fn open_edit(&mut self, id: HoldingId) -> Option<HoldingForm> {
        let form = self.state.holding(id).map(HoldingForm::from_holding)?;
        self.transition(|s| s.open_edit(id));
        Some(form)
    }

    pub fn close_form(&mut self) {
        self.transition(DashboardState::close_form);
    }

    /// Start a delete; returns the confirmation prompt, or `None` for an unknown id.
    pub fn open_delete(&mut self, id: HoldingId) -> Option<String> {
        self.transition(|s| s.open_delete(id));
        self.state.delete_prompt()
    }

    pub fn close_delete(&mut self) {
        self.transition(DashboardState::close_delete);
    }

    pub fn dismiss_all(&mut self) {
        self.transition(DashboardState::dismiss_all);
    }

    pub fn clear_notice(&mut self) {
        self.transition(DashboardState::clear_notice);
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Submit the open add/edit form.
    pub async fn save_holding(&mut self, form: &HoldingForm) -> MutationOutcome {
        let state = std::mem::take(&mut self.state);
        let (state, outcome) = self
            .portfolio_service
            .save(self.store.as_ref(), state, form)
            .await;
        self.state = state;
        outcome
    }

    /// Add a holding in one step (open the add dialog, then submit).
    pub async fn add_holding(&mut self, form: &HoldingForm) -> MutationOutcome {
        self.open_add();
        let outcome = self.save_holding(form).await;
        if !outcome.is_applied() {
            self.close_form();
        }
        outcome
    }

    /// Edit a holding in one step.
    pub async fn edit_holding(&mut self, id: HoldingId, form: &HoldingForm) -> MutationOutcome {
        if self.open_edit(id).is_none() {
            return MutationOutcome::Rejected(CoreError::HoldingNotFound(id).to_string());
        }
        let outcome = self.save_holding(form).await;
        if !outcome.is_applied() {
            self.close_form();
        }
        outcome
    }

    /// Delete the holding whose confirmation is pending.
    pub async fn confirm_delete(&mut self) -> MutationOutcome {
        let state = std::mem::take(&mut self.state);
        let (state, outcome) = self
            .portfolio_service
            .confirm_delete(self.store.as_ref(), state)
            .await;
        self.state = state;
        outcome
    }

    /// Delete a holding in one step.
    pub async fn delete_holding(&mut self, id: HoldingId) -> MutationOutcome {
        if self.open_delete(id).is_none() {
            return MutationOutcome::Rejected(CoreError::HoldingNotFound(id).to_string());
        }
        let outcome = self.confirm_delete().await;
        if !outcome.is_applied() {
            self.close_delete();
        }
        outcome
    }

    // ── Internal ────────────────────────────────────────────────────

    fn transition(&mut self, f: impl FnOnce(DashboardState) -> DashboardState) {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
    }

    fn build(store: Box<dyn HoldingStore>, view_service: ViewService) -> Self {
        Self {
            store,
            state: DashboardState::default(),
            portfolio_service: PortfolioService::new(),
            view_service,
        }
    }
}

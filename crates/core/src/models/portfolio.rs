use serde::{Deserialize, Serialize};

use super::holding::{Holding, HoldingId};
use super::view::FormMode;

/// Notice shown after any failed store round trip.
pub const OPERATION_FAILED_NOTICE: &str = "Operation failed. Please try again.";

/// The application state: the latest holdings snapshot plus dialog state.
///
/// Transitions take the state by value and return the next one; the owner
/// (the `Dashboard` facade or a UI) keeps the single mutable reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Full snapshot from the store, ordered by id ascending
    pub holdings: Vec<Holding>,

    /// Open form dialog
    pub form: FormMode,

    /// Holding awaiting delete confirmation
    pub deleting: Option<HoldingId>,

    /// User-facing notice from the last failed operation
    pub notice: Option<String>,
}

impl DashboardState {
    pub fn with_holdings(holdings: Vec<Holding>) -> Self {
        Self::default().replace_snapshot(holdings)
    }

    #[must_use]
    pub fn holding(&self, id: HoldingId) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.id == id)
    }

    /// Swap in a freshly loaded snapshot. The whole collection is replaced.
    #[must_use]
    pub fn replace_snapshot(mut self, mut holdings: Vec<Holding>) -> Self {
        holdings.sort_by_key(|h| h.id);
        self.holdings = holdings;
        // A reload may have removed the row a dialog points at.
        if let FormMode::Editing(id) = self.form {
            if self.holding(id).is_none() {
                self.form = FormMode::Closed;
            }
        }
        if let Some(id) = self.deleting {
            if self.holding(id).is_none() {
                self.deleting = None;
            }
        }
        self
    }

    // ── Dialog transitions ──────────────────────────────────────────

    #[must_use]
    pub fn open_add(mut self) -> Self {
        self.form = FormMode::Adding;
        self
    }

    /// Open the edit form; unknown ids leave the state unchanged.
    #[must_use]
    pub fn open_edit(mut self, id: HoldingId) -> Self {
        if self.holding(id).is_some() {
            self.form = FormMode::Editing(id);
        }
        self
    }

    #[must_use]
    pub fn close_form(mut self) -> Self {
        self.form = FormMode::Closed;
        self
    }

    /// Ask for delete confirmation; unknown ids leave the state unchanged.
    #[must_use]
    pub fn open_delete(mut self, id: HoldingId) -> Self {
        if self.holding(id).is_some() {
            self.deleting = Some(id);
        }
        self
    }

    #[must_use]
    pub fn close_delete(mut self) -> Self {
        self.deleting = None;
        self
    }

    /// Escape: close every dialog.
    #[must_use]
    pub fn dismiss_all(self) -> Self {
        self.close_form().close_delete()
    }

    #[must_use]
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    #[must_use]
    pub fn clear_notice(mut self) -> Self {
        self.notice = None;
        self
    }

    /// "Are you sure…" text for the pending delete.
    #[must_use]
    pub fn delete_prompt(&self) -> Option<String> {
        let id = self.deleting?;
        let holding = self.holding(id)?;
        Some(format!(
            "Are you sure you want to remove {} ({}) from your portfolio?",
            holding.name, holding.ticker
        ))
    }
}

/// What a create/edit/delete command ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// Store accepted the change and the snapshot was reloaded
    Applied,
    /// Input failed validation; the store was not contacted
    Rejected(String),
    /// Store or transport failure; a notice was set and the snapshot kept
    Failed(String),
    /// No dialog was open, so there was nothing to submit
    Ignored,
}

impl MutationOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

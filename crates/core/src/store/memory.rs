use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingDraft, HoldingId};
use super::traits::HoldingStore;

/// Rows plus the id counter. This is also the on-disk shape of `FileHoldingStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreContents {
    /// Next id to hand out; only ever grows
    pub next_id: HoldingId,

    /// Rows ordered by id ascending
    pub holdings: Vec<Holding>,
}

impl Default for StoreContents {
    fn default() -> Self {
        Self {
            next_id: 1,
            holdings: Vec::new(),
        }
    }
}

impl StoreContents {
    /// Sort rows and make sure `next_id` is past every existing id.
    pub fn normalized(mut self) -> Self {
        self.holdings.sort_by_key(|h| h.id);
        let max_id = self.holdings.iter().map(|h| h.id).max().unwrap_or(0);
        if self.next_id <= max_id {
            self.next_id = max_id + 1;
        }
        self
    }

    pub(crate) fn insert(&mut self, draft: HoldingDraft) -> Holding {
        let holding = Holding::from_draft(self.next_id, draft);
        self.next_id += 1;
        self.holdings.push(holding.clone());
        holding
    }

    pub(crate) fn update(&mut self, id: HoldingId, draft: HoldingDraft) -> Result<(), CoreError> {
        let slot = self
            .holdings
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(CoreError::HoldingNotFound(id))?;
        *slot = Holding::from_draft(id, draft);
        Ok(())
    }

    pub(crate) fn delete(&mut self, id: HoldingId) -> Result<(), CoreError> {
        let idx = self
            .holdings
            .iter()
            .position(|h| h.id == id)
            .ok_or(CoreError::HoldingNotFound(id))?;
        self.holdings.remove(idx);
        Ok(())
    }
}

/// Process-local store. Used for tests, demos and as the core of the file store.
#[derive(Debug, Default)]
pub struct MemoryHoldingStore {
    contents: Mutex<StoreContents>,
}

impl MemoryHoldingStore {
    /// An empty store whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `holdings`; ids are kept as given.
    pub fn with_holdings(holdings: Vec<Holding>) -> Self {
        Self::from_contents(StoreContents {
            next_id: 1,
            holdings,
        })
    }

    pub fn from_contents(contents: StoreContents) -> Self {
        Self {
            contents: Mutex::new(contents.normalized()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreContents>, CoreError> {
        self.contents.lock().map_err(|_| CoreError::Store {
            backend: "memory".into(),
            message: "store lock poisoned".into(),
        })
    }

    /// Apply `change` to a copy of the contents and keep it only if `commit`
    /// accepts the result. On any error the stored contents are untouched.
    pub(crate) fn apply<T>(
        &self,
        change: impl FnOnce(&mut StoreContents) -> Result<T, CoreError>,
        commit: impl FnOnce(&StoreContents) -> Result<(), CoreError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        commit(&next)?;
        *guard = next;
        Ok(value)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingStore for MemoryHoldingStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Holding>, CoreError> {
        Ok(self.lock()?.holdings.clone())
    }

    async fn insert(&self, draft: HoldingDraft) -> Result<Holding, CoreError> {
        Ok(self.lock()?.insert(draft))
    }

    async fn update(&self, id: HoldingId, draft: HoldingDraft) -> Result<(), CoreError> {
        self.lock()?.update(id, draft)
    }

    async fn delete(&self, id: HoldingId) -> Result<(), CoreError> {
        self.lock()?.delete(id)
    }
}

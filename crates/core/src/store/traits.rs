use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingDraft, HoldingId};

/// Durable record store holding one row per holding.
///
/// The dashboard never patches its snapshot locally: after every mutation it
/// calls `list()` again and replaces the whole collection. Backends (remote
/// REST table, JSON file, in-memory) implement this trait and nothing else
/// in the crate needs to know which one is in use.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HoldingStore: Send + Sync {
    /// Human-readable backend name (for logs/errors).
    fn name(&self) -> &str;

    /// All holdings, ordered by id ascending.
    async fn list(&self) -> Result<Vec<Holding>, CoreError>;

    /// Create a holding; the store assigns the next id.
    async fn insert(&self, draft: HoldingDraft) -> Result<Holding, CoreError>;

    /// Replace every field of an existing holding. The id is immutable.
    async fn update(&self, id: HoldingId, draft: HoldingDraft) -> Result<(), CoreError>;

    /// Remove a holding. Its id is never handed out again.
    async fn delete(&self, id: HoldingId) -> Result<(), CoreError>;
}

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingDraft, HoldingId};
use super::memory::{MemoryHoldingStore, StoreContents};
use super::traits::HoldingStore;

/// Holdings kept in a local JSON file, rewritten after every mutation.
///
/// File shape: `{ "next_id": 13, "holdings": [ ... ] }`. A missing file is an
/// empty store; it is created on the first write.
#[derive(Debug)]
pub struct FileHoldingStore {
    path: PathBuf,
    memory: MemoryHoldingStore,
}

impl FileHoldingStore {
    /// Open (or prepare to create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let contents = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str::<StoreContents>(&text).map_err(|e| {
                CoreError::Deserialization(format!(
                    "Failed to parse holdings file {}: {e}",
                    path.display()
                ))
            })?
        } else {
            tracing::info!(path = %path.display(), "holdings file not found, starting empty");
            StoreContents::default()
        };

        Ok(Self {
            path,
            memory: MemoryHoldingStore::from_contents(contents),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to disk. Called with the candidate contents before
    /// they replace the in-memory rows.
    fn persist(&self, contents: &StoreContents) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(contents)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize holdings: {e}")))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingStore for FileHoldingStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn list(&self) -> Result<Vec<Holding>, CoreError> {
        self.memory.list().await
    }

    async fn insert(&self, draft: HoldingDraft) -> Result<Holding, CoreError> {
        self.memory
            .apply(|contents| Ok(contents.insert(draft)), |next| self.persist(next))
    }

    async fn update(&self, id: HoldingId, draft: HoldingDraft) -> Result<(), CoreError> {
        self.memory
            .apply(|contents| contents.update(id, draft), |next| self.persist(next))
    }

    async fn delete(&self, id: HoldingId) -> Result<(), CoreError> {
        self.memory
            .apply(|contents| contents.delete(id), |next| self.persist(next))
    }
}

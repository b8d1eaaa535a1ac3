pub mod traits;

// Store backends
pub mod file;
pub mod memory;
pub mod rest;
pub mod seed;

use crate::errors::CoreError;
use crate::models::settings::{StoreBackend, StoreSettings};

use self::file::FileHoldingStore;
use self::memory::MemoryHoldingStore;
use self::rest::RestHoldingStore;
use self::traits::HoldingStore;

/// Open the backend selected by `[store]` settings.
///
/// The memory backend starts with the demo portfolio so a bare run has
/// something to show.
pub fn open_store(settings: &StoreSettings) -> Result<Box<dyn HoldingStore>, CoreError> {
    let store: Box<dyn HoldingStore> = match settings.backend {
        StoreBackend::Memory => Box::new(MemoryHoldingStore::from_contents(seed::demo_contents())),
        StoreBackend::File => {
            let path = settings
                .path
                .as_ref()
                .ok_or_else(|| CoreError::Config("store.path is required for the file backend".into()))?;
            Box::new(FileHoldingStore::open(path)?)
        }
        StoreBackend::Rest => Box::new(RestHoldingStore::from_settings(settings)?),
    };
    tracing::debug!(backend = store.name(), "holding store opened");
    Ok(store)
}

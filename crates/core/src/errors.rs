use thiserror::Error;

use crate::models::holding::HoldingId;

/// Unified error type for the entire portfolio-dashboard-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ───────────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(HoldingId),

    // ── Store / Network ─────────────────────────────────────────────
    #[error("Store error ({backend}): {message}")]
    Store {
        backend: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Serialization / File ────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// Validation failures abort a mutation without touching the store.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Store URLs carry filters like `?id=eq.3`; keep them out of user-facing text.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

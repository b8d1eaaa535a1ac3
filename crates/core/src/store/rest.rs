use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingDraft, HoldingId};
use crate::models::settings::StoreSettings;
use super::traits::HoldingStore;

const BACKEND: &str = "rest";

/// Remote holdings table behind a PostgREST-style API (e.g. Supabase).
///
/// - **List**: `GET /rest/v1/{table}?select=*&order=id.asc`
/// - **Insert**: `POST /rest/v1/{table}` with `Prefer: return=representation`
/// - **Update**: `PATCH /rest/v1/{table}?id=eq.{id}`
/// - **Delete**: `DELETE /rest/v1/{table}?id=eq.{id}`
///
/// When an API key is configured it is sent both as `apikey` and as a bearer token.
pub struct RestHoldingStore {
    client: Client,
    base_url: String,
    table: String,
    api_key: Option<String>,
}

impl RestHoldingStore {
    pub fn new(
        base_url: impl Into<String>,
        table: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self::with_client(builder.build().unwrap_or_else(|_| Client::new()), base_url, table, api_key)
    }

    /// Use a caller-built client (custom proxy, TLS or timeout settings).
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        table: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table: table.into(),
            api_key,
        }
    }

    /// Build from `[store]` settings; the URL must be present.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, CoreError> {
        let url = settings
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| CoreError::Config("store.url is required for the rest backend".into()))?;
        Ok(Self::new(
            url,
            settings.table.clone(),
            settings.api_key.clone(),
            settings.timeout_secs,
        ))
    }

    /// Collection endpoint, e.g. `https://xyz.supabase.co/rest/v1/holdings`.
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Endpoint addressing a single row.
    pub fn row_url(&self, id: HoldingId) -> String {
        format!("{}?id=eq.{id}", self.table_url())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    /// Turn a non-2xx response into `CoreError::Store`, keeping the body for context.
    async fn check(response: Response, action: &str) -> Result<Response, CoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CoreError::Store {
            backend: BACKEND.into(),
            message: format!("{action} failed with HTTP {status}: {body}"),
        })
    }

    async fn parse_rows(response: Response, action: &str) -> Result<Vec<Holding>, CoreError> {
        response.json::<Vec<Holding>>().await.map_err(|e| CoreError::Store {
            backend: BACKEND.into(),
            message: format!("Failed to parse {action} response: {e}"),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingStore for RestHoldingStore {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn list(&self) -> Result<Vec<Holding>, CoreError> {
        let url = format!("{}?select=*&order=id.asc", self.table_url());
        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check(response, "list").await?;
        let mut rows = Self::parse_rows(response, "list").await?;
        rows.sort_by_key(|h| h.id);
        Ok(rows)
    }

    async fn insert(&self, draft: HoldingDraft) -> Result<Holding, CoreError> {
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&draft);
        let response = self.authorize(request).send().await?;
        let response = Self::check(response, "insert").await?;
        Self::parse_rows(response, "insert")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Store {
                backend: BACKEND.into(),
                message: "insert returned no row".into(),
            })
    }

    async fn update(&self, id: HoldingId, draft: HoldingDraft) -> Result<(), CoreError> {
        let request = self
            .client
            .patch(self.row_url(id))
            .header("Prefer", "return=representation")
            .json(&draft);
        let response = self.authorize(request).send().await?;
        let response = Self::check(response, "update").await?;
        if Self::parse_rows(response, "update").await?.is_empty() {
            return Err(CoreError::HoldingNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: HoldingId) -> Result<(), CoreError> {
        let request = self
            .client
            .delete(self.row_url(id))
            .header("Prefer", "return=representation");
        let response = self.authorize(request).send().await?;
        let response = Self::check(response, "delete").await?;
        if Self::parse_rows(response, "delete").await?.is_empty() {
            return Err(CoreError::HoldingNotFound(id));
        }
        Ok(())
    }
}

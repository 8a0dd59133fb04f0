//! Manager configuration.

use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::error::{SyncError, SyncResult};
use crate::model::AnalyticsQuery;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_enabled() -> bool {
    true
}

/// Where a manager talks to and which tenant it is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// API base URL (e.g. `https://api.whisperly.dev`).
    pub base_url: String,
    /// Organization slug the manager is scoped to.
    pub entity_slug: String,
    /// When false the manager never issues its read query.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ManagerConfig {
    pub fn new(base_url: impl Into<String>, entity_slug: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            entity_slug: entity_slug.into(),
            enabled: true,
        }
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(SyncError::Config("base_url is empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "base_url must be http(s): {}",
                self.base_url
            )));
        }
        if self.entity_slug.trim().is_empty() {
            return Err(SyncError::Config("entity_slug is empty".to_string()));
        }
        Ok(())
    }

    /// Validate, then fetch the API handle for this configuration from `cache`.
    pub fn client(
        &self,
        cache: &ClientCache,
        token: &TokenAccessor,
    ) -> SyncResult<Arc<dyn WhisperlyApi>> {
        self.validate()?;
        Ok(cache.client_for(&self.base_url, token, &self.entity_slug))
    }
}

/// Scoping for the analytics manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsOptions {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            project_id: None,
            enabled: true,
        }
    }
}

impl AnalyticsOptions {
    pub fn query(&self) -> AnalyticsQuery {
        AnalyticsQuery {
            start_date: self.start_date,
            end_date: self.end_date,
            project_id: self.project_id.clone(),
        }
    }
}

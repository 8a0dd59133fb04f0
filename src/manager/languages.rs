use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::ManagerConfig;
use crate::error::{SyncError, SyncResult};
use crate::model::{AvailableLanguage, ProjectLanguagesResponse};
use crate::query::{sync_query, MutationState, QueryResult};
use crate::store::Store;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// How long the list of supported languages stays fresh.
pub const AVAILABLE_LANGUAGES_TTL: Duration = Duration::from_secs(60 * 60);

/// A project's target languages and the catalogue of supported languages.
pub struct LanguagesManager {
    api: Arc<dyn WhisperlyApi>,
    entity_slug: String,
    project_id: RwLock<String>,
    enabled: bool,
    project_languages: Store<QueryResult<ProjectLanguagesResponse>>,
    available: Store<QueryResult<Vec<AvailableLanguage>>>,
    fetched_at: Mutex<Option<Instant>>,
    update: MutationState,
}

impl LanguagesManager {
    pub fn new(
        api: Arc<dyn WhisperlyApi>,
        entity_slug: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            entity_slug: entity_slug.into(),
            project_id: RwLock::new(project_id.into()),
            enabled: true,
            project_languages: Store::default(),
            available: Store::default(),
            fetched_at: Mutex::new(None),
            update: MutationState::new(),
        }
    }

    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
        project_id: impl Into<String>,
    ) -> SyncResult<Self> {
        let api = config.client(cache, token)?;
        Ok(Self::new(api, config.entity_slug.clone(), project_id).with_enabled(config.enabled))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn project_id(&self) -> String {
        self.project_id.read().clone()
    }

    /// Re-scope to another project and re-sync.
    ///
    /// The previous project's languages and error are dropped first, so a
    /// failed or skipped query reads as "nothing loaded" for the new project.
    pub async fn set_project(&self, project_id: impl Into<String>) {
        let project_id = project_id.into();
        let changed = {
            let mut current = self.project_id.write();
            let changed = *current != project_id;
            *current = project_id;
            changed
        };
        if changed {
            self.project_languages.reset();
        }
        self.activate().await;
    }

    /// Query the project's languages and, when stale, the catalogue.
    pub async fn activate(&self) {
        if !self.enabled {
            return;
        }
        self.refetch_project_languages().await;
        if self.available_is_stale() {
            self.refetch_available().await;
        }
    }

    pub async fn refetch(&self) {
        self.refetch_project_languages().await;
    }

    async fn refetch_project_languages(&self) {
        let project_id = self.project_id();
        if self.entity_slug.is_empty() || project_id.is_empty() {
            return;
        }
        sync_query(
            &self.project_languages,
            "project_languages",
            self.api.get_project_languages(&self.entity_slug, &project_id),
        )
        .await;
    }

    async fn refetch_available(&self) {
        sync_query(
            &self.available,
            "available_languages",
            self.api.get_available_languages(),
        )
        .await;
        if self.available.read(|q| q.error.is_none()) {
            *self.fetched_at.lock() = Some(Instant::now());
        }
    }

    fn available_is_stale(&self) -> bool {
        match *self.fetched_at.lock() {
            Some(at) => at.elapsed() >= AVAILABLE_LANGUAGES_TTL,
            None => true,
        }
    }

    /// Replace the project's languages (comma-separated codes), then re-query.
    pub async fn update_languages(&self, languages: &str) -> SyncResult<ProjectLanguagesResponse> {
        let project_id = self.project_id();
        if project_id.is_empty() {
            return Err(SyncError::MissingScope("project_id"));
        }
        let updated = self
            .update
            .run(
                "update_project_languages",
                self.api
                    .update_project_languages(&self.entity_slug, &project_id, languages),
            )
            .await?;
        debug!(project_id = %project_id, languages, "project languages updated");
        self.refetch_project_languages().await;
        Ok(updated)
    }

    pub fn project_languages(&self) -> Option<String> {
        self.project_languages
            .read(|q| q.data.as_ref().map(|r| r.languages.clone()))
    }

    pub fn available_languages(&self) -> Vec<AvailableLanguage> {
        self.available
            .read(|q| q.data.clone().unwrap_or_default())
    }

    /// Either query outstanding. A pending update is reported by [`Self::is_updating`].
    pub fn is_loading(&self) -> bool {
        self.project_languages.read(|q| q.is_loading) || self.available.read(|q| q.is_loading)
    }

    /// The project query's error, else the catalogue's.
    pub fn error(&self) -> Option<String> {
        self.project_languages
            .read(|q| q.error.clone())
            .or_else(|| self.available.read(|q| q.error.clone()))
    }

    pub fn is_updating(&self) -> bool {
        self.update.is_pending()
    }
}

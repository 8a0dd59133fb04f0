use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::ManagerConfig;
use crate::error::{SyncError, SyncResult};
use crate::model::{Dictionary, DictionaryCreateRequest, DictionaryUpdateRequest};
use crate::query::{sync_query, MutationState};
use crate::store::dictionary::{self, DictionaryStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Dictionary entries of one project.
pub struct DictionaryManager {
    api: Arc<dyn WhisperlyApi>,
    store: DictionaryStore,
    entity_slug: String,
    project_id: RwLock<String>,
    enabled: bool,
    create: MutationState,
    update: MutationState,
    delete: MutationState,
}

impl DictionaryManager {
    pub fn new(
        api: Arc<dyn WhisperlyApi>,
        store: DictionaryStore,
        entity_slug: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            entity_slug: entity_slug.into(),
            project_id: RwLock::new(project_id.into()),
            enabled: true,
            create: MutationState::new(),
            update: MutationState::new(),
            delete: MutationState::new(),
        }
    }

    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
        store: DictionaryStore,
        project_id: impl Into<String>,
    ) -> SyncResult<Self> {
        let api = config.client(cache, token)?;
        Ok(Self::new(api, store, config.entity_slug.clone(), project_id)
            .with_enabled(config.enabled))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn project_id(&self) -> String {
        self.project_id.read().clone()
    }

    /// Re-scope to another project and re-sync.
    pub async fn set_project(&self, project_id: impl Into<String>) {
        let project_id = project_id.into();
        debug!(project_id = %project_id, "dictionary scope changed");
        *self.project_id.write() = project_id;
        self.activate().await;
    }

    pub async fn activate(&self) {
        if self.enabled {
            self.refetch().await;
        }
    }

    pub async fn refetch(&self) {
        let project_id = self.project_id();
        if project_id.is_empty() {
            return;
        }
        let query = async {
            self.api
                .list_dictionaries(&self.entity_slug, &project_id)
                .await
                .map(|list| (project_id.clone(), list))
        };
        sync_query(self.store.store(), "dictionaries", query).await;
    }

    fn require_project(&self) -> SyncResult<String> {
        let project_id = self.project_id();
        if project_id.is_empty() {
            return Err(SyncError::MissingScope("project_id"));
        }
        Ok(project_id)
    }

    pub async fn create_dictionary(&self, request: DictionaryCreateRequest) -> SyncResult<Dictionary> {
        let project_id = self.require_project()?;
        let created = self
            .create
            .run(
                "create_dictionary",
                self.api.create_dictionary(&self.entity_slug, &project_id, request),
            )
            .await?;
        self.store.add_dictionary(&project_id, created.clone());
        Ok(created)
    }

    pub async fn update_dictionary(
        &self,
        dictionary_id: &str,
        request: DictionaryUpdateRequest,
    ) -> SyncResult<Dictionary> {
        let project_id = self.require_project()?;
        let updated = self
            .update
            .run(
                "update_dictionary",
                self.api
                    .update_dictionary(&self.entity_slug, &project_id, dictionary_id, request),
            )
            .await?;
        self.store.update_dictionary(&project_id, updated.clone());
        Ok(updated)
    }

    pub async fn delete_dictionary(&self, dictionary_id: &str) -> SyncResult<()> {
        let project_id = self.require_project()?;
        self.delete
            .run(
                "delete_dictionary",
                self.api
                    .delete_dictionary(&self.entity_slug, &project_id, dictionary_id),
            )
            .await?;
        self.store.remove_dictionary(&project_id, dictionary_id);
        Ok(())
    }

    pub fn select_dictionary(&self, dictionary_id: Option<String>) {
        self.store.select_dictionary(dictionary_id);
    }

    /// Cached dictionaries of the current project.
    pub fn dictionaries(&self) -> Vec<Dictionary> {
        let project_id = self.project_id();
        self.store
            .read(|s| dictionary::select_dictionaries_for_project(s, &project_id).to_vec())
    }

    pub fn selected_dictionary_id(&self) -> Option<String> {
        self.store
            .read(|s| dictionary::select_selected_dictionary_id(s).map(str::to_string))
    }

    pub fn selected_dictionary(&self) -> Option<Dictionary> {
        let project_id = self.project_id();
        self.store
            .read(|s| dictionary::select_selected_dictionary(s, &project_id).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.store.read(dictionary::select_is_loading)
            || self.create.is_pending()
            || self.update.is_pending()
            || self.delete.is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.store
            .read(|s| dictionary::select_error(s).map(str::to_string))
    }

    pub fn is_creating(&self) -> bool {
        self.create.is_pending()
    }

    pub fn is_updating(&self) -> bool {
        self.update.is_pending()
    }

    pub fn is_deleting(&self) -> bool {
        self.delete.is_pending()
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }
}

use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::ManagerConfig;
use crate::error::{SyncError, SyncResult};
use crate::model::{ExportFormat, Glossary, GlossaryCreateRequest, GlossaryUpdateRequest};
use crate::query::{sync_query, MutationState};
use crate::store::glossary::{self, GlossaryStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Glossary terms of one project, plus bulk import and export.
pub struct GlossaryManager {
    api: Arc<dyn WhisperlyApi>,
    store: GlossaryStore,
    entity_slug: String,
    project_id: RwLock<String>,
    enabled: bool,
    create: MutationState,
    update: MutationState,
    delete: MutationState,
    import: MutationState,
    export: MutationState,
}

impl GlossaryManager {
    pub fn new(
        api: Arc<dyn WhisperlyApi>,
        store: GlossaryStore,
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
            import: MutationState::new(),
            export: MutationState::new(),
        }
    }

    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
        store: GlossaryStore,
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

    pub async fn set_project(&self, project_id: impl Into<String>) {
        let project_id = project_id.into();
        debug!(project_id = %project_id, "glossary scope changed");
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
                .list_glossaries(&self.entity_slug, &project_id)
                .await
                .map(|list| (project_id.clone(), list))
        };
        sync_query(self.store.store(), "glossaries", query).await;
    }

    fn require_project(&self) -> SyncResult<String> {
        let project_id = self.project_id();
        if project_id.is_empty() {
            return Err(SyncError::MissingScope("project_id"));
        }
        Ok(project_id)
    }

    pub async fn create_glossary(&self, request: GlossaryCreateRequest) -> SyncResult<Glossary> {
        let project_id = self.require_project()?;
        let created = self
            .create
            .run(
                "create_glossary",
                self.api.create_glossary(&self.entity_slug, &project_id, request),
            )
            .await?;
        self.store.add_glossary(&project_id, created.clone());
        Ok(created)
    }

    pub async fn update_glossary(
        &self,
        glossary_id: &str,
        request: GlossaryUpdateRequest,
    ) -> SyncResult<Glossary> {
        let project_id = self.require_project()?;
        let updated = self
            .update
            .run(
                "update_glossary",
                self.api
                    .update_glossary(&self.entity_slug, &project_id, glossary_id, request),
            )
            .await?;
        self.store.update_glossary(&project_id, updated.clone());
        Ok(updated)
    }

    pub async fn delete_glossary(&self, glossary_id: &str) -> SyncResult<()> {
        let project_id = self.require_project()?;
        self.delete
            .run(
                "delete_glossary",
                self.api
                    .delete_glossary(&self.entity_slug, &project_id, glossary_id),
            )
            .await?;
        self.store.remove_glossary(&project_id, glossary_id);
        Ok(())
    }

    /// Create many glossaries at once; every created one is appended.
    pub async fn import_glossaries(
        &self,
        glossaries: Vec<GlossaryCreateRequest>,
    ) -> SyncResult<Vec<Glossary>> {
        let project_id = self.require_project()?;
        let imported = self
            .import
            .run(
                "import_glossaries",
                self.api
                    .import_glossaries(&self.entity_slug, &project_id, glossaries),
            )
            .await?;
        self.store.add_glossaries(&project_id, imported.clone());
        Ok(imported)
    }

    /// Export the project's glossaries as text. The cache is not touched.
    pub async fn export_glossaries(&self, format: ExportFormat) -> SyncResult<String> {
        let project_id = self.require_project()?;
        self.export
            .run(
                "export_glossaries",
                self.api
                    .export_glossaries(&self.entity_slug, &project_id, format),
            )
            .await
    }

    pub fn select_glossary(&self, glossary_id: Option<String>) {
        self.store.select_glossary(glossary_id);
    }

    pub fn glossaries(&self) -> Vec<Glossary> {
        let project_id = self.project_id();
        self.store
            .read(|s| glossary::select_glossaries_for_project(s, &project_id).to_vec())
    }

    pub fn selected_glossary_id(&self) -> Option<String> {
        self.store
            .read(|s| glossary::select_selected_glossary_id(s).map(str::to_string))
    }

    pub fn selected_glossary(&self) -> Option<Glossary> {
        let project_id = self.project_id();
        self.store
            .read(|s| glossary::select_selected_glossary(s, &project_id).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.store.read(glossary::select_is_loading)
            || self.create.is_pending()
            || self.update.is_pending()
            || self.delete.is_pending()
            || self.import.is_pending()
            || self.export.is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.store
            .read(|s| glossary::select_error(s).map(str::to_string))
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

    pub fn is_importing(&self) -> bool {
        self.import.is_pending()
    }

    pub fn is_exporting(&self) -> bool {
        self.export.is_pending()
    }

    pub fn store(&self) -> &GlossaryStore {
        &self.store
    }
}

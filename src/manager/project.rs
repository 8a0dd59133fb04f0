use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::ManagerConfig;
use crate::error::SyncResult;
use crate::model::{Project, ProjectCreateRequest, ProjectUpdateRequest};
use crate::query::{sync_query, MutationState, QueryResult};
use crate::store::project::{self, ProjectStore};
use crate::store::Store;
use std::sync::Arc;

/// Project list, selection and CRUD for one organization.
pub struct ProjectManager {
    api: Arc<dyn WhisperlyApi>,
    store: ProjectStore,
    entity_slug: String,
    enabled: bool,
    create: MutationState,
    update: MutationState,
    delete: MutationState,
}

impl ProjectManager {
    pub fn new(api: Arc<dyn WhisperlyApi>, store: ProjectStore, entity_slug: impl Into<String>) -> Self {
        Self {
            api,
            store,
            entity_slug: entity_slug.into(),
            enabled: true,
            create: MutationState::new(),
            update: MutationState::new(),
            delete: MutationState::new(),
        }
    }

    /// Build from raw configuration, reusing the cached client when possible.
    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
        store: ProjectStore,
    ) -> SyncResult<Self> {
        let api = config.client(cache, token)?;
        Ok(Self::new(api, store, config.entity_slug.clone()).with_enabled(config.enabled))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Issue the list query unless the manager is disabled.
    pub async fn activate(&self) {
        if self.enabled {
            self.refetch().await;
        }
    }

    pub async fn refetch(&self) {
        sync_query(
            self.store.store(),
            "projects",
            self.api.list_projects(&self.entity_slug),
        )
        .await;
    }

    pub async fn create_project(&self, request: ProjectCreateRequest) -> SyncResult<Project> {
        let project = self
            .create
            .run("create_project", self.api.create_project(&self.entity_slug, request))
            .await?;
        self.store.add_project(project.clone());
        Ok(project)
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        request: ProjectUpdateRequest,
    ) -> SyncResult<Project> {
        let project = self
            .update
            .run(
                "update_project",
                self.api.update_project(&self.entity_slug, project_id, request),
            )
            .await?;
        self.store.update_project(project.clone());
        Ok(project)
    }

    pub async fn delete_project(&self, project_id: &str) -> SyncResult<()> {
        self.delete
            .run(
                "delete_project",
                self.api.delete_project(&self.entity_slug, project_id),
            )
            .await?;
        self.store.remove_project(project_id);
        Ok(())
    }

    pub fn select_project(&self, project_id: Option<String>) {
        self.store.select_project(project_id);
    }

    pub fn projects(&self) -> Vec<Project> {
        self.store.read(|s| project::select_projects(s).to_vec())
    }

    pub fn selected_project_id(&self) -> Option<String> {
        self.store
            .read(|s| project::select_selected_project_id(s).map(str::to_string))
    }

    pub fn selected_project(&self) -> Option<Project> {
        self.store
            .read(|s| project::select_selected_project(s).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.store.read(project::select_is_loading)
            || self.create.is_pending()
            || self.update.is_pending()
            || self.delete.is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.store.read(|s| project::select_error(s).map(str::to_string))
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

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }
}

/// Single-project query.
///
/// Keeps its own loading and error state; a fetched project is merged into
/// the shared project list by id.
pub struct ProjectDetail {
    api: Arc<dyn WhisperlyApi>,
    store: ProjectStore,
    entity_slug: String,
    project_id: String,
    query: Store<QueryResult<Project>>,
}

impl ProjectDetail {
    pub fn new(
        api: Arc<dyn WhisperlyApi>,
        store: ProjectStore,
        entity_slug: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            entity_slug: entity_slug.into(),
            project_id: project_id.into(),
            query: Store::default(),
        }
    }

    pub async fn refetch(&self) {
        sync_query(
            &self.query,
            "project",
            self.api.get_project(&self.entity_slug, &self.project_id),
        )
        .await;

        let fetched = self
            .query
            .read(|q| if q.error.is_none() { q.data.clone() } else { None });
        if let Some(project) = fetched {
            self.store.update_project(project);
        }
    }

    pub fn project(&self) -> Option<Project> {
        self.query.read(|q| q.data.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.query.read(|q| q.is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.query.read(|q| q.error.clone())
    }
}

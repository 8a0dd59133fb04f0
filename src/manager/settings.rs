use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::ManagerConfig;
use crate::error::SyncResult;
use crate::model::{UserSettings, UserSettingsUpdateRequest};
use crate::query::{sync_query, MutationState};
use crate::store::settings::{self, SettingsStore};
use std::sync::Arc;

/// The signed-in user's settings.
pub struct SettingsManager {
    api: Arc<dyn WhisperlyApi>,
    store: SettingsStore,
    enabled: bool,
    update: MutationState,
}

impl SettingsManager {
    pub fn new(api: Arc<dyn WhisperlyApi>, store: SettingsStore) -> Self {
        Self {
            api,
            store,
            enabled: true,
            update: MutationState::new(),
        }
    }

    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
        store: SettingsStore,
    ) -> SyncResult<Self> {
        let api = config.client(cache, token)?;
        Ok(Self::new(api, store).with_enabled(config.enabled))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub async fn activate(&self) {
        if self.enabled {
            self.refetch().await;
        }
    }

    pub async fn refetch(&self) {
        sync_query(self.store.store(), "settings", self.api.get_settings()).await;
    }

    pub async fn update_settings(&self, request: UserSettingsUpdateRequest) -> SyncResult<UserSettings> {
        let updated = self
            .update
            .run("update_settings", self.api.update_settings(request))
            .await?;
        self.store.set_settings(Some(updated.clone()));
        Ok(updated)
    }

    pub fn settings(&self) -> Option<UserSettings> {
        self.store.read(|s| settings::select_settings(s).cloned())
    }

    pub fn organization_name(&self) -> Option<String> {
        self.store
            .read(|s| settings::select_organization_name(s).map(str::to_string))
    }

    pub fn organization_path(&self) -> Option<String> {
        self.store
            .read(|s| settings::select_organization_path(s).map(str::to_string))
    }

    pub fn is_loading(&self) -> bool {
        self.store.read(settings::select_is_loading) || self.update.is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.store
            .read(|s| settings::select_error(s).map(str::to_string))
    }

    pub fn is_updating(&self) -> bool {
        self.update.is_pending()
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }
}

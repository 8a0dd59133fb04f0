use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::ManagerConfig;
use crate::error::{SyncError, SyncResult};
use crate::model::{TranslationRequest, TranslationResponse};
use crate::query::MutationState;
use parking_lot::Mutex;
use std::sync::Arc;

/// Machine translation of ad-hoc strings. Nothing is cached in a store; the
/// most recent response is kept for display.
pub struct TranslationManager {
    api: Arc<dyn WhisperlyApi>,
    entity_slug: String,
    translate: MutationState,
    last_response: Mutex<Option<TranslationResponse>>,
}

impl TranslationManager {
    pub fn new(api: Arc<dyn WhisperlyApi>, entity_slug: impl Into<String>) -> Self {
        Self {
            api,
            entity_slug: entity_slug.into(),
            translate: MutationState::new(),
            last_response: Mutex::new(None),
        }
    }

    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
    ) -> SyncResult<Self> {
        let api = config.client(cache, token)?;
        Ok(Self::new(api, config.entity_slug.clone()))
    }

    pub async fn translate(
        &self,
        project_id: &str,
        request: TranslationRequest,
    ) -> SyncResult<TranslationResponse> {
        if project_id.is_empty() {
            return Err(SyncError::MissingScope("project_id"));
        }
        let response = self
            .translate
            .run(
                "translate",
                self.api.translate(&self.entity_slug, project_id, request),
            )
            .await?;
        *self.last_response.lock() = Some(response.clone());
        Ok(response)
    }

    pub fn last_response(&self) -> Option<TranslationResponse> {
        self.last_response.lock().clone()
    }

    pub fn clear_last_response(&self) {
        self.last_response.lock().take();
    }

    pub fn is_translating(&self) -> bool {
        self.translate.is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.translate.error()
    }
}

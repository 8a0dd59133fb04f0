//! The remote API seam.
//!
//! Managers only ever see [`WhisperlyApi`]; transport, retries and the wire
//! format belong to whoever implements it. [`ClientCache`] builds those
//! implementations through a [`ClientFactory`] at most once per
//! configuration tuple.

use crate::error::ApiResult;
use crate::model::{
    AnalyticsQuery, AnalyticsResponse, AvailableLanguage, Dictionary, DictionaryCreateRequest,
    DictionaryUpdateRequest, ExportFormat, Glossary, GlossaryCreateRequest, GlossaryUpdateRequest,
    Project, ProjectCreateRequest, ProjectLanguagesResponse, ProjectUpdateRequest, Subscription,
    TranslationRequest, TranslationResponse, UserSettings, UserSettingsUpdateRequest,
};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Remote operations of the Whisperly API.
///
/// `entity_slug` names the organization (tenant) the call is scoped to.
#[async_trait]
pub trait WhisperlyApi: Send + Sync {
    async fn list_projects(&self, entity_slug: &str) -> ApiResult<Vec<Project>>;

    async fn get_project(&self, entity_slug: &str, project_id: &str) -> ApiResult<Project>;

    async fn create_project(
        &self,
        entity_slug: &str,
        request: ProjectCreateRequest,
    ) -> ApiResult<Project>;

    async fn update_project(
        &self,
        entity_slug: &str,
        project_id: &str,
        request: ProjectUpdateRequest,
    ) -> ApiResult<Project>;

    async fn delete_project(&self, entity_slug: &str, project_id: &str) -> ApiResult<()>;

    async fn list_dictionaries(
        &self,
        entity_slug: &str,
        project_id: &str,
    ) -> ApiResult<Vec<Dictionary>>;

    async fn create_dictionary(
        &self,
        entity_slug: &str,
        project_id: &str,
        request: DictionaryCreateRequest,
    ) -> ApiResult<Dictionary>;

    async fn update_dictionary(
        &self,
        entity_slug: &str,
        project_id: &str,
        dictionary_id: &str,
        request: DictionaryUpdateRequest,
    ) -> ApiResult<Dictionary>;

    async fn delete_dictionary(
        &self,
        entity_slug: &str,
        project_id: &str,
        dictionary_id: &str,
    ) -> ApiResult<()>;

    async fn list_glossaries(&self, entity_slug: &str, project_id: &str)
        -> ApiResult<Vec<Glossary>>;

    async fn create_glossary(
        &self,
        entity_slug: &str,
        project_id: &str,
        request: GlossaryCreateRequest,
    ) -> ApiResult<Glossary>;

    async fn update_glossary(
        &self,
        entity_slug: &str,
        project_id: &str,
        glossary_id: &str,
        request: GlossaryUpdateRequest,
    ) -> ApiResult<Glossary>;

    async fn delete_glossary(
        &self,
        entity_slug: &str,
        project_id: &str,
        glossary_id: &str,
    ) -> ApiResult<()>;

    async fn import_glossaries(
        &self,
        entity_slug: &str,
        project_id: &str,
        glossaries: Vec<GlossaryCreateRequest>,
    ) -> ApiResult<Vec<Glossary>>;

    async fn export_glossaries(
        &self,
        entity_slug: &str,
        project_id: &str,
        format: ExportFormat,
    ) -> ApiResult<String>;

    async fn get_settings(&self) -> ApiResult<UserSettings>;

    async fn update_settings(&self, request: UserSettingsUpdateRequest) -> ApiResult<UserSettings>;

    async fn get_subscription(&self) -> ApiResult<Subscription>;

    /// Ask the server to re-read entitlements from RevenueCat.
    async fn sync_subscription(&self) -> ApiResult<Subscription>;

    async fn get_analytics(&self, query: &AnalyticsQuery) -> ApiResult<AnalyticsResponse>;

    async fn translate(
        &self,
        entity_slug: &str,
        project_id: &str,
        request: TranslationRequest,
    ) -> ApiResult<TranslationResponse>;

    async fn get_project_languages(
        &self,
        entity_slug: &str,
        project_id: &str,
    ) -> ApiResult<ProjectLanguagesResponse>;

    async fn update_project_languages(
        &self,
        entity_slug: &str,
        project_id: &str,
        languages: &str,
    ) -> ApiResult<ProjectLanguagesResponse>;

    async fn get_available_languages(&self) -> ApiResult<Vec<AvailableLanguage>>;
}

type TokenFn = dyn Fn() -> BoxFuture<'static, Option<String>> + Send + Sync;

/// Async accessor for the current bearer token.
///
/// `None` means "unauthenticated", not failure. Clones share identity, which
/// is what [`ClientCache`] keys on.
#[derive(Clone)]
pub struct TokenAccessor(Arc<TokenFn>);

impl TokenAccessor {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        Self(Arc::new(move || f().boxed()))
    }

    /// An accessor that never yields a token.
    pub fn anonymous() -> Self {
        Self::new(|| async { None })
    }

    /// An accessor that always yields the same token.
    pub fn fixed(token: impl Into<String>) -> Self {
        let token: String = token.into();
        Self::new(move || {
            let token = token.clone();
            async move { Some(token) }
        })
    }

    pub async fn token(&self) -> Option<String> {
        (self.0)().await
    }

    /// Address of the shared closure; equal for clones of one accessor.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn same_as(&self, other: &TokenAccessor) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TokenAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenAccessor")
            .field(&format_args!("{:#x}", self.identity()))
            .finish()
    }
}

/// Builds API handles from raw configuration.
pub trait ClientFactory: Send + Sync {
    fn build(&self, base_url: &str, token: TokenAccessor) -> Arc<dyn WhisperlyApi>;
}

impl<F> ClientFactory for F
where
    F: Fn(&str, TokenAccessor) -> Arc<dyn WhisperlyApi> + Send + Sync,
{
    fn build(&self, base_url: &str, token: TokenAccessor) -> Arc<dyn WhisperlyApi> {
        self(base_url, token)
    }
}

/// Identity of one client configuration.
///
/// Holds the token accessor itself, so the closure it identifies stays alive
/// as long as the key does and its address cannot be handed to another one.
#[derive(Debug, Clone)]
pub struct ClientKey {
    pub base_url: String,
    pub token: TokenAccessor,
    pub scope: String,
}

impl ClientKey {
    pub fn new(base_url: &str, token: &TokenAccessor, scope: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            token: token.clone(),
            scope: scope.to_string(),
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
            && self.token.same_as(&other.token)
            && self.scope == other.scope
    }
}

impl Eq for ClientKey {}

/// Memoized API handle.
///
/// Holds the handle for the most recent configuration tuple. Asking for the
/// same tuple again returns the cached handle; a different tuple invalidates
/// it and builds a new one.
pub struct ClientCache {
    factory: Box<dyn ClientFactory>,
    current: Mutex<Option<(ClientKey, Arc<dyn WhisperlyApi>)>>,
}

impl ClientCache {
    pub fn new(factory: impl ClientFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            current: Mutex::new(None),
        }
    }

    pub fn client_for(
        &self,
        base_url: &str,
        token: &TokenAccessor,
        scope: &str,
    ) -> Arc<dyn WhisperlyApi> {
        let key = ClientKey::new(base_url, token, scope);
        let mut current = self.current.lock();
        if let Some((cached_key, client)) = current.as_ref() {
            if *cached_key == key {
                return Arc::clone(client);
            }
        }

        debug!(base_url, scope, "building API client");
        let client = self.factory.build(base_url, token.clone());
        *current = Some((key, Arc::clone(&client)));
        client
    }

    /// The key of the cached handle, if any.
    pub fn current_key(&self) -> Option<ClientKey> {
        self.current.lock().as_ref().map(|(key, _)| key.clone())
    }

    /// Drop the cached handle so the next request rebuilds it.
    pub fn invalidate(&self) {
        self.current.lock().take();
    }
}

impl fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCache")
            .field("current", &self.current_key())
            .finish_non_exhaustive()
    }
}

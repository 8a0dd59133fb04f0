//! Shared fixtures: an in-memory API and a scriptable identity provider.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use whisperly_sync::auth::{IdentityProvider, Session, SessionListener, Unsubscribe};
use whisperly_sync::model::{
    AnalyticsQuery, AnalyticsResponse, AvailableLanguage, Dictionary, DictionaryCreateRequest,
    DictionaryUpdateRequest, ExportFormat, Glossary, GlossaryCreateRequest, GlossaryUpdateRequest,
    Project, ProjectCreateRequest, ProjectLanguagesResponse, ProjectUpdateRequest, Subscription,
    SubscriptionTier, TranslationRequest, TranslationResponse, UsageAggregate, UsageByDate,
    UserSettings, UserSettingsUpdateRequest,
};
use whisperly_sync::{ApiError, ApiResult, AuthError, ClientCache, TokenAccessor, WhisperlyApi};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn project(id: &str, name: &str) -> Project {
    let now = Utc::now();
    Project {
        id: id.to_string(),
        entity_id: "entity-1".to_string(),
        project_name: name.to_string(),
        display_name: name.to_string(),
        description: None,
        instructions: None,
        default_source_language: Some("en".to_string()),
        default_target_languages: None,
        ip_allowlist: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn project_request(name: &str) -> ProjectCreateRequest {
    ProjectCreateRequest {
        project_name: name.to_string(),
        display_name: name.to_string(),
        ..Default::default()
    }
}

pub fn glossary_request(term: &str) -> GlossaryCreateRequest {
    GlossaryCreateRequest {
        term: term.to_string(),
        translations: [("fr".to_string(), format!("{term}-fr"))].into_iter().collect(),
        context: None,
    }
}

pub fn dictionary_request(en: &str, fr: &str) -> DictionaryCreateRequest {
    DictionaryCreateRequest {
        translations: [
            ("en".to_string(), en.to_string()),
            ("fr".to_string(), fr.to_string()),
        ]
        .into_iter()
        .collect(),
    }
}

pub fn subscription(used_month: u64, used_hour: u64) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: "sub-1".to_string(),
        user_id: "user-1".to_string(),
        tier: SubscriptionTier::Starter,
        revenuecat_entitlement: None,
        monthly_request_limit: 1000,
        hourly_request_limit: 100,
        requests_this_month: used_month,
        requests_this_hour: used_hour,
        month_reset_at: now,
        hour_reset_at: now,
        created_at: now,
        updated_at: now,
    }
}

pub fn settings(organization_name: Option<&str>) -> UserSettings {
    let now = Utc::now();
    UserSettings {
        id: "settings-1".to_string(),
        firebase_uid: "user-1".to_string(),
        organization_name: organization_name.map(str::to_string),
        organization_path: organization_name.map(|n| n.to_lowercase()),
        is_default: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn analytics_response(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AnalyticsResponse {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    AnalyticsResponse {
        aggregate: UsageAggregate {
            total_requests: 10,
            total_strings: 40,
            total_characters: 400,
            successful_requests: 9,
            failed_requests: 1,
            success_rate: 0.9,
            period_start: start.unwrap_or(day),
            period_end: end.unwrap_or(day),
        },
        by_project: Vec::new(),
        by_date: vec![UsageByDate {
            date: day,
            request_count: 10,
            string_count: 40,
            character_count: 400,
        }],
    }
}

pub fn glossary(id: &str, project_id: &str, term: &str) -> Glossary {
    let now = Utc::now();
    Glossary {
        id: id.to_string(),
        project_id: project_id.to_string(),
        term: term.to_string(),
        translations: Default::default(),
        context: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
struct Data {
    projects: Vec<Project>,
    dictionaries: HashMap<String, Vec<Dictionary>>,
    glossaries: HashMap<String, Vec<Glossary>>,
    settings: Option<UserSettings>,
    subscription: Option<Subscription>,
    languages: HashMap<String, String>,
}

/// In-memory stand-in for the remote API.
///
/// Ids are assigned by the "server". Any operation can be made to fail by
/// name, and [`FakeApi::hold`] parks every call until the returned gate
/// gets a permit.
#[derive(Default)]
pub struct FakeApi {
    data: Mutex<Data>,
    next_id: AtomicUsize,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    analytics_queries: Mutex<Vec<AnalyticsQuery>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_projects(projects: Vec<Project>) -> Arc<Self> {
        let api = Self::default();
        api.data.lock().unwrap().projects = projects;
        Arc::new(api)
    }

    pub fn seed_settings(&self, settings: UserSettings) {
        self.data.lock().unwrap().settings = Some(settings);
    }

    pub fn seed_subscription(&self, subscription: Subscription) {
        self.data.lock().unwrap().subscription = Some(subscription);
    }

    pub fn seed_languages(&self, project_id: &str, languages: &str) {
        self.data
            .lock()
            .unwrap()
            .languages
            .insert(project_id.to_string(), languages.to_string());
    }

    /// Make every later call of `op` fail with `message`.
    pub fn fail(&self, op: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, ApiError::with_status(500, message));
    }

    pub fn recover(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    /// Park all calls until a permit is added to the returned semaphore.
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn analytics_queries(&self) -> Vec<AnalyticsQuery> {
        self.analytics_queries.lock().unwrap().clone()
    }

    pub fn server_projects(&self) -> Vec<Project> {
        self.data.lock().unwrap().projects.clone()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn enter(&self, op: &'static str) -> ApiResult<()> {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }
        match self.failures.lock().unwrap().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::with_status(404, format!("{what} not found"))
    }
}

#[async_trait]
impl WhisperlyApi for FakeApi {
    async fn list_projects(&self, _entity_slug: &str) -> ApiResult<Vec<Project>> {
        self.enter("list_projects").await?;
        Ok(self.data.lock().unwrap().projects.clone())
    }

    async fn get_project(&self, _entity_slug: &str, project_id: &str) -> ApiResult<Project> {
        self.enter("get_project").await?;
        let data = self.data.lock().unwrap();
        data.projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .ok_or_else(|| Self::not_found("project"))
    }

    async fn create_project(
        &self,
        _entity_slug: &str,
        request: ProjectCreateRequest,
    ) -> ApiResult<Project> {
        self.enter("create_project").await?;
        let mut created = project(&self.next_id("proj"), &request.project_name);
        created.display_name = request.display_name;
        created.description = request.description;
        self.data.lock().unwrap().projects.push(created.clone());
        Ok(created)
    }

    async fn update_project(
        &self,
        _entity_slug: &str,
        project_id: &str,
        request: ProjectUpdateRequest,
    ) -> ApiResult<Project> {
        self.enter("update_project").await?;
        let mut data = self.data.lock().unwrap();
        let existing = data
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| Self::not_found("project"))?;
        if let Some(name) = request.project_name {
            existing.project_name = name;
        }
        if let Some(display_name) = request.display_name {
            existing.display_name = display_name;
        }
        if let Some(description) = request.description {
            existing.description = Some(description);
        }
        if let Some(is_active) = request.is_active {
            existing.is_active = is_active;
        }
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_project(&self, _entity_slug: &str, project_id: &str) -> ApiResult<()> {
        self.enter("delete_project").await?;
        let mut data = self.data.lock().unwrap();
        let before = data.projects.len();
        data.projects.retain(|p| p.id != project_id);
        if data.projects.len() == before {
            return Err(Self::not_found("project"));
        }
        Ok(())
    }

    async fn list_dictionaries(
        &self,
        _entity_slug: &str,
        project_id: &str,
    ) -> ApiResult<Vec<Dictionary>> {
        self.enter("list_dictionaries").await?;
        let data = self.data.lock().unwrap();
        Ok(data.dictionaries.get(project_id).cloned().unwrap_or_default())
    }

    async fn create_dictionary(
        &self,
        _entity_slug: &str,
        project_id: &str,
        request: DictionaryCreateRequest,
    ) -> ApiResult<Dictionary> {
        self.enter("create_dictionary").await?;
        let created = Dictionary {
            dictionary_id: self.next_id("dict"),
            translations: request.translations,
        };
        self.data
            .lock()
            .unwrap()
            .dictionaries
            .entry(project_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_dictionary(
        &self,
        _entity_slug: &str,
        project_id: &str,
        dictionary_id: &str,
        request: DictionaryUpdateRequest,
    ) -> ApiResult<Dictionary> {
        self.enter("update_dictionary").await?;
        let mut data = self.data.lock().unwrap();
        let existing = data
            .dictionaries
            .get_mut(project_id)
            .and_then(|list| list.iter_mut().find(|d| d.dictionary_id == dictionary_id))
            .ok_or_else(|| Self::not_found("dictionary"))?;
        existing.translations = request.translations;
        Ok(existing.clone())
    }

    async fn delete_dictionary(
        &self,
        _entity_slug: &str,
        project_id: &str,
        dictionary_id: &str,
    ) -> ApiResult<()> {
        self.enter("delete_dictionary").await?;
        let mut data = self.data.lock().unwrap();
        if let Some(list) = data.dictionaries.get_mut(project_id) {
            list.retain(|d| d.dictionary_id != dictionary_id);
        }
        Ok(())
    }

    async fn list_glossaries(&self, _entity_slug: &str, project_id: &str) -> ApiResult<Vec<Glossary>> {
        self.enter("list_glossaries").await?;
        let data = self.data.lock().unwrap();
        Ok(data.glossaries.get(project_id).cloned().unwrap_or_default())
    }

    async fn create_glossary(
        &self,
        _entity_slug: &str,
        project_id: &str,
        request: GlossaryCreateRequest,
    ) -> ApiResult<Glossary> {
        self.enter("create_glossary").await?;
        let created = self.make_glossary(project_id, request);
        Ok(created)
    }

    async fn update_glossary(
        &self,
        _entity_slug: &str,
        project_id: &str,
        glossary_id: &str,
        request: GlossaryUpdateRequest,
    ) -> ApiResult<Glossary> {
        self.enter("update_glossary").await?;
        let mut data = self.data.lock().unwrap();
        let existing = data
            .glossaries
            .get_mut(project_id)
            .and_then(|list| list.iter_mut().find(|g| g.id == glossary_id))
            .ok_or_else(|| Self::not_found("glossary"))?;
        if let Some(term) = request.term {
            existing.term = term;
        }
        if let Some(translations) = request.translations {
            existing.translations = translations;
        }
        if let Some(context) = request.context {
            existing.context = Some(context);
        }
        Ok(existing.clone())
    }

    async fn delete_glossary(
        &self,
        _entity_slug: &str,
        project_id: &str,
        glossary_id: &str,
    ) -> ApiResult<()> {
        self.enter("delete_glossary").await?;
        let mut data = self.data.lock().unwrap();
        if let Some(list) = data.glossaries.get_mut(project_id) {
            list.retain(|g| g.id != glossary_id);
        }
        Ok(())
    }

    async fn import_glossaries(
        &self,
        _entity_slug: &str,
        project_id: &str,
        glossaries: Vec<GlossaryCreateRequest>,
    ) -> ApiResult<Vec<Glossary>> {
        self.enter("import_glossaries").await?;
        Ok(glossaries
            .into_iter()
            .map(|request| self.make_glossary(project_id, request))
            .collect())
    }

    async fn export_glossaries(
        &self,
        _entity_slug: &str,
        project_id: &str,
        format: ExportFormat,
    ) -> ApiResult<String> {
        self.enter("export_glossaries").await?;
        let data = self.data.lock().unwrap();
        let terms: Vec<String> = data
            .glossaries
            .get(project_id)
            .map(|list| list.iter().map(|g| g.term.clone()).collect())
            .unwrap_or_default();
        Ok(match format {
            ExportFormat::Csv => terms.join("\n"),
            ExportFormat::Json => serde_json::to_string(&terms).expect("serialize terms"),
        })
    }

    async fn get_settings(&self) -> ApiResult<UserSettings> {
        self.enter("get_settings").await?;
        let data = self.data.lock().unwrap();
        data.settings.clone().ok_or_else(|| Self::not_found("settings"))
    }

    async fn update_settings(&self, request: UserSettingsUpdateRequest) -> ApiResult<UserSettings> {
        self.enter("update_settings").await?;
        let mut data = self.data.lock().unwrap();
        let current = data.settings.get_or_insert_with(|| settings(None));
        if let Some(name) = request.organization_name {
            current.organization_name = Some(name);
        }
        if let Some(path) = request.organization_path {
            current.organization_path = Some(path);
        }
        current.is_default = false;
        Ok(current.clone())
    }

    async fn get_subscription(&self) -> ApiResult<Subscription> {
        self.enter("get_subscription").await?;
        let data = self.data.lock().unwrap();
        data.subscription
            .clone()
            .ok_or_else(|| Self::not_found("subscription"))
    }

    async fn sync_subscription(&self) -> ApiResult<Subscription> {
        self.enter("sync_subscription").await?;
        let mut data = self.data.lock().unwrap();
        let current = data.subscription.get_or_insert_with(|| subscription(0, 0));
        current.tier = SubscriptionTier::Pro;
        current.monthly_request_limit = 10_000;
        Ok(current.clone())
    }

    async fn get_analytics(&self, query: &AnalyticsQuery) -> ApiResult<AnalyticsResponse> {
        self.enter("get_analytics").await?;
        self.analytics_queries.lock().unwrap().push(query.clone());
        Ok(analytics_response(query.start_date, query.end_date))
    }

    async fn translate(
        &self,
        _entity_slug: &str,
        _project_id: &str,
        request: TranslationRequest,
    ) -> ApiResult<TranslationResponse> {
        self.enter("translate").await?;
        let translations = request
            .target_languages
            .iter()
            .map(|lang| {
                let out: Vec<String> =
                    request.strings.iter().map(|s| format!("{s} [{lang}]")).collect();
                (lang.clone(), out)
            })
            .collect();
        Ok(TranslationResponse {
            translations,
            source_language: request.source_language.or_else(|| Some("en".to_string())),
        })
    }

    async fn get_project_languages(
        &self,
        _entity_slug: &str,
        project_id: &str,
    ) -> ApiResult<ProjectLanguagesResponse> {
        self.enter("get_project_languages").await?;
        let data = self.data.lock().unwrap();
        Ok(ProjectLanguagesResponse {
            project_id: project_id.to_string(),
            languages: data.languages.get(project_id).cloned().unwrap_or_default(),
        })
    }

    async fn update_project_languages(
        &self,
        _entity_slug: &str,
        project_id: &str,
        languages: &str,
    ) -> ApiResult<ProjectLanguagesResponse> {
        self.enter("update_project_languages").await?;
        self.seed_languages(project_id, languages);
        Ok(ProjectLanguagesResponse {
            project_id: project_id.to_string(),
            languages: languages.to_string(),
        })
    }

    async fn get_available_languages(&self) -> ApiResult<Vec<AvailableLanguage>> {
        self.enter("get_available_languages").await?;
        Ok(vec![
            AvailableLanguage {
                code: "en".to_string(),
                name: "English".to_string(),
                flag: "🇬🇧".to_string(),
            },
            AvailableLanguage {
                code: "fr".to_string(),
                name: "French".to_string(),
                flag: "🇫🇷".to_string(),
            },
        ])
    }
}

impl FakeApi {
    fn make_glossary(&self, project_id: &str, request: GlossaryCreateRequest) -> Glossary {
        let now = Utc::now();
        let created = Glossary {
            id: self.next_id("gloss"),
            project_id: project_id.to_string(),
            term: request.term,
            translations: request.translations,
            context: request.context,
            created_at: now,
            updated_at: now,
        };
        self.data
            .lock()
            .unwrap()
            .glossaries
            .entry(project_id.to_string())
            .or_default()
            .push(created.clone());
        created
    }
}

pub fn dyn_api(api: &Arc<FakeApi>) -> Arc<dyn WhisperlyApi> {
    Arc::clone(api) as Arc<dyn WhisperlyApi>
}

/// A cache whose factory always hands out `api`, counting each build.
pub fn cache_for(api: Arc<FakeApi>) -> (ClientCache, Arc<AtomicUsize>) {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let cache = ClientCache::new(
        move |_base_url: &str, _token: TokenAccessor| -> Arc<dyn WhisperlyApi> {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::clone(&api) as Arc<dyn WhisperlyApi>
        },
    );
    (cache, builds)
}

pub struct FakeSession {
    pub user_id: String,
    pub token: Result<String, AuthError>,
}

impl FakeSession {
    pub fn signed_in(user_id: &str) -> Arc<dyn Session> {
        Arc::new(Self {
            user_id: user_id.to_string(),
            token: Ok(format!("token-{user_id}")),
        })
    }

    pub fn expired(user_id: &str) -> Arc<dyn Session> {
        Arc::new(Self {
            user_id: user_id.to_string(),
            token: Err(AuthError::Expired),
        })
    }
}

#[async_trait]
impl Session for FakeSession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn id_token(&self) -> Result<String, AuthError> {
        self.token.clone()
    }
}

/// Identity provider driven by the test.
#[derive(Default)]
pub struct FakeProvider {
    listeners: Arc<Mutex<Vec<(usize, SessionListener)>>>,
    next_id: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, session: Option<Arc<dyn Session>>) {
        for (_, listener) in self.listeners.lock().unwrap().iter() {
            listener(session.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl IdentityProvider for FakeProvider {
    fn on_session_changed(&self, listener: SessionListener) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().push((id, listener));
        let listeners = Arc::clone(&self.listeners);
        Box::new(move || {
            listeners.lock().unwrap().retain(|(entry, _)| *entry != id);
        })
    }
}

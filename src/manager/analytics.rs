use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::{AnalyticsOptions, ManagerConfig};
use crate::error::SyncResult;
use crate::model::{AnalyticsResponse, UsageAggregate, UsageByDate, UsageByProject};
use crate::query::sync_query;
use crate::store::analytics::{self, AnalyticsStore, DateRange};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::Arc;

/// Usage analytics for a date range, optionally narrowed to one project.
///
/// The options are mirrored into the store on construction and on every
/// change, and each change re-runs the query.
pub struct AnalyticsManager {
    api: Arc<dyn WhisperlyApi>,
    store: AnalyticsStore,
    options: RwLock<AnalyticsOptions>,
}

impl AnalyticsManager {
    pub fn new(api: Arc<dyn WhisperlyApi>, store: AnalyticsStore, options: AnalyticsOptions) -> Self {
        store.set_date_range(options.start_date, options.end_date);
        store.set_filter_project_id(options.project_id.clone());
        Self {
            api,
            store,
            options: RwLock::new(options),
        }
    }

    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
        store: AnalyticsStore,
        mut options: AnalyticsOptions,
    ) -> SyncResult<Self> {
        let api = config.client(cache, token)?;
        options.enabled &= config.enabled;
        Ok(Self::new(api, store, options))
    }

    pub fn options(&self) -> AnalyticsOptions {
        self.options.read().clone()
    }

    pub async fn activate(&self) {
        if self.options.read().enabled {
            self.refetch().await;
        }
    }

    pub async fn refetch(&self) {
        let query = self.options.read().query();
        sync_query(self.store.store(), "analytics", self.api.get_analytics(&query)).await;
    }

    /// Replace all options and re-sync.
    pub async fn set_options(&self, options: AnalyticsOptions) {
        self.store.set_date_range(options.start_date, options.end_date);
        self.store.set_filter_project_id(options.project_id.clone());
        *self.options.write() = options;
        self.activate().await;
    }

    pub async fn set_date_range(&self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) {
        let options = AnalyticsOptions {
            start_date,
            end_date,
            ..self.options()
        };
        self.set_options(options).await;
    }

    pub async fn set_filter_project_id(&self, project_id: Option<String>) {
        let options = AnalyticsOptions {
            project_id,
            ..self.options()
        };
        self.set_options(options).await;
    }

    pub fn analytics(&self) -> Option<AnalyticsResponse> {
        self.store.read(|s| analytics::select_analytics(s).cloned())
    }

    pub fn aggregate(&self) -> Option<UsageAggregate> {
        self.store.read(|s| analytics::select_aggregate(s).cloned())
    }

    pub fn by_project(&self) -> Vec<UsageByProject> {
        self.store.read(|s| analytics::select_by_project(s).to_vec())
    }

    pub fn by_date(&self) -> Vec<UsageByDate> {
        self.store.read(|s| analytics::select_by_date(s).to_vec())
    }

    pub fn date_range(&self) -> DateRange {
        self.store.read(analytics::select_date_range)
    }

    pub fn filter_project_id(&self) -> Option<String> {
        self.store
            .read(|s| analytics::select_filter_project_id(s).map(str::to_string))
    }

    pub fn is_loading(&self) -> bool {
        self.store.read(analytics::select_is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.store
            .read(|s| analytics::select_error(s).map(str::to_string))
    }

    pub fn store(&self) -> &AnalyticsStore {
        &self.store
    }
}

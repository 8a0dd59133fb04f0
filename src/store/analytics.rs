//! Cached usage analytics and the filters they were requested with.

use super::store::{Store, Subscription};
use crate::model::{AnalyticsResponse, UsageAggregate, UsageByDate, UsageByProject};
use crate::query::QueryTarget;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsState {
    pub analytics: Option<AnalyticsResponse>,
    pub date_range: DateRange,
    pub filter_project_id: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl QueryTarget<AnalyticsResponse> for AnalyticsState {
    fn apply_data(&mut self, data: AnalyticsResponse) {
        self.analytics = Some(data);
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Store holding the analytics payload and its filters.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsStore {
    inner: Store<AnalyticsState>,
}

impl AnalyticsStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AnalyticsState {
        self.inner.get()
    }

    /// Read the state in place without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&AnalyticsState) -> R) -> R {
        self.inner.read(f)
    }

    /// Call `callback` after every change until the returned guard drops.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AnalyticsState) + Send + Sync + 'static,
    {
        self.inner.subscribe(callback)
    }

    /// Replace the cached analytics payload.
    pub fn set_analytics(&self, analytics: Option<AnalyticsResponse>) {
        self.inner.update(|s| s.analytics = analytics);
    }

    /// Set both ends of the date filter.
    pub fn set_date_range(&self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) {
        self.inner.update(|s| {
            s.date_range = DateRange {
                start_date,
                end_date,
            }
        });
    }

    /// Restrict analytics to one project, or to none.
    pub fn set_filter_project_id(&self, project_id: Option<String>) {
        self.inner.update(|s| s.filter_project_id = project_id);
    }

    /// Set the query-in-flight flag.
    pub fn set_loading(&self, is_loading: bool) {
        self.inner.update(|s| s.is_loading = is_loading);
    }

    /// Set or clear the last query error.
    pub fn set_error(&self, error: Option<String>) {
        self.inner.update(|s| s.error = error);
    }

    /// Back to the initial state, as a single change.
    pub fn reset(&self) {
        self.inner.reset();
    }

    pub(crate) fn store(&self) -> &Store<AnalyticsState> {
        &self.inner
    }
}

pub fn select_analytics(state: &AnalyticsState) -> Option<&AnalyticsResponse> {
    state.analytics.as_ref()
}

pub fn select_aggregate(state: &AnalyticsState) -> Option<&UsageAggregate> {
    state.analytics.as_ref().map(|a| &a.aggregate)
}

pub fn select_by_project(state: &AnalyticsState) -> &[UsageByProject] {
    state
        .analytics
        .as_ref()
        .map(|a| a.by_project.as_slice())
        .unwrap_or(&[])
}

pub fn select_by_date(state: &AnalyticsState) -> &[UsageByDate] {
    state
        .analytics
        .as_ref()
        .map(|a| a.by_date.as_slice())
        .unwrap_or(&[])
}

pub fn select_date_range(state: &AnalyticsState) -> DateRange {
    state.date_range
}

pub fn select_filter_project_id(state: &AnalyticsState) -> Option<&str> {
    state.filter_project_id.as_deref()
}

pub fn select_is_loading(state: &AnalyticsState) -> bool {
    state.is_loading
}

pub fn select_error(state: &AnalyticsState) -> Option<&str> {
    state.error.as_deref()
}

//! Cached user settings.

use super::store::{Store, Subscription};
use crate::model::UserSettings;
use crate::query::QueryTarget;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsState {
    pub settings: Option<UserSettings>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl QueryTarget<UserSettings> for SettingsState {
    fn apply_data(&mut self, data: UserSettings) {
        self.settings = Some(data);
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Store holding the user's settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Store<SettingsState>,
}

impl SettingsStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SettingsState {
        self.inner.get()
    }

    /// Read the state in place without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&SettingsState) -> R) -> R {
        self.inner.read(f)
    }

    /// Call `callback` after every change until the returned guard drops.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SettingsState) + Send + Sync + 'static,
    {
        self.inner.subscribe(callback)
    }

    /// Replace the cached settings.
    pub fn set_settings(&self, settings: Option<UserSettings>) {
        self.inner.update(|s| s.settings = settings);
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

    pub(crate) fn store(&self) -> &Store<SettingsState> {
        &self.inner
    }
}

pub fn select_settings(state: &SettingsState) -> Option<&UserSettings> {
    state.settings.as_ref()
}

pub fn select_organization_name(state: &SettingsState) -> Option<&str> {
    state.settings.as_ref()?.organization_name.as_deref()
}

pub fn select_organization_path(state: &SettingsState) -> Option<&str> {
    state.settings.as_ref()?.organization_path.as_deref()
}

pub fn select_is_loading(state: &SettingsState) -> bool {
    state.is_loading
}

pub fn select_error(state: &SettingsState) -> Option<&str> {
    state.error.as_deref()
}

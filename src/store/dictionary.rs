//! Dictionary entries cached per project.

use super::collection::{find_by_id, KeyedCollection};
use super::store::{Store, Subscription};
use crate::model::Dictionary;
use crate::query::QueryTarget;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryState {
    /// Keyed by project id.
    pub dictionaries: KeyedCollection<Dictionary>,
    pub selected_dictionary_id: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// A query result for one project's dictionaries.
impl QueryTarget<(String, Vec<Dictionary>)> for DictionaryState {
    fn apply_data(&mut self, (project_id, dictionaries): (String, Vec<Dictionary>)) {
        self.dictionaries.set(&project_id, dictionaries);
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Store holding dictionaries keyed by project.
#[derive(Debug, Clone, Default)]
pub struct DictionaryStore {
    inner: Store<DictionaryState>,
}

impl DictionaryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DictionaryState {
        self.inner.get()
    }

    /// Read the state in place without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&DictionaryState) -> R) -> R {
        self.inner.read(f)
    }

    /// Call `callback` after every change until the returned guard drops.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&DictionaryState) + Send + Sync + 'static,
    {
        self.inner.subscribe(callback)
    }

    /// Replace the cached dictionaries of one project.
    pub fn set_dictionaries(&self, project_id: &str, dictionaries: Vec<Dictionary>) {
        self.inner
            .update(|s| s.dictionaries.set(project_id, dictionaries));
    }

    /// Append a dictionary to its project's list.
    pub fn add_dictionary(&self, project_id: &str, dictionary: Dictionary) {
        self.inner
            .update(|s| s.dictionaries.push(project_id, dictionary));
    }

    /// Replace the dictionary with the same id; unknown ids are ignored.
    pub fn update_dictionary(&self, project_id: &str, dictionary: Dictionary) {
        self.inner.update(|s| {
            s.dictionaries.replace(project_id, dictionary);
        });
    }

    /// Remove a dictionary, clearing the selection if it pointed at it.
    pub fn remove_dictionary(&self, project_id: &str, dictionary_id: &str) {
        self.inner.update(|s| {
            s.dictionaries.remove(project_id, dictionary_id);
            if s.selected_dictionary_id.as_deref() == Some(dictionary_id) {
                s.selected_dictionary_id = None;
            }
        });
    }

    /// Point the selection at an id, or clear it.
    pub fn select_dictionary(&self, dictionary_id: Option<String>) {
        self.inner.update(|s| s.selected_dictionary_id = dictionary_id);
    }

    /// Set the query-in-flight flag.
    pub fn set_loading(&self, is_loading: bool) {
        self.inner.update(|s| s.is_loading = is_loading);
    }

    /// Set or clear the last query error.
    pub fn set_error(&self, error: Option<String>) {
        self.inner.update(|s| s.error = error);
    }

    /// Forget everything cached for one project.
    pub fn clear_project(&self, project_id: &str) {
        self.inner.update(|s| s.dictionaries.clear_key(project_id));
    }

    /// Back to the initial state, as a single change.
    pub fn reset(&self) {
        self.inner.reset();
    }

    pub(crate) fn store(&self) -> &Store<DictionaryState> {
        &self.inner
    }
}

pub fn select_dictionaries_for_project<'a>(
    state: &'a DictionaryState,
    project_id: &str,
) -> &'a [Dictionary] {
    state.dictionaries.get(project_id)
}

pub fn select_selected_dictionary_id(state: &DictionaryState) -> Option<&str> {
    state.selected_dictionary_id.as_deref()
}

pub fn select_selected_dictionary<'a>(
    state: &'a DictionaryState,
    project_id: &str,
) -> Option<&'a Dictionary> {
    find_by_id(
        state.dictionaries.get(project_id),
        state.selected_dictionary_id.as_deref(),
    )
}

pub fn select_is_loading(state: &DictionaryState) -> bool {
    state.is_loading
}

pub fn select_error(state: &DictionaryState) -> Option<&str> {
    state.error.as_deref()
}

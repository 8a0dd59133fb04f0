//! Glossary terms cached per project.

use super::collection::{find_by_id, KeyedCollection};
use super::store::{Store, Subscription};
use crate::model::Glossary;
use crate::query::QueryTarget;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlossaryState {
    /// Keyed by project id.
    pub glossaries: KeyedCollection<Glossary>,
    pub selected_glossary_id: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl QueryTarget<(String, Vec<Glossary>)> for GlossaryState {
    fn apply_data(&mut self, (project_id, glossaries): (String, Vec<Glossary>)) {
        self.glossaries.set(&project_id, glossaries);
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Store holding glossaries keyed by project.
#[derive(Debug, Clone, Default)]
pub struct GlossaryStore {
    inner: Store<GlossaryState>,
}

impl GlossaryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> GlossaryState {
        self.inner.get()
    }

    /// Read the state in place without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&GlossaryState) -> R) -> R {
        self.inner.read(f)
    }

    /// Call `callback` after every change until the returned guard drops.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&GlossaryState) + Send + Sync + 'static,
    {
        self.inner.subscribe(callback)
    }

    /// Replace the cached glossaries of one project.
    pub fn set_glossaries(&self, project_id: &str, glossaries: Vec<Glossary>) {
        self.inner.update(|s| s.glossaries.set(project_id, glossaries));
    }

    /// Append a glossary to its project's list.
    pub fn add_glossary(&self, project_id: &str, glossary: Glossary) {
        self.inner.update(|s| s.glossaries.push(project_id, glossary));
    }

    /// Append several glossaries in one transition.
    pub fn add_glossaries(&self, project_id: &str, glossaries: Vec<Glossary>) {
        self.inner.update(|s| {
            for glossary in glossaries {
                s.glossaries.push(project_id, glossary);
            }
        });
    }

    /// Replace the glossary with the same id; unknown ids are ignored.
    pub fn update_glossary(&self, project_id: &str, glossary: Glossary) {
        self.inner.update(|s| {
            s.glossaries.replace(project_id, glossary);
        });
    }

    /// Remove a glossary, clearing the selection if it pointed at it.
    pub fn remove_glossary(&self, project_id: &str, glossary_id: &str) {
        self.inner.update(|s| {
            s.glossaries.remove(project_id, glossary_id);
            if s.selected_glossary_id.as_deref() == Some(glossary_id) {
                s.selected_glossary_id = None;
            }
        });
    }

    /// Point the selection at an id, or clear it.
    pub fn select_glossary(&self, glossary_id: Option<String>) {
        self.inner.update(|s| s.selected_glossary_id = glossary_id);
    }

    /// Set the query-in-flight flag.
    pub fn set_loading(&self, is_loading: bool) {
        self.inner.update(|s| s.is_loading = is_loading);
    }

    /// Set or clear the last query error.
    pub fn set_error(&self, error: Option<String>) {
        self.inner.update(|s| s.error = error);
    }

    /// Forget the glossaries cached for one project.
    pub fn clear_project(&self, project_id: &str) {
        self.inner.update(|s| s.glossaries.clear_key(project_id));
    }

    /// Back to the initial state, as a single change.
    pub fn reset(&self) {
        self.inner.reset();
    }

    pub(crate) fn store(&self) -> &Store<GlossaryState> {
        &self.inner
    }
}

pub fn select_glossaries_for_project<'a>(
    state: &'a GlossaryState,
    project_id: &str,
) -> &'a [Glossary] {
    state.glossaries.get(project_id)
}

pub fn select_selected_glossary_id(state: &GlossaryState) -> Option<&str> {
    state.selected_glossary_id.as_deref()
}

pub fn select_selected_glossary<'a>(
    state: &'a GlossaryState,
    project_id: &str,
) -> Option<&'a Glossary> {
    find_by_id(
        state.glossaries.get(project_id),
        state.selected_glossary_id.as_deref(),
    )
}

pub fn select_is_loading(state: &GlossaryState) -> bool {
    state.is_loading
}

pub fn select_error(state: &GlossaryState) -> Option<&str> {
    state.error.as_deref()
}

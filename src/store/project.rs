//! Cached project list with a selection cursor.

use super::collection::{find_by_id, remove_by_id, replace_by_id};
use super::store::{Store, Subscription};
use crate::model::Project;
use crate::query::QueryTarget;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    pub projects: Vec<Project>,
    pub selected_project_id: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl QueryTarget<Vec<Project>> for ProjectState {
    fn apply_data(&mut self, data: Vec<Project>) {
        self.projects = data;
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Store holding the project list.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    inner: Store<ProjectState>,
}

impl ProjectStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ProjectState {
        self.inner.get()
    }

    /// Read the state in place without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ProjectState) -> R) -> R {
        self.inner.read(f)
    }

    /// Call `callback` after every change until the returned guard drops.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ProjectState) + Send + Sync + 'static,
    {
        self.inner.subscribe(callback)
    }

    /// Replace the whole project list.
    pub fn set_projects(&self, projects: Vec<Project>) {
        self.inner.update(|s| s.projects = projects);
    }

    /// Append a project.
    pub fn add_project(&self, project: Project) {
        self.inner.update(|s| s.projects.push(project));
    }

    /// Replace the project with the same id; unknown ids are ignored.
    pub fn update_project(&self, project: Project) {
        self.inner.update(|s| {
            replace_by_id(&mut s.projects, project);
        });
    }

    /// Remove a project, clearing the selection if it pointed at it.
    pub fn remove_project(&self, project_id: &str) {
        self.inner.update(|s| {
            remove_by_id(&mut s.projects, project_id);
            if s.selected_project_id.as_deref() == Some(project_id) {
                s.selected_project_id = None;
            }
        });
    }

    /// Point the selection at an id, or clear it.
    pub fn select_project(&self, project_id: Option<String>) {
        self.inner.update(|s| s.selected_project_id = project_id);
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

    pub(crate) fn store(&self) -> &Store<ProjectState> {
        &self.inner
    }
}

pub fn select_projects(state: &ProjectState) -> &[Project] {
    &state.projects
}

pub fn select_selected_project_id(state: &ProjectState) -> Option<&str> {
    state.selected_project_id.as_deref()
}

/// The project the cursor points at, if it is still cached.
pub fn select_selected_project(state: &ProjectState) -> Option<&Project> {
    find_by_id(&state.projects, state.selected_project_id.as_deref())
}

pub fn select_is_loading(state: &ProjectState) -> bool {
    state.is_loading
}

pub fn select_error(state: &ProjectState) -> Option<&str> {
    state.error.as_deref()
}

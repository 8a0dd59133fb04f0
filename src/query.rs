//! Query outcomes and their reconciliation into cached state.
//!
//! A manager reports each change in its query status as a [`QueryStatus`]
//! event. [`reconcile`] turns `(previous state, event)` into the next state
//! without side effects; [`Store::apply`] dispatches that transition so
//! subscribers see it as a single update.

use crate::error::{ApiResult, SyncError, SyncResult};
use crate::store::Store;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// One observed status of a remote read.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus<D> {
    /// The query is disabled and not running.
    Idle,
    /// A request is outstanding.
    Loading,
    /// The request resolved with data.
    Success(D),
    /// The request failed with this message.
    Failed(String),
}

impl<D> QueryStatus<D> {
    pub fn from_result(result: ApiResult<D>) -> Self {
        match result {
            Ok(data) => QueryStatus::Success(data),
            Err(err) => QueryStatus::Failed(err.message().to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryStatus::Loading)
    }
}

/// State that can absorb the outcome of a query.
pub trait QueryTarget<D> {
    /// Replace the cached data with a query result.
    fn apply_data(&mut self, data: D);
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);
}

/// Compute the state that follows `prev` after `event`.
///
/// A successful outcome replaces the data and clears a stale error; a failed
/// one overwrites the error and keeps the data that was already cached.
pub fn reconcile<S, D>(prev: &S, event: QueryStatus<D>) -> S
where
    S: QueryTarget<D> + Clone,
{
    let mut next = prev.clone();
    match event {
        QueryStatus::Idle => next.set_loading(false),
        QueryStatus::Loading => next.set_loading(true),
        QueryStatus::Success(data) => {
            next.apply_data(data);
            next.set_loading(false);
            next.set_error(None);
        }
        QueryStatus::Failed(message) => {
            next.set_loading(false);
            next.set_error(Some(message));
        }
    }
    next
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Dispatch a query event through [`reconcile`].
    pub fn apply<D>(&self, event: QueryStatus<D>)
    where
        T: QueryTarget<D>,
    {
        self.update(|state| *state = reconcile(state, event));
    }
}

/// Run a read and mirror each of its status changes into `store`.
pub(crate) async fn sync_query<T, D, F>(store: &Store<T>, label: &str, query: F)
where
    T: QueryTarget<D> + Clone + Send + Sync + 'static,
    F: Future<Output = ApiResult<D>>,
{
    debug!(query = label, "query started");
    store.apply::<D>(QueryStatus::Loading);
    let status = QueryStatus::from_result(query.await);
    if let QueryStatus::Failed(message) = &status {
        warn!(query = label, error = %message, "query failed");
    } else {
        debug!(query = label, "query resolved");
    }
    store.apply(status);
}

/// Result of a query that is not mirrored into an entity store.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<D> {
    pub data: Option<D>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<D> Default for QueryResult<D> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

impl<D> QueryTarget<D> for QueryResult<D> {
    fn apply_data(&mut self, data: D) {
        self.data = Some(data);
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Pending and last-error bookkeeping for one kind of mutation.
///
/// Several calls may be in flight at once; the mutation counts as pending
/// while any of them is.
#[derive(Debug, Default)]
pub struct MutationState {
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl MutationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failure, cleared by the next success.
    pub fn error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Await `call`, marking the mutation pending until it settles.
    pub async fn run<T, F>(&self, label: &str, call: F) -> SyncResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let _pending = PendingGuard::enter(&self.in_flight);
        match call.await {
            Ok(value) => {
                *self.last_error.lock() = None;
                Ok(value)
            }
            Err(err) => {
                warn!(mutation = label, error = %err, "mutation failed");
                *self.last_error.lock() = Some(err.message().to_string());
                Err(SyncError::from(err))
            }
        }
    }
}

struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

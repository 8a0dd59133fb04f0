use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(u64, Subscriber<T>)>,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// An observable state container.
///
/// Every mutation is a single indivisible transition: the new state is
/// written under the lock, then each subscriber is called synchronously
/// with a snapshot of it, in subscription order. Clones share state.
pub struct Store<T> {
    state: Arc<RwLock<T>>,
    subscribers: Arc<Mutex<Subscribers<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(Mutex::new(Subscribers::new())),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> T {
        self.state.read().clone()
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.state.read())
    }

    /// Update the state in place, then notify subscribers.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let (result, snapshot) = {
            let mut state = self.state.write();
            let result = f(&mut state);
            (result, state.clone())
        };
        self.notify(&snapshot);
        result
    }

    /// Replace the whole state, then notify subscribers.
    pub fn set(&self, new_state: T) {
        let snapshot = new_state.clone();
        *self.state.write() = new_state;
        self.notify(&snapshot);
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every mutation until the returned guard is
    /// dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut subs = self.subscribers.lock();
            let id = subs.next_id;
            subs.next_id += 1;
            subs.entries.push((id, Arc::new(callback)));
            id
        };

        let weak: Weak<Mutex<Subscribers<T>>> = Arc::downgrade(&self.subscribers);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(subs) = weak.upgrade() {
                    subs.lock().entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().entries.len()
    }

    /// Drop every subscriber. Outstanding guards become no-ops.
    pub fn unsubscribe_all(&self) {
        self.subscribers.lock().entries.clear();
    }

    fn notify(&self, snapshot: &T) {
        // Callbacks run outside the lock so they may read the store or subscribe.
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .lock()
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for subscriber in subscribers {
            subscriber(snapshot);
        }
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Store<T> {
    /// Restore the declared initial state.
    pub fn reset(&self) {
        self.set(T::default());
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

/// RAII guard for a store subscription.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Keep the subscription alive for the lifetime of the store.
    pub fn detach(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

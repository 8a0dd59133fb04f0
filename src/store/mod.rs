//! Observable entity stores.
//!
//! Each entity type gets its own [`Store`] wrapper with a fixed action set
//! and a family of pure `select_*` functions over its state snapshot.
//! [`Stores`] bundles one instance of each so they can be injected into
//! managers and reset together.

pub mod analytics;
pub mod collection;
pub mod dictionary;
pub mod glossary;
pub mod project;
pub mod settings;
mod store;
pub mod subscription;

pub use analytics::{AnalyticsState, AnalyticsStore, DateRange};
pub use collection::KeyedCollection;
pub use dictionary::{DictionaryState, DictionaryStore};
pub use glossary::{GlossaryState, GlossaryStore};
pub use project::{ProjectState, ProjectStore};
pub use settings::{SettingsState, SettingsStore};
pub use store::{Store, Subscription};
pub use subscription::{Quota, SubscriptionState, SubscriptionStore};

use std::sync::OnceLock;
use tracing::info;

/// One instance of every entity store.
///
/// Clones share the same underlying stores. Tests construct their own with
/// [`Stores::new`]; applications that want a single process-wide set use
/// [`Stores::global`].
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub projects: ProjectStore,
    pub dictionaries: DictionaryStore,
    pub glossaries: GlossaryStore,
    pub settings: SettingsStore,
    pub subscription: SubscriptionStore,
    pub analytics: AnalyticsStore,
}

impl Stores {
    /// Create an independent set of stores in their initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide set, created on first use.
    pub fn global() -> &'static Stores {
        static STORES: OnceLock<Stores> = OnceLock::new();
        STORES.get_or_init(Stores::new)
    }

    /// Return every store to its initial state.
    ///
    /// Each store resets in one transition, so its subscribers never see a
    /// half-cleared state.
    pub fn reset_all(&self) {
        self.projects.reset();
        self.dictionaries.reset();
        self.glossaries.reset();
        self.settings.reset();
        self.subscription.reset();
        self.analytics.reset();
        info!("all stores reset");
    }

    /// Reset every store and drop all of their subscribers.
    pub fn teardown(&self) {
        self.reset_all();
        self.projects.store().unsubscribe_all();
        self.dictionaries.store().unsubscribe_all();
        self.glossaries.store().unsubscribe_all();
        self.settings.store().unsubscribe_all();
        self.subscription.store().unsubscribe_all();
        self.analytics.store().unsubscribe_all();
    }
}

/// Clear every process-wide store, e.g. on sign-out.
pub fn reset_all_stores() {
    Stores::global().reset_all();
}

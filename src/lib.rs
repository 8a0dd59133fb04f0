//! # Whisperly Sync
//!
//! Client-side state synchronization for the Whisperly translation API.
//!
//! The crate keeps a local, observable copy of server entities and keeps it
//! consistent with remote reads and writes.
//!
//! ## Stores (Cached state)
//!
//! One [`Store`] per entity family, each with a fixed set of actions and pure
//! `select_*` functions:
//! - projects, plus the current selection
//! - dictionaries and glossaries, keyed by project id
//! - user settings, subscription and usage analytics
//!
//! [`Stores`] bundles one of each; [`reset_all_stores`] clears the
//! process-wide set on sign-out.
//!
//! ## Managers (Remote binding)
//!
//! Each manager owns an API handle and mirrors its read query into a store.
//! Mutations update the store only once the server has confirmed them.
//!
//! ```no_run
//! use std::sync::Arc;
//! use whisperly_sync::{ClientCache, ManagerConfig, ProjectManager, Stores, TokenAccessor};
//! # use whisperly_sync::client::WhisperlyApi;
//! # fn build_http_client(_: &str, _: TokenAccessor) -> Arc<dyn WhisperlyApi> { unimplemented!() }
//!
//! # async fn run() -> whisperly_sync::SyncResult<()> {
//! let cache = ClientCache::new(build_http_client);
//! let config = ManagerConfig::new("https://api.whisperly.dev", "acme");
//! let token = TokenAccessor::fixed("id-token");
//! let stores = Stores::new();
//!
//! let projects = ProjectManager::connect(&cache, &config, &token, stores.projects.clone())?;
//! projects.activate().await;
//! for project in projects.projects() {
//!     println!("{}", project.project_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod query;
pub mod store;

// Re-export main types for convenience
pub use auth::{AuthAdapter, IdentityProvider, Session};
pub use client::{ClientCache, ClientFactory, TokenAccessor, WhisperlyApi};
pub use config::{AnalyticsOptions, ManagerConfig};
pub use error::{ApiError, ApiResult, AuthError, SyncError, SyncResult};
pub use manager::{
    AnalyticsManager, DictionaryManager, GlossaryManager, LanguagesManager, ProjectDetail,
    ProjectManager, SettingsManager, SubscriptionManager, TranslationManager,
};
pub use query::{MutationState, QueryResult, QueryStatus};
pub use store::{reset_all_stores, Store, Stores, Subscription};

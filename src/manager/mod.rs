//! Managers bind remote queries and mutations to the entity stores.
//!
//! A manager's read query is mirrored into its store on every status change
//! (loading, data, error). Mutations write to the store only after the server
//! confirmed them; a failed mutation returns its error to the caller and
//! leaves the store untouched.

mod analytics;
mod dictionary;
mod glossary;
mod languages;
mod project;
mod settings;
mod subscription;
mod translation;

pub use analytics::AnalyticsManager;
pub use dictionary::DictionaryManager;
pub use glossary::GlossaryManager;
pub use languages::{LanguagesManager, AVAILABLE_LANGUAGES_TTL};
pub use project::{ProjectDetail, ProjectManager};
pub use settings::SettingsManager;
pub use subscription::SubscriptionManager;
pub use translation::TranslationManager;

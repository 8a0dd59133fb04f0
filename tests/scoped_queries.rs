//! Managers whose query depends on options that change over time.

mod common;

use chrono::NaiveDate;
use common::*;
use pretty_assertions::assert_eq;
use std::time::Duration;
use whisperly_sync::manager::AVAILABLE_LANGUAGES_TTL;
use whisperly_sync::model::AnalyticsQuery;
use whisperly_sync::store::DateRange;
use whisperly_sync::{AnalyticsManager, AnalyticsOptions, LanguagesManager, Stores};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[tokio::test]
async fn analytics_options_are_mirrored_and_requeried() {
    let api = FakeApi::new();
    let stores = Stores::new();
    let options = AnalyticsOptions {
        start_date: Some(day(1)),
        end_date: Some(day(31)),
        ..Default::default()
    };
    let manager = AnalyticsManager::new(dyn_api(&api), stores.analytics.clone(), options);
    assert_eq!(
        manager.date_range(),
        DateRange {
            start_date: Some(day(1)),
            end_date: Some(day(31)),
        }
    );

    manager.activate().await;
    assert_eq!(manager.aggregate().map(|a| a.total_requests), Some(10));
    assert_eq!(manager.by_date().len(), 1);

    manager.set_filter_project_id(Some("p1".to_string())).await;
    assert_eq!(manager.filter_project_id().as_deref(), Some("p1"));

    manager.set_date_range(Some(day(10)), None).await;
    assert_eq!(
        api.analytics_queries(),
        vec![
            AnalyticsQuery {
                start_date: Some(day(1)),
                end_date: Some(day(31)),
                project_id: None,
            },
            AnalyticsQuery {
                start_date: Some(day(1)),
                end_date: Some(day(31)),
                project_id: Some("p1".to_string()),
            },
            AnalyticsQuery {
                start_date: Some(day(10)),
                end_date: None,
                project_id: Some("p1".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn disabled_analytics_still_tracks_filters() {
    let api = FakeApi::new();
    let stores = Stores::new();
    let options = AnalyticsOptions {
        enabled: false,
        ..Default::default()
    };
    let manager = AnalyticsManager::new(dyn_api(&api), stores.analytics.clone(), options);
    manager.activate().await;
    manager.set_filter_project_id(Some("p9".to_string())).await;

    assert_eq!(api.calls("get_analytics"), 0);
    assert_eq!(manager.filter_project_id().as_deref(), Some("p9"));
    assert_eq!(manager.analytics(), None);
}

#[tokio::test]
async fn analytics_failure_lands_in_error_slot() {
    let api = FakeApi::new();
    api.fail("get_analytics", "bad range");
    let stores = Stores::new();
    let manager =
        AnalyticsManager::new(dyn_api(&api), stores.analytics.clone(), AnalyticsOptions::default());
    manager.activate().await;
    assert_eq!(manager.error().as_deref(), Some("bad range"));
    assert!(!manager.is_loading());
}

#[tokio::test(start_paused = true)]
async fn available_languages_are_cached_for_an_hour() {
    let api = FakeApi::new();
    api.seed_languages("p1", "en,fr");
    let manager = LanguagesManager::new(dyn_api(&api), "acme", "p1");

    manager.activate().await;
    assert_eq!(manager.project_languages().as_deref(), Some("en,fr"));
    assert_eq!(manager.available_languages().len(), 2);
    assert_eq!(api.calls("get_available_languages"), 1);

    tokio::time::advance(Duration::from_secs(60)).await;
    manager.activate().await;
    assert_eq!(api.calls("get_project_languages"), 2);
    assert_eq!(api.calls("get_available_languages"), 1);

    tokio::time::advance(AVAILABLE_LANGUAGES_TTL).await;
    manager.activate().await;
    assert_eq!(api.calls("get_available_languages"), 2);
}

#[tokio::test]
async fn language_update_requeries_project() {
    let api = FakeApi::new();
    api.seed_languages("p1", "en");
    let manager = LanguagesManager::new(dyn_api(&api), "acme", "p1");
    manager.activate().await;

    let updated = manager.update_languages("en,ja").await.unwrap();
    assert_eq!(updated.languages, "en,ja");
    assert_eq!(api.calls("get_project_languages"), 2);
    assert_eq!(manager.project_languages().as_deref(), Some("en,ja"));
    assert!(!manager.is_updating());
}

#[tokio::test]
async fn switching_project_drops_previous_languages() {
    let api = FakeApi::new();
    api.seed_languages("p1", "en,fr");
    api.seed_languages("p3", "ja");
    let manager = LanguagesManager::new(dyn_api(&api), "acme", "p1");
    manager.activate().await;
    assert_eq!(manager.project_languages().as_deref(), Some("en,fr"));

    api.fail("get_project_languages", "unavailable");
    manager.set_project("p2").await;
    assert_eq!(manager.project_id(), "p2");
    assert_eq!(manager.project_languages(), None);
    assert_eq!(manager.error().as_deref(), Some("unavailable"));

    manager.set_project("").await;
    assert_eq!(manager.project_languages(), None);
    assert_eq!(manager.error(), None);

    api.recover("get_project_languages");
    manager.set_project("p3").await;
    assert_eq!(manager.project_languages().as_deref(), Some("ja"));
}

#[tokio::test]
async fn same_project_keeps_languages_on_failed_requery() {
    let api = FakeApi::new();
    api.seed_languages("p1", "en");
    let manager = LanguagesManager::new(dyn_api(&api), "acme", "p1");
    manager.activate().await;

    api.fail("get_project_languages", "unavailable");
    manager.set_project("p1").await;
    assert_eq!(manager.project_languages().as_deref(), Some("en"));
    assert_eq!(manager.error().as_deref(), Some("unavailable"));
}

#[tokio::test]
async fn languages_skip_project_query_without_scope() {
    let api = FakeApi::new();
    let manager = LanguagesManager::new(dyn_api(&api), "acme", "");
    manager.activate().await;
    assert_eq!(api.calls("get_project_languages"), 0);
    assert_eq!(api.calls("get_available_languages"), 1);
    assert_eq!(manager.project_languages(), None);
}

//! Cached subscription and quota figures.
//!
//! Remaining quota is never stored; the selectors derive it from the cached
//! limit and usage on every read and clamp it at zero.

use super::store::{Store, Subscription as Guard};
use crate::model::{Subscription, SubscriptionTier};
use crate::query::QueryTarget;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionState {
    pub subscription: Option<Subscription>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl QueryTarget<Subscription> for SubscriptionState {
    fn apply_data(&mut self, data: Subscription) {
        self.subscription = Some(data);
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Store holding the billing subscription.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionStore {
    inner: Store<SubscriptionState>,
}

impl SubscriptionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SubscriptionState {
        self.inner.get()
    }

    /// Read the state in place without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&SubscriptionState) -> R) -> R {
        self.inner.read(f)
    }

    /// Call `callback` after every change until the returned guard drops.
    pub fn subscribe<F>(&self, callback: F) -> Guard
    where
        F: Fn(&SubscriptionState) + Send + Sync + 'static,
    {
        self.inner.subscribe(callback)
    }

    /// Replace the cached subscription.
    pub fn set_subscription(&self, subscription: Option<Subscription>) {
        self.inner.update(|s| s.subscription = subscription);
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

    pub(crate) fn store(&self) -> &Store<SubscriptionState> {
        &self.inner
    }
}

/// Quota figures derived from a subscription snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quota {
    pub monthly_limit: u64,
    pub monthly_used: u64,
    pub monthly_remaining: u64,
    pub hourly_limit: u64,
    pub hourly_used: u64,
    pub hourly_remaining: u64,
}

pub fn select_subscription(state: &SubscriptionState) -> Option<&Subscription> {
    state.subscription.as_ref()
}

pub fn select_tier(state: &SubscriptionState) -> Option<SubscriptionTier> {
    state.subscription.as_ref().map(|s| s.tier)
}

pub fn select_monthly_limit(state: &SubscriptionState) -> u64 {
    state
        .subscription
        .as_ref()
        .map_or(0, |s| s.monthly_request_limit)
}

pub fn select_monthly_used(state: &SubscriptionState) -> u64 {
    state
        .subscription
        .as_ref()
        .map_or(0, |s| s.requests_this_month)
}

pub fn select_monthly_remaining(state: &SubscriptionState) -> u64 {
    state.subscription.as_ref().map_or(0, |s| {
        s.monthly_request_limit.saturating_sub(s.requests_this_month)
    })
}

pub fn select_hourly_limit(state: &SubscriptionState) -> u64 {
    state
        .subscription
        .as_ref()
        .map_or(0, |s| s.hourly_request_limit)
}

pub fn select_hourly_used(state: &SubscriptionState) -> u64 {
    state
        .subscription
        .as_ref()
        .map_or(0, |s| s.requests_this_hour)
}

pub fn select_hourly_remaining(state: &SubscriptionState) -> u64 {
    state.subscription.as_ref().map_or(0, |s| {
        s.hourly_request_limit.saturating_sub(s.requests_this_hour)
    })
}

pub fn select_quota(state: &SubscriptionState) -> Quota {
    Quota {
        monthly_limit: select_monthly_limit(state),
        monthly_used: select_monthly_used(state),
        monthly_remaining: select_monthly_remaining(state),
        hourly_limit: select_hourly_limit(state),
        hourly_used: select_hourly_used(state),
        hourly_remaining: select_hourly_remaining(state),
    }
}

pub fn select_is_loading(state: &SubscriptionState) -> bool {
    state.is_loading
}

pub fn select_error(state: &SubscriptionState) -> Option<&str> {
    state.error.as_deref()
}

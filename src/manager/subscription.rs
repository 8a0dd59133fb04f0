use crate::client::{ClientCache, TokenAccessor, WhisperlyApi};
use crate::config::ManagerConfig;
use crate::error::SyncResult;
use crate::model::{Subscription, SubscriptionTier};
use crate::query::{sync_query, MutationState};
use crate::store::subscription::{self, Quota, SubscriptionStore};
use std::sync::Arc;

/// Subscription tier and request quotas.
///
/// Quota figures are recomputed from the cached subscription on every call.
pub struct SubscriptionManager {
    api: Arc<dyn WhisperlyApi>,
    store: SubscriptionStore,
    enabled: bool,
    sync: MutationState,
}

impl SubscriptionManager {
    pub fn new(api: Arc<dyn WhisperlyApi>, store: SubscriptionStore) -> Self {
        Self {
            api,
            store,
            enabled: true,
            sync: MutationState::new(),
        }
    }

    pub fn connect(
        cache: &ClientCache,
        config: &ManagerConfig,
        token: &TokenAccessor,
        store: SubscriptionStore,
    ) -> SyncResult<Self> {
        let api = config.client(cache, token)?;
        Ok(Self::new(api, store).with_enabled(config.enabled))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub async fn activate(&self) {
        if self.enabled {
            self.refetch().await;
        }
    }

    pub async fn refetch(&self) {
        sync_query(
            self.store.store(),
            "subscription",
            self.api.get_subscription(),
        )
        .await;
    }

    /// Have the server re-read entitlements from RevenueCat.
    pub async fn sync_with_revenuecat(&self) -> SyncResult<Subscription> {
        let synced = self
            .sync
            .run("sync_subscription", self.api.sync_subscription())
            .await?;
        self.store.set_subscription(Some(synced.clone()));
        Ok(synced)
    }

    pub fn subscription(&self) -> Option<Subscription> {
        self.store
            .read(|s| subscription::select_subscription(s).cloned())
    }

    pub fn tier(&self) -> Option<SubscriptionTier> {
        self.store.read(subscription::select_tier)
    }

    pub fn quota(&self) -> Quota {
        self.store.read(subscription::select_quota)
    }

    pub fn monthly_remaining(&self) -> u64 {
        self.store.read(subscription::select_monthly_remaining)
    }

    pub fn hourly_remaining(&self) -> u64 {
        self.store.read(subscription::select_hourly_remaining)
    }

    pub fn is_loading(&self) -> bool {
        self.store.read(subscription::select_is_loading) || self.sync.is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.store
            .read(|s| subscription::select_error(s).map(str::to_string))
    }

    pub fn is_syncing(&self) -> bool {
        self.sync.is_pending()
    }

    pub fn store(&self) -> &SubscriptionStore {
        &self.store
    }
}

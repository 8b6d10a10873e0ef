use std::sync::Arc;

use {dashmap::DashMap, tracing::warn};

use crate::{
    store::{LockSnapshot, LockStore},
    types::LockRecord,
};

/// The source of truth for which channels are locked and why.
///
/// Every mutation is followed by a whole-snapshot persist. Persist failures
/// are logged and swallowed: in-memory state stays authoritative for the
/// rest of the process lifetime, accepting a durability gap until the next
/// successful write.
pub struct LockRegistry {
    entries: DashMap<String, LockRecord>,
    store: Arc<dyn LockStore>,
}

impl LockRegistry {
    /// Load the last durable snapshot from `store`.
    pub async fn load(store: Arc<dyn LockStore>) -> anyhow::Result<Self> {
        let snapshot = store.load().await?;
        let entries = DashMap::new();
        for (channel_id, record) in snapshot {
            entries.insert(channel_id, record);
        }
        Ok(Self { entries, store })
    }

    #[must_use]
    pub fn get(&self, channel_id: &str) -> Option<LockRecord> {
        self.entries.get(channel_id).map(|e| e.value().clone())
    }

    #[must_use]
    pub fn contains(&self, channel_id: &str) -> bool {
        self.entries.contains_key(channel_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every `(channel_id, record)` pair. Backs the cross-channel queries
    /// (search by trigger, ranking).
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, LockRecord)> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    pub async fn insert(&self, channel_id: &str, record: LockRecord) {
        self.entries.insert(channel_id.to_string(), record);
        self.persist().await;
    }

    /// Attach the posted notice id to an existing record.
    pub async fn set_notice(&self, channel_id: &str, message_id: &str) {
        if let Some(mut entry) = self.entries.get_mut(channel_id) {
            entry.notice_message_id = Some(message_id.to_string());
        }
        self.persist().await;
    }

    pub async fn remove(&self, channel_id: &str) -> Option<LockRecord> {
        let removed = self.entries.remove(channel_id).map(|(_, record)| record);
        if removed.is_some() {
            self.persist().await;
        }
        removed
    }

    async fn persist(&self) {
        let snapshot: LockSnapshot = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        if let Err(e) = self.store.save(&snapshot).await {
            warn!(error = %e, "failed to persist lock registry");
        }
    }
}

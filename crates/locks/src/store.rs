use std::collections::HashMap;

use {anyhow::Result, async_trait::async_trait};

use crate::types::LockRecord;

/// Full registry contents, keyed by channel id.
pub type LockSnapshot = HashMap<String, LockRecord>;

/// Durable storage for the lock registry.
///
/// Writes are whole-snapshot: the registry is small and mutates rarely, so a
/// full rewrite per mutation is cheaper than recovery logic for partial
/// writes.
#[async_trait]
pub trait LockStore: Send + Sync {
    async fn load(&self) -> Result<LockSnapshot>;
    async fn save(&self, snapshot: &LockSnapshot) -> Result<()>;
}

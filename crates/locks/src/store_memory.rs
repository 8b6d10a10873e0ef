//! In-memory lock store for tests and ephemeral runs.

use {anyhow::Result, async_trait::async_trait, tokio::sync::Mutex};

use crate::store::{LockSnapshot, LockStore};

#[derive(Default)]
pub struct MemoryLockStore {
    inner: Mutex<LockSnapshot>,
}

impl MemoryLockStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_snapshot(snapshot: LockSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn load(&self) -> Result<LockSnapshot> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, snapshot: &LockSnapshot) -> Result<()> {
        *self.inner.lock().await = snapshot.clone();
        Ok(())
    }
}

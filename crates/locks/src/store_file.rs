//! JSON file-backed lock store with atomic writes.

use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    tokio::fs,
};

use crate::store::{LockSnapshot, LockStore};

/// File-backed store. The whole registry lives in a single JSON document.
pub struct FileLockStore {
    path: PathBuf,
}

impl FileLockStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the conventional `locks.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("locks.json"))
    }

    /// Atomic write: write to temp, rename over target, keep `.bak`.
    async fn atomic_write(&self, json: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json.as_bytes()).await?;

        // Backup existing file.
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let bak = self.path.with_extension("json.bak");
            let _ = fs::rename(&self.path, &bak).await;
        }

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LockStore for FileLockStore {
    async fn load(&self) -> Result<LockSnapshot> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(LockSnapshot::new());
        }
        let data = fs::read_to_string(&self.path).await?;
        let snapshot: LockSnapshot = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &LockSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        self.atomic_write(&json).await
    }
}

//! Per-guild runtime settings, persisted as one JSON document.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use {
    anyhow::{Context, Result},
    serde::{Deserialize, Serialize},
    tokio::{fs, sync::RwLock},
    tracing::debug,
};

/// Mutable bot settings operators change at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Role mentioned in lock notices, per guild.
    pub mention_roles: HashMap<String, String>,
    /// Channel receiving audit messages, if configured.
    pub log_channel: Option<String>,
}

/// File-backed settings store with atomic writes.
pub struct SettingsStore {
    path: PathBuf,
    state: RwLock<Settings>,
}

impl SettingsStore {
    /// Load `settings.json` from `data_dir`, creating it when missing.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).await?;
        let path = data_dir.join("settings.json");
        let state = if fs::try_exists(&path).await.unwrap_or(false) {
            let data = fs::read_to_string(&path).await?;
            serde_json::from_str(&data)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            let defaults = Settings::default();
            fs::write(&path, serde_json::to_string_pretty(&defaults)?).await?;
            debug!(path = %path.display(), "settings file created");
            defaults
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub async fn snapshot(&self) -> Settings {
        self.state.read().await.clone()
    }

    pub async fn mention_role(&self, guild_id: &str) -> Option<String> {
        self.state.read().await.mention_roles.get(guild_id).cloned()
    }

    pub async fn log_channel(&self) -> Option<String> {
        self.state.read().await.log_channel.clone()
    }

    pub async fn set_mention_role(&self, guild_id: &str, role_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .mention_roles
            .insert(guild_id.to_string(), role_id.to_string());
        self.persist(&state).await
    }

    pub async fn clear_mention_role(&self, guild_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.mention_roles.remove(guild_id);
        self.persist(&state).await
    }

    pub async fn set_log_channel(&self, channel_id: Option<String>) -> Result<()> {
        let mut state = self.state.write().await;
        state.log_channel = channel_id;
        self.persist(&state).await
    }

    /// Atomic write: write to temp, rename over target, keep `.bak`.
    async fn persist(&self, state: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let bak = self.path.with_extension("json.bak");
            let _ = fs::rename(&self.path, &bak).await;
        }
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    #[tokio::test]
    async fn settings_roundtrip() {
        let tmp = TempDir::new().unwrap();
        {
            let store = SettingsStore::load(tmp.path()).await.unwrap();
            store.set_mention_role("guild-1", "role-9").await.unwrap();
            store
                .set_log_channel(Some("log-channel".into()))
                .await
                .unwrap();
        }

        let store = SettingsStore::load(tmp.path()).await.unwrap();
        assert_eq!(
            store.mention_role("guild-1").await.as_deref(),
            Some("role-9")
        );
        assert_eq!(store.log_channel().await.as_deref(), Some("log-channel"));
    }

    #[tokio::test]
    async fn clear_mention_role_removes_entry() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::load(tmp.path()).await.unwrap();
        store.set_mention_role("guild-1", "role-9").await.unwrap();
        store.clear_mention_role("guild-1").await.unwrap();
        assert!(store.mention_role("guild-1").await.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::load(tmp.path()).await.unwrap();
        assert!(store.snapshot().await.mention_roles.is_empty());
        assert!(tmp.path().join("settings.json").exists());
    }
}

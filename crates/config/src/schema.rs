//! Config schema types (detector, locks, pagination, storage).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnlockConfig {
    pub detector: DetectorConfig,
    pub locks: LocksConfig,
    pub pagination: PaginationConfig,
    pub storage: StorageConfig,
}

/// Spawn-message detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// User id of the bot that announces spawn names. Empty accepts any author
    /// (useful for offline simulation).
    pub namer_id: String,
    /// User id of the game bot whose send permission is revoked on lock.
    pub collector_id: String,
    /// Spawn channels are named with a bare number in `1..=spawn_channel_max`.
    pub spawn_channel_max: u32,
    /// Role granting spawn access; hidden on private locks and allowed to
    /// release public/manual ones.
    pub spawn_role_id: Option<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            namer_id: String::new(),
            collector_id: String::new(),
            spawn_channel_max: 450,
            spawn_role_id: None,
        }
    }
}

/// Lock state machine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocksConfig {
    /// Re-trigger suppression window after a lock fires.
    pub cooldown_secs: u64,
    /// Channels released per batch during a mass unlock.
    pub unlock_batch_size: usize,
    /// Pause between mass-unlock batches, for external rate limits.
    pub unlock_batch_pause_ms: u64,
}

impl Default for LocksConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 30,
            unlock_batch_size: 5,
            unlock_batch_pause_ms: 2000,
        }
    }
}

/// Pagination session tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Every pagination session expires this many seconds after creation.
    pub session_ttl_secs: u64,
    pub list_page_size: usize,
    pub lock_page_size: usize,
    pub ranking_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 60,
            list_page_size: 25,
            lock_page_size: 5,
            ranking_page_size: 10,
        }
    }
}

/// Where durable state (watchlists, lock snapshot, settings) lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the default platform data dir (`~/.local/share/spawnlock`).
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the effective data directory.
    #[must_use]
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "spawnlock")
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuning() {
        let cfg = SpawnlockConfig::default();
        assert_eq!(cfg.detector.spawn_channel_max, 450);
        assert_eq!(cfg.locks.cooldown_secs, 30);
        assert_eq!(cfg.locks.unlock_batch_size, 5);
        assert_eq!(cfg.pagination.session_ttl_secs, 60);
        assert_eq!(cfg.pagination.list_page_size, 25);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: SpawnlockConfig = toml::from_str(
            r#"
            [locks]
            cooldown_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.locks.cooldown_secs, 10);
        assert_eq!(cfg.locks.unlock_batch_size, 5);
        assert_eq!(cfg.detector.spawn_channel_max, 450);
    }

    #[test]
    fn data_dir_override_wins() {
        let cfg = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/spawnlock-test")),
        };
        assert_eq!(cfg.resolve_data_dir(), PathBuf::from("/tmp/spawnlock-test"));
    }
}

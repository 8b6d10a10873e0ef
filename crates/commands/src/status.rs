//! Operational status summary.

use {
    spawnlock_locks::LockRegistry,
    spawnlock_watchlist::{ListKind, Watchlist},
};

use crate::CommandReply;

/// Settings facts the dispatcher passes in for display.
#[derive(Debug, Default, Clone, Copy)]
pub struct SettingsSummary {
    pub log_channel_set: bool,
    pub mention_role_count: usize,
}

pub async fn status(
    watchlist: &Watchlist,
    registry: &LockRegistry,
    spawn_channel_max: u32,
    settings: SettingsSummary,
) -> CommandReply {
    let locked = registry.len();
    let text = format!(
        "Spawn channels: 1..{spawn_channel_max} ({locked} locked)\n\
         Public list: {} names\n\
         Private list: {} names\n\
         Log channel: {}\n\
         Mention roles: {} configured",
        watchlist.len(ListKind::Public).await,
        watchlist.len(ListKind::Private).await,
        if settings.log_channel_set {
            "configured"
        } else {
            "not configured"
        },
        settings.mention_role_count,
    );
    CommandReply::text(text)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use {
        spawnlock_locks::{LockKind, LockRecord, MemoryLockStore},
        tempfile::TempDir,
    };

    use super::*;

    #[tokio::test]
    async fn status_reports_counters() {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        wl.add_many(ListKind::Public, &["pikachu".into(), "eevee".into()])
            .await
            .unwrap();
        let registry = LockRegistry::load(Arc::new(MemoryLockStore::new()))
            .await
            .unwrap();
        registry
            .insert("7", LockRecord::new(LockKind::Public, "eevee", 0))
            .await;

        let reply = status(&wl, &registry, 450, SettingsSummary::default()).await;
        assert!(reply.text.contains("1..450 (1 locked)"));
        assert!(reply.text.contains("Public list: 2 names"));
        assert!(reply.text.contains("Log channel: not configured"));
    }
}

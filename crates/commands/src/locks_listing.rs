//! Paginated views over the lock registry: inventory, search, ranking.

use std::{collections::HashMap, sync::Arc};

use {
    spawnlock_locks::LockRegistry,
    spawnlock_pagination::PageSpec,
};

use crate::{
    CommandReply,
    render::{BlockRows, NumberedRows},
};

pub const LOCKS_PREFIX: &str = "locks_";
pub const FIND_PREFIX: &str = "lockfind_";
pub const RANK_PREFIX: &str = "rank_";

fn lock_row(channel_id: &str, trigger: &str, kind: &str) -> String {
    format!("{trigger} [{kind}]\nchannel {channel_id}")
}

fn sorted_locks(registry: &LockRegistry) -> Vec<String> {
    let mut entries = registry.snapshot();
    entries.sort_by(|(_, a), (_, b)| a.trigger.cmp(&b.trigger));
    entries
        .into_iter()
        .map(|(channel_id, record)| {
            lock_row(&channel_id, &record.trigger, &record.kind.to_string())
        })
        .collect()
}

/// All locked channels, 5 per page.
pub fn locked(registry: &LockRegistry, page_size: usize) -> CommandReply {
    let rows = sorted_locks(registry);
    if rows.is_empty() {
        return CommandReply::text("No channels are locked right now.");
    }

    CommandReply::paged(PageSpec {
        rows,
        page_size,
        prefix: LOCKS_PREFIX.into(),
        renderer: Arc::new(BlockRows {
            title: "Locked channels".into(),
        }),
    })
}

/// Locked channels whose trigger contains `term`.
pub fn locked_by_name(registry: &LockRegistry, term: &str, page_size: usize) -> CommandReply {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return CommandReply::text("Usage: find <name>");
    }

    let mut entries = registry.snapshot();
    entries.retain(|(_, record)| record.trigger.to_lowercase().contains(&needle));
    if entries.is_empty() {
        return CommandReply::text(format!("No channels locked for \"{needle}\"."));
    }
    entries.sort_by(|(_, a), (_, b)| a.trigger.cmp(&b.trigger));

    let rows = entries
        .into_iter()
        .map(|(channel_id, record)| {
            lock_row(&channel_id, &record.trigger, &record.kind.to_string())
        })
        .collect();

    CommandReply::paged(PageSpec {
        rows,
        page_size,
        prefix: FIND_PREFIX.into(),
        renderer: Arc::new(BlockRows {
            title: format!("Locked channels for \"{needle}\""),
        }),
    })
}

/// Triggers ranked by how many channels they currently hold, 10 per page.
pub fn ranking(registry: &LockRegistry, page_size: usize) -> CommandReply {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for (_, record) in registry.snapshot() {
        *counts.entry(record.trigger).or_default() += 1;
    }
    if counts.is_empty() {
        return CommandReply::text("No channels are locked right now.");
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(name_a, count_a), (name_b, count_b)| {
        count_b.cmp(count_a).then_with(|| name_a.cmp(name_b))
    });

    let rows = ranked
        .into_iter()
        .map(|(trigger, count)| {
            let channels = if count == 1 { "channel" } else { "channels" };
            format!("{trigger} - {count} {channels}")
        })
        .collect();

    CommandReply::paged(PageSpec {
        rows,
        page_size,
        prefix: RANK_PREFIX.into(),
        renderer: Arc::new(NumberedRows {
            title: "Most locked spawns".into(),
        }),
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use spawnlock_locks::{LockKind, LockRecord, MemoryLockStore};

    use super::*;

    async fn registry_with(entries: &[(&str, LockKind, &str)]) -> LockRegistry {
        let registry = LockRegistry::load(Arc::new(MemoryLockStore::new()))
            .await
            .unwrap();
        for (channel, kind, trigger) in entries {
            registry
                .insert(channel, LockRecord::new(*kind, *trigger, 1000))
                .await;
        }
        registry
    }

    #[tokio::test]
    async fn locked_lists_sorted_by_trigger() {
        let registry = registry_with(&[
            ("30", LockKind::Public, "zubat"),
            ("10", LockKind::Private, "abra"),
        ])
        .await;

        let reply = locked(&registry, 5);
        assert!(reply.text.contains("Locked channels (2)"));
        let abra = reply.text.find("abra [private]").unwrap();
        let zubat = reply.text.find("zubat [public]").unwrap();
        assert!(abra < zubat);
    }

    #[tokio::test]
    async fn locked_empty_registry() {
        let registry = registry_with(&[]).await;
        let reply = locked(&registry, 5);
        assert!(reply.page.is_none());
    }

    #[tokio::test]
    async fn find_matches_substring() {
        let registry = registry_with(&[
            ("1", LockKind::Public, "mew"),
            ("2", LockKind::Public, "mewtwo"),
            ("3", LockKind::Public, "abra"),
        ])
        .await;

        let reply = locked_by_name(&registry, "mew", 5);
        assert!(reply.text.contains("mew [public]"));
        assert!(reply.text.contains("mewtwo [public]"));
        assert!(!reply.text.contains("abra"));
    }

    #[tokio::test]
    async fn ranking_orders_by_count_then_name() {
        let registry = registry_with(&[
            ("1", LockKind::Public, "mew"),
            ("2", LockKind::Public, "abra"),
            ("3", LockKind::Public, "mew"),
            ("4", LockKind::Public, "zubat"),
        ])
        .await;

        let reply = ranking(&registry, 10);
        assert!(reply.text.contains("1. mew - 2 channels"));
        assert!(reply.text.contains("2. abra - 1 channel"));
        assert!(reply.text.contains("3. zubat - 1 channel"));
    }
}

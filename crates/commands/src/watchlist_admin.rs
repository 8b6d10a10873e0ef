//! Watchlist add/remove admin commands.

use {
    spawnlock_locks::Actor,
    spawnlock_watchlist::{ListKind, Watchlist},
    tracing::error,
};

use crate::CommandReply;

const USAGE_ADD: &str = "Usage: add <public|private> <name1, name2, ...>";
const USAGE_REMOVE: &str = "Usage: remove <public|private> <name1, name2, ...>";

fn split_names(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

pub async fn add(
    watchlist: &Watchlist,
    actor: &Actor,
    kind_arg: &str,
    names_arg: &str,
) -> CommandReply {
    if !actor.manage_channels {
        return CommandReply::text("Managing the watchlists requires channel-management authority.");
    }
    let Some(kind) = ListKind::parse_alias(kind_arg) else {
        return CommandReply::text(USAGE_ADD);
    };
    let names = split_names(names_arg);
    if names.is_empty() {
        return CommandReply::text(USAGE_ADD);
    }

    match watchlist.add_many(kind, &names).await {
        Ok(report) => {
            let mut lines = Vec::new();
            if !report.added.is_empty() {
                lines.push(format!(
                    "Added to the {kind} list: {}",
                    report.added.join(", ")
                ));
            }
            if !report.duplicates.is_empty() {
                lines.push(format!("Already present: {}", report.duplicates.join(", ")));
            }
            CommandReply::text(lines.join("\n"))
        },
        Err(e) => {
            error!(error = %e, "watchlist add failed");
            CommandReply::text("Could not update the watchlist; see the logs.")
        },
    }
}

pub async fn remove(
    watchlist: &Watchlist,
    actor: &Actor,
    kind_arg: &str,
    names_arg: &str,
) -> CommandReply {
    if !actor.manage_channels {
        return CommandReply::text("Managing the watchlists requires channel-management authority.");
    }
    let Some(kind) = ListKind::parse_alias(kind_arg) else {
        return CommandReply::text(USAGE_REMOVE);
    };
    let names = split_names(names_arg);
    if names.is_empty() {
        return CommandReply::text(USAGE_REMOVE);
    }

    match watchlist.remove_many(kind, &names).await {
        Ok(report) => {
            let mut lines = Vec::new();
            if !report.removed.is_empty() {
                lines.push(format!(
                    "Removed from the {kind} list: {}",
                    report.removed.join(", ")
                ));
            }
            if !report.missing.is_empty() {
                lines.push(format!("Not found: {}", report.missing.join(", ")));
            }
            CommandReply::text(lines.join("\n"))
        },
        Err(e) => {
            error!(error = %e, "watchlist remove failed");
            CommandReply::text("Could not update the watchlist; see the logs.")
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    async fn watchlist() -> (TempDir, Watchlist) {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        (tmp, wl)
    }

    #[tokio::test]
    async fn add_reports_added_and_duplicates() {
        let (_tmp, wl) = watchlist().await;
        let staff = Actor::staff("s");

        add(&wl, &staff, "pub", "Pikachu, Eevee").await;
        let reply = add(&wl, &staff, "public", "pikachu, mew").await;

        assert!(reply.text.contains("Added to the public list: mew"));
        assert!(reply.text.contains("Already present: pikachu"));
    }

    #[tokio::test]
    async fn remove_reports_missing() {
        let (_tmp, wl) = watchlist().await;
        let staff = Actor::staff("s");
        add(&wl, &staff, "pv", "mew").await;

        let reply = remove(&wl, &staff, "private", "mew, mewtwo").await;
        assert!(reply.text.contains("Removed from the private list: mew"));
        assert!(reply.text.contains("Not found: mewtwo"));
    }

    #[tokio::test]
    async fn requires_management_authority() {
        let (_tmp, wl) = watchlist().await;
        let member = Actor::member("u", true);

        let reply = add(&wl, &member, "pub", "pikachu").await;
        assert!(reply.text.contains("requires channel-management authority"));
        assert!(wl.is_empty(ListKind::Public).await);
    }

    #[tokio::test]
    async fn bad_list_kind_shows_usage() {
        let (_tmp, wl) = watchlist().await;
        let reply = add(&wl, &Actor::staff("s"), "both", "pikachu").await;
        assert_eq!(reply.text, USAGE_ADD);
    }
}

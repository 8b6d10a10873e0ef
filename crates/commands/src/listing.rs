//! Paginated watchlist listing and search.

use std::sync::Arc;

use {
    spawnlock_pagination::PageSpec,
    spawnlock_watchlist::{ListKind, Watchlist, store::normalize},
};

use crate::{CommandReply, render::NumberedRows};

pub const LIST_PREFIX: &str = "wlist_";
pub const SEARCH_PREFIX: &str = "wsearch_";

async fn labelled_rows(watchlist: &Watchlist, filter: Option<ListKind>) -> Vec<String> {
    let mut rows = Vec::new();
    for kind in [ListKind::Public, ListKind::Private] {
        if filter.is_some() && filter != Some(kind) {
            continue;
        }
        rows.extend(
            watchlist
                .snapshot(kind)
                .await
                .into_iter()
                .map(|name| format!("{name} ({kind})")),
        );
    }
    rows.sort();
    rows
}

/// Show one list or both, 25 names per page.
pub async fn list(
    watchlist: &Watchlist,
    filter_arg: Option<&str>,
    page_size: usize,
) -> CommandReply {
    let (filter, title) = match filter_arg {
        None => (None, "Watched names (all lists)"),
        Some(arg) => match ListKind::parse_alias(arg) {
            Some(ListKind::Public) => (Some(ListKind::Public), "Watched names (public list)"),
            Some(ListKind::Private) => (Some(ListKind::Private), "Watched names (private list)"),
            None => {
                return CommandReply::text("Unknown list. Use `public` or `private`.");
            },
        },
    };

    let rows = labelled_rows(watchlist, filter).await;
    if rows.is_empty() {
        return CommandReply::text("The list is empty.");
    }

    CommandReply::paged(PageSpec {
        rows,
        page_size,
        prefix: LIST_PREFIX.into(),
        renderer: Arc::new(NumberedRows {
            title: title.into(),
        }),
    })
}

/// Substring search across both lists.
pub async fn search(watchlist: &Watchlist, term: &str, page_size: usize) -> CommandReply {
    let needle = normalize(term);
    if needle.is_empty() {
        return CommandReply::text("Usage: search <name>");
    }

    let rows: Vec<String> = labelled_rows(watchlist, None)
        .await
        .into_iter()
        .filter(|row| row.contains(&needle))
        .collect();
    if rows.is_empty() {
        return CommandReply::text(format!("No results for \"{needle}\"."));
    }

    CommandReply::paged(PageSpec {
        rows,
        page_size,
        prefix: SEARCH_PREFIX.into(),
        renderer: Arc::new(NumberedRows {
            title: format!("Results for \"{needle}\""),
        }),
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    async fn seeded() -> (TempDir, Watchlist) {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        wl.add_many(
            ListKind::Public,
            &["pikachu".into(), "eevee".into(), "pichu".into()],
        )
        .await
        .unwrap();
        wl.add_many(ListKind::Private, &["mew".into()]).await.unwrap();
        (tmp, wl)
    }

    #[tokio::test]
    async fn list_all_merges_both_lists() {
        let (_tmp, wl) = seeded().await;
        let reply = list(&wl, None, 25).await;

        assert!(reply.page.is_some());
        assert!(reply.text.contains("Watched names (all lists) (4)"));
        assert!(reply.text.contains("mew (private)"));
        assert!(reply.text.contains("pikachu (public)"));
    }

    #[tokio::test]
    async fn list_filter_excludes_other_kind() {
        let (_tmp, wl) = seeded().await;
        let reply = list(&wl, Some("pv"), 25).await;
        assert!(reply.text.contains("mew (private)"));
        assert!(!reply.text.contains("pikachu"));
    }

    #[tokio::test]
    async fn list_empty_has_no_session() {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        let reply = list(&wl, None, 25).await;
        assert!(reply.page.is_none());
        assert_eq!(reply.text, "The list is empty.");
    }

    #[tokio::test]
    async fn search_is_substring_and_case_insensitive() {
        let (_tmp, wl) = seeded().await;
        let reply = search(&wl, "PICHU", 25).await;
        assert!(reply.text.contains("Results for \"pichu\" (1)"));
        assert!(reply.text.contains("1. pichu (public)"));
    }

    #[tokio::test]
    async fn search_without_hits_has_no_session() {
        let (_tmp, wl) = seeded().await;
        let reply = search(&wl, "zzz", 25).await;
        assert!(reply.page.is_none());
    }
}

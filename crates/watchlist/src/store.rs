use std::{
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
};

use {tokio::sync::RwLock, tracing::debug};

use crate::error::{Context, Result};

/// Which of the two watchlists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Public,
    Private,
}

impl ListKind {
    /// Parse the user-facing aliases accepted by admin commands.
    #[must_use]
    pub fn parse_alias(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" | "pub" | "pb" => Some(Self::Public),
            "private" | "priv" | "pv" => Some(Self::Private),
            _ => None,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// Outcome of a bulk add.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<String>,
    pub duplicates: Vec<String>,
}

/// Outcome of a bulk remove.
#[derive(Debug, Default)]
pub struct RemoveReport {
    pub removed: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Default)]
struct Sets {
    public: BTreeSet<String>,
    private: BTreeSet<String>,
}

impl Sets {
    fn get(&self, kind: ListKind) -> &BTreeSet<String> {
        match kind {
            ListKind::Public => &self.public,
            ListKind::Private => &self.private,
        }
    }

    fn get_mut(&mut self, kind: ListKind) -> &mut BTreeSet<String> {
        match kind {
            ListKind::Public => &mut self.public,
            ListKind::Private => &mut self.private,
        }
    }
}

/// The two persisted name sets.
///
/// On-disk format is a plain JSON string array per list. Every successful
/// mutation writes the owning file atomically and then reloads it, so memory
/// and disk cannot drift.
pub struct Watchlist {
    public_path: PathBuf,
    private_path: PathBuf,
    sets: RwLock<Sets>,
}

/// Normalize a name the way all lookups expect it: lowercased, trimmed.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Watchlist {
    /// Load both lists from `data_dir`, creating empty files as needed.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let list = Self {
            public_path: data_dir.join("watchlist_public.json"),
            private_path: data_dir.join("watchlist_private.json"),
            sets: RwLock::new(Sets::default()),
        };
        {
            let mut sets = list.sets.write().await;
            sets.public = read_list(&list.public_path).await?;
            sets.private = read_list(&list.private_path).await?;
            debug!(
                public = sets.public.len(),
                private = sets.private.len(),
                "watchlists loaded"
            );
        }
        Ok(list)
    }

    fn path_for(&self, kind: ListKind) -> &Path {
        match kind {
            ListKind::Public => &self.public_path,
            ListKind::Private => &self.private_path,
        }
    }

    /// Add names to a list. Duplicates are reported, not errors.
    pub async fn add_many(&self, kind: ListKind, names: &[String]) -> Result<AddReport> {
        let mut report = AddReport::default();
        {
            let mut sets = self.sets.write().await;
            let set = sets.get_mut(kind);
            for name in names.iter().map(|n| normalize(n)).filter(|n| !n.is_empty()) {
                if set.insert(name.clone()) {
                    report.added.push(name);
                } else {
                    report.duplicates.push(name);
                }
            }
        }
        if !report.added.is_empty() {
            self.persist_and_reload(kind).await?;
        }
        Ok(report)
    }

    /// Remove names from a list. Unknown names are reported, not errors.
    pub async fn remove_many(&self, kind: ListKind, names: &[String]) -> Result<RemoveReport> {
        let mut report = RemoveReport::default();
        {
            let mut sets = self.sets.write().await;
            let set = sets.get_mut(kind);
            for name in names.iter().map(|n| normalize(n)).filter(|n| !n.is_empty()) {
                if set.remove(&name) {
                    report.removed.push(name);
                } else {
                    report.missing.push(name);
                }
            }
        }
        if !report.removed.is_empty() {
            self.persist_and_reload(kind).await?;
        }
        Ok(report)
    }

    pub async fn contains(&self, kind: ListKind, name: &str) -> bool {
        self.sets.read().await.get(kind).contains(&normalize(name))
    }

    /// Sorted copy of one list.
    pub async fn snapshot(&self, kind: ListKind) -> Vec<String> {
        self.sets.read().await.get(kind).iter().cloned().collect()
    }

    pub async fn len(&self, kind: ListKind) -> usize {
        self.sets.read().await.get(kind).len()
    }

    pub async fn is_empty(&self, kind: ListKind) -> bool {
        self.len(kind).await == 0
    }

    /// Write the list atomically, then reload it wholesale so the in-memory
    /// set always reflects what a restart would see.
    async fn persist_and_reload(&self, kind: ListKind) -> Result<()> {
        let path = self.path_for(kind).to_path_buf();
        let mut sets = self.sets.write().await;
        let names: Vec<&String> = sets.get(kind).iter().collect();
        let json = serde_json::to_string_pretty(&names)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json.as_bytes()).await?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let bak = path.with_extension("json.bak");
            let _ = tokio::fs::rename(&path, &bak).await;
        }
        tokio::fs::rename(&tmp, &path).await?;

        *sets.get_mut(kind) = read_list(&path).await?;
        Ok(())
    }
}

async fn read_list(path: &Path) -> Result<BTreeSet<String>> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        tokio::fs::write(path, "[]").await?;
        return Ok(BTreeSet::new());
    }
    let data = tokio::fs::read_to_string(path).await?;
    let names: Vec<String> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(names.iter().map(|n| normalize(n)).collect())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn add_normalizes_and_dedupes() {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();

        let report = wl
            .add_many(ListKind::Public, &names(&["  Pikachu ", "pikachu", "Eevee"]))
            .await
            .unwrap();
        assert_eq!(report.added, vec!["pikachu", "eevee"]);
        assert_eq!(report.duplicates, vec!["pikachu"]);
        assert!(wl.contains(ListKind::Public, "PIKACHU").await);
        assert!(!wl.contains(ListKind::Private, "pikachu").await);
    }

    #[tokio::test]
    async fn remove_reports_missing() {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        wl.add_many(ListKind::Private, &names(&["mew"])).await.unwrap();

        let report = wl
            .remove_many(ListKind::Private, &names(&["mew", "mewtwo"]))
            .await
            .unwrap();
        assert_eq!(report.removed, vec!["mew"]);
        assert_eq!(report.missing, vec!["mewtwo"]);
        assert!(wl.is_empty(ListKind::Private).await);
    }

    #[tokio::test]
    async fn mutations_survive_reload() {
        let tmp = TempDir::new().unwrap();
        {
            let wl = Watchlist::load(tmp.path()).await.unwrap();
            wl.add_many(ListKind::Public, &names(&["charizard", "bulbasaur"]))
                .await
                .unwrap();
        }
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        assert_eq!(
            wl.snapshot(ListKind::Public).await,
            vec!["bulbasaur", "charizard"]
        );
    }

    #[tokio::test]
    async fn backup_kept_after_second_write() {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        wl.add_many(ListKind::Public, &names(&["a"])).await.unwrap();
        wl.add_many(ListKind::Public, &names(&["b"])).await.unwrap();
        assert!(tmp.path().join("watchlist_public.json.bak").exists());
    }

    #[tokio::test]
    async fn snapshot_is_sorted() {
        let tmp = TempDir::new().unwrap();
        let wl = Watchlist::load(tmp.path()).await.unwrap();
        wl.add_many(ListKind::Public, &names(&["zubat", "abra", "mew"]))
            .await
            .unwrap();
        assert_eq!(wl.snapshot(ListKind::Public).await, vec!["abra", "mew", "zubat"]);
    }

    #[test]
    fn alias_parsing() {
        assert_eq!(ListKind::parse_alias("PUB"), Some(ListKind::Public));
        assert_eq!(ListKind::parse_alias("pv"), Some(ListKind::Private));
        assert_eq!(ListKind::parse_alias("both"), None);
    }
}

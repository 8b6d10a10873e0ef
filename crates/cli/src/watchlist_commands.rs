use {
    clap::Subcommand,
    spawnlock_commands::{listing, watchlist_admin},
    spawnlock_gateway::SpawnGuard,
    spawnlock_locks::Actor,
};

/// Page size large enough to print any list in one page.
const ALL: usize = usize::MAX;

#[derive(Subcommand)]
pub enum WatchlistAction {
    /// Add comma-separated names to a list.
    Add { kind: String, names: Vec<String> },
    /// Remove comma-separated names from a list.
    Remove { kind: String, names: Vec<String> },
    /// Print one list, or both.
    List { kind: Option<String> },
    /// Search both lists.
    Search { term: Vec<String> },
}

pub async fn run(guard: &SpawnGuard, action: &WatchlistAction) {
    let operator = Actor::staff("cli");
    let reply = match action {
        WatchlistAction::Add { kind, names } => {
            watchlist_admin::add(guard.watchlist(), &operator, kind, &names.join(" ")).await
        },
        WatchlistAction::Remove { kind, names } => {
            watchlist_admin::remove(guard.watchlist(), &operator, kind, &names.join(" ")).await
        },
        WatchlistAction::List { kind } => {
            listing::list(guard.watchlist(), kind.as_deref(), ALL).await
        },
        WatchlistAction::Search { term } => {
            listing::search(guard.watchlist(), &term.join(" "), ALL).await
        },
    };
    println!("{}", reply.text);
}

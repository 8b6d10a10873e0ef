use {
    clap::Subcommand,
    spawnlock_commands::{lock_admin, locks_listing},
    spawnlock_gateway::SpawnGuard,
    spawnlock_locks::Actor,
};

/// Page size large enough to print any inventory in one page.
const ALL: usize = usize::MAX;

#[derive(Subcommand)]
pub enum LockAction {
    /// Print all locked channels.
    List,
    /// Spawns ranked by locked-channel count.
    Ranking,
    /// Release one channel by id.
    Unlock { channel_id: String },
    /// Release every channel locked for a spawn name.
    UnlockAll { name: Vec<String> },
}

pub async fn run(guard: &SpawnGuard, action: &LockAction) {
    let operator = Actor::staff("cli");
    let reply = match action {
        LockAction::List => locks_listing::locked(guard.locks().registry(), ALL),
        LockAction::Ranking => locks_listing::ranking(guard.locks().registry(), ALL),
        LockAction::Unlock { channel_id } => {
            lock_admin::unlock(guard.locks(), &operator, channel_id).await
        },
        LockAction::UnlockAll { name } => {
            lock_admin::unlock_all(guard.locks(), &operator, &name.join(" ")).await
        },
    };
    println!("{}", reply.text);
}

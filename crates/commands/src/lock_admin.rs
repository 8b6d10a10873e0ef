//! Manual lock, unlock, and mass-unlock commands.

use spawnlock_locks::{Actor, LockError, LockKind, LockService, TryLockOutcome};

use crate::CommandReply;

/// Place a manual lock on a channel, optionally labelled.
pub async fn lock(
    service: &LockService,
    actor: &Actor,
    channel_id: &str,
    label: Option<&str>,
) -> CommandReply {
    if !actor.manage_channels {
        return CommandReply::text("Locking a channel requires channel-management authority.");
    }
    let label = match label.map(str::trim) {
        Some(l) if !l.is_empty() => l,
        _ => "Manual",
    };

    match service.try_lock(channel_id, LockKind::Manual, label).await {
        Ok(TryLockOutcome::Locked) => {
            CommandReply::text(format!("Channel {channel_id} locked for \"{label}\"."))
        },
        Ok(TryLockOutcome::AlreadyLocked) => {
            CommandReply::text(format!("Channel {channel_id} is already locked."))
        },
        Ok(TryLockOutcome::Suppressed) => CommandReply::text(format!(
            "Channel {channel_id} was locked moments ago; try again shortly."
        )),
        Ok(TryLockOutcome::NoticePresent) => CommandReply::text(format!(
            "A lock notice is already posted in channel {channel_id}."
        )),
        Err(e) => CommandReply::text(format!("Could not lock channel {channel_id}: {e}")),
    }
}

/// Release one channel.
pub async fn unlock(service: &LockService, actor: &Actor, channel_id: &str) -> CommandReply {
    match service.unlock(channel_id, actor).await {
        Ok(record) => CommandReply::text(format!(
            "Channel {channel_id} unlocked (was \"{}\").",
            record.trigger
        )),
        Err(LockError::NotLocked { .. }) => {
            CommandReply::text(format!("Channel {channel_id} is not locked."))
        },
        Err(LockError::Unauthorized) => {
            CommandReply::text("You are not allowed to release this lock.")
        },
        Err(e) => CommandReply::text(format!("Could not unlock channel {channel_id}: {e}")),
    }
}

/// Release every channel locked for a spawn name.
pub async fn unlock_all(service: &LockService, actor: &Actor, name: &str) -> CommandReply {
    let name = name.trim();
    if name.is_empty() {
        return CommandReply::text("Usage: unlock all <name>");
    }

    match service.unlock_all_by_name(name, actor).await {
        Ok(report) if report.unlocked == 0 && report.failed == 0 => {
            CommandReply::text(format!("No channels are locked for \"{name}\"."))
        },
        Ok(report) => {
            let mut text = format!(
                "Unlocked {} channel(s) locked for \"{name}\".",
                report.unlocked
            );
            if report.failed > 0 {
                text.push_str(&format!(" {} channel(s) failed; see the logs.", report.failed));
            }
            CommandReply::text(text)
        },
        Err(LockError::Unauthorized) => {
            CommandReply::text("Mass unlock requires channel-management authority.")
        },
        Err(e) => CommandReply::text(format!("Mass unlock failed: {e}")),
    }
}

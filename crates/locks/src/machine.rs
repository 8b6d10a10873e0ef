//! The Unlocked/Locked transition logic.
//!
//! `try_lock` is "reserve, then act": the registry and cooldown checks plus
//! the cooldown arm all happen before the first await, so a second qualifying
//! message dispatched while the permission call is in flight sees the
//! reservation and backs off. The registry is only written after the
//! permission side effect is confirmed, keeping the invariant that a channel
//! is in the registry iff its send permission is revoked.

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use spawnlock_common::now_ms;

use crate::{
    audit::{AuditEvent, AuditSink},
    cooldown::Cooldowns,
    error::{LockError, Result},
    gate::{ChannelGate, Notice},
    registry::LockRegistry,
    types::{Actor, LockKind, LockRecord},
};

/// Tuning knobs for the state machine.
#[derive(Debug, Clone)]
pub struct LockTuning {
    /// Re-trigger suppression window.
    pub cooldown: Duration,
    /// Channels released per mass-unlock batch.
    pub batch_size: usize,
    /// Pause between mass-unlock batches.
    pub batch_pause: Duration,
    /// Role hidden while a private lock is in place.
    pub spawn_role_id: Option<String>,
}

impl Default for LockTuning {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(30),
            batch_size: 5,
            batch_pause: Duration::from_millis(2000),
            spawn_role_id: None,
        }
    }
}

/// Result of a lock attempt. Only `Locked` changed anything; the rest are
/// silent no-ops by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryLockOutcome {
    Locked,
    AlreadyLocked,
    /// The cooldown window is still running.
    Suppressed,
    /// A lock notice is already visible in recent history.
    NoticePresent,
}

/// Tally returned by a mass unlock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MassUnlockReport {
    pub unlocked: usize,
    pub failed: usize,
}

/// The lock state machine. All permission changes route through here.
pub struct LockService {
    registry: LockRegistry,
    cooldowns: Cooldowns,
    gate: Arc<dyn ChannelGate>,
    notice: Arc<dyn Notice>,
    audit: Arc<dyn AuditSink>,
    tuning: LockTuning,
}

impl LockService {
    #[must_use]
    pub fn new(
        registry: LockRegistry,
        gate: Arc<dyn ChannelGate>,
        notice: Arc<dyn Notice>,
        audit: Arc<dyn AuditSink>,
        tuning: LockTuning,
    ) -> Self {
        Self {
            registry,
            cooldowns: Cooldowns::new(tuning.cooldown),
            gate,
            notice,
            audit,
            tuning,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &LockRegistry {
        &self.registry
    }

    /// Attempt the Unlocked → Locked transition for a channel.
    pub async fn try_lock(
        &self,
        channel_id: &str,
        kind: LockKind,
        trigger: &str,
    ) -> Result<TryLockOutcome> {
        if self.registry.contains(channel_id) {
            return Ok(TryLockOutcome::AlreadyLocked);
        }
        if self.cooldowns.is_suppressed(channel_id) {
            return Ok(TryLockOutcome::Suppressed);
        }
        // Reservation: visible to concurrently dispatched handlers before we
        // yield for any I/O below.
        self.cooldowns.arm(channel_id);

        match self.notice.has_recent_notice(channel_id).await {
            Ok(true) => return Ok(TryLockOutcome::NoticePresent),
            Ok(false) => {},
            Err(e) => {
                warn!(channel = channel_id, error = %e, "recent-notice probe failed");
            },
        }

        self.gate
            .revoke_send(channel_id)
            .await
            .map_err(|e| LockError::side_effect("revoke send", e))?;

        if kind == LockKind::Private
            && let Some(role_id) = &self.tuning.spawn_role_id
            && let Err(e) = self.gate.set_visibility(channel_id, role_id, false).await
        {
            // Undo the revoke so registry and permission state stay coupled.
            if let Err(restore_err) = self.gate.restore_send(channel_id).await {
                warn!(channel = channel_id, error = %restore_err, "rollback restore failed");
            }
            return Err(LockError::side_effect("hide channel", e));
        }

        self.registry
            .insert(channel_id, LockRecord::new(kind, trigger, now_ms()))
            .await;

        match self.notice.post_lock_notice(channel_id, trigger, kind).await {
            Ok(message_id) => self.registry.set_notice(channel_id, &message_id).await,
            Err(e) => warn!(channel = channel_id, error = %e, "lock notice failed"),
        }

        self.audit
            .record(AuditEvent::Locked {
                channel_id: channel_id.to_string(),
                kind,
                trigger: trigger.to_string(),
            })
            .await;
        info!(channel = channel_id, kind = %kind, trigger, "channel locked");
        Ok(TryLockOutcome::Locked)
    }

    /// Locked → Unlocked. Returns the released record.
    pub async fn unlock(&self, channel_id: &str, actor: &Actor) -> Result<LockRecord> {
        let record = self
            .registry
            .get(channel_id)
            .ok_or_else(|| LockError::NotLocked {
                channel_id: channel_id.to_string(),
            })?;
        authorize(actor, record.kind)?;

        self.release(channel_id, &record).await?;
        self.audit
            .record(AuditEvent::Unlocked {
                channel_id: channel_id.to_string(),
                trigger: record.trigger.clone(),
                by: actor.user_id.clone(),
            })
            .await;
        info!(
            channel = channel_id,
            trigger = %record.trigger,
            by = %actor.user_id,
            "channel unlocked"
        );
        Ok(record)
    }

    /// Release every channel locked for exactly `trigger`, in batches, with a
    /// pause between batches for external rate limits. Per-channel failures
    /// are logged and do not abort the remainder.
    pub async fn unlock_all_by_name(
        &self,
        trigger: &str,
        actor: &Actor,
    ) -> Result<MassUnlockReport> {
        // Bulk release is destructive; management authority is required once
        // for the whole batch, which also covers any private locks inside it.
        if !actor.manage_channels {
            return Err(LockError::Unauthorized);
        }

        let wanted = trigger.trim().to_lowercase();
        let matches: Vec<String> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|(_, record)| record.trigger.to_lowercase() == wanted)
            .map(|(channel_id, _)| channel_id)
            .collect();

        let mut report = MassUnlockReport::default();
        let batch_size = self.tuning.batch_size.max(1);
        for (i, batch) in matches.chunks(batch_size).enumerate() {
            if i > 0 && !self.tuning.batch_pause.is_zero() {
                tokio::time::sleep(self.tuning.batch_pause).await;
            }
            for channel_id in batch {
                let Some(record) = self.registry.get(channel_id) else {
                    continue;
                };
                match self.release(channel_id, &record).await {
                    Ok(()) => report.unlocked += 1,
                    Err(e) => {
                        warn!(channel = %channel_id, error = %e, "mass unlock: channel failed");
                        report.failed += 1;
                    },
                }
            }
        }

        self.audit
            .record(AuditEvent::MassUnlocked {
                trigger: wanted.clone(),
                unlocked: report.unlocked,
                failed: report.failed,
                by: actor.user_id.clone(),
            })
            .await;
        info!(
            trigger = %wanted,
            unlocked = report.unlocked,
            failed = report.failed,
            by = %actor.user_id,
            "mass unlock finished"
        );
        Ok(report)
    }

    /// The shared Locked → Unlocked tail: permission restore first, registry
    /// removal only after it succeeded, then best-effort notice cleanup.
    async fn release(&self, channel_id: &str, record: &LockRecord) -> Result<()> {
        self.gate
            .restore_send(channel_id)
            .await
            .map_err(|e| LockError::side_effect("restore send", e))?;

        if record.kind == LockKind::Private
            && let Some(role_id) = &self.tuning.spawn_role_id
            && let Err(e) = self.gate.set_visibility(channel_id, role_id, true).await
        {
            warn!(channel = channel_id, error = %e, "failed to restore visibility");
        }

        self.registry.remove(channel_id).await;

        if let Some(message_id) = &record.notice_message_id {
            self.notice.delete_notice(channel_id, message_id).await;
        }
        Ok(())
    }
}

fn authorize(actor: &Actor, kind: LockKind) -> Result<()> {
    let allowed = match kind {
        LockKind::Private => actor.manage_channels,
        LockKind::Public | LockKind::Manual => actor.manage_channels || actor.spawn_access,
    };
    if allowed { Ok(()) } else { Err(LockError::Unauthorized) }
}

//! Audit trail for lock transitions.
//!
//! Every transition the state machine commits is reported here, whatever
//! entry point drove it (detector, button, command, CLI). A platform adapter
//! can forward events to a configured log channel; the built-in sink writes
//! structured logs.

use {async_trait::async_trait, tracing::info};

use crate::types::LockKind;

#[derive(Debug, Clone)]
pub enum AuditEvent {
    Locked {
        channel_id: String,
        kind: LockKind,
        trigger: String,
    },
    Unlocked {
        channel_id: String,
        trigger: String,
        by: String,
    },
    MassUnlocked {
        trigger: String,
        unlocked: usize,
        failed: usize,
        by: String,
    },
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent);
}

/// Default sink: the tracing pipeline.
pub struct TracingAudit;

#[async_trait]
impl AuditSink for TracingAudit {
    async fn record(&self, event: AuditEvent) {
        match event {
            AuditEvent::Locked {
                channel_id,
                kind,
                trigger,
            } => {
                info!(channel = %channel_id, kind = %kind, trigger = %trigger, "audit: lock");
            },
            AuditEvent::Unlocked {
                channel_id,
                trigger,
                by,
            } => {
                info!(channel = %channel_id, trigger = %trigger, by = %by, "audit: unlock");
            },
            AuditEvent::MassUnlocked {
                trigger,
                unlocked,
                failed,
                by,
            } => {
                info!(
                    trigger = %trigger,
                    unlocked,
                    failed,
                    by = %by,
                    "audit: mass unlock"
                );
            },
        }
    }
}

//! Channel lock state machine and its supporting state.
//!
//! A channel is Locked exactly when the registry holds a record for it; the
//! registry entry and the revoked send permission move together, and every
//! permission change routes through [`machine::LockService`] so the two can
//! never diverge.

pub mod audit;
pub mod cooldown;
pub mod error;
pub mod gate;
pub mod machine;
pub mod registry;
pub mod store;
pub mod store_file;
pub mod store_memory;
pub mod types;

pub use {
    audit::{AuditEvent, AuditSink, TracingAudit},
    cooldown::Cooldowns,
    error::LockError,
    gate::{ChannelGate, Notice},
    machine::{LockService, LockTuning, MassUnlockReport, TryLockOutcome},
    registry::LockRegistry,
    store::{LockSnapshot, LockStore},
    store_file::FileLockStore,
    store_memory::MemoryLockStore,
    types::{Actor, LockKind, LockRecord},
};

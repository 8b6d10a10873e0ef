//! Core data types for the lock state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a channel came to be locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockKind {
    /// Triggered by a public-list name; releasable by spawn-access holders.
    Public,
    /// Triggered by a private-list name; releasable only with management
    /// authority, and the channel is hidden from the spawn role meanwhile.
    Private,
    /// Placed by an operator command. Release rules match `Public`.
    Manual,
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// One locked channel. Presence of a record in the registry *is* the locked
/// state; there is no separate flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    pub kind: LockKind,
    /// The watched name (or operator-supplied label) that caused the lock.
    pub trigger: String,
    /// The bot's own lock notice, kept only so it can be deleted on release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_message_id: Option<String>,
    pub locked_at_ms: u64,
}

impl LockRecord {
    #[must_use]
    pub fn new(kind: LockKind, trigger: impl Into<String>, locked_at_ms: u64) -> Self {
        Self {
            kind,
            trigger: trigger.into(),
            notice_message_id: None,
            locked_at_ms,
        }
    }
}

/// The authority an acting user holds, resolved by the platform adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    /// Channel-management authority (staff).
    pub manage_channels: bool,
    /// Holds the spawn-access role.
    pub spawn_access: bool,
}

impl Actor {
    #[must_use]
    pub fn staff(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            manage_channels: true,
            spawn_access: true,
        }
    }

    #[must_use]
    pub fn member(user_id: impl Into<String>, spawn_access: bool) -> Self {
        Self {
            user_id: user_id.into(),
            manage_channels: false,
            spawn_access,
        }
    }
}

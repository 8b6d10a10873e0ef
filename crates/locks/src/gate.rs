//! Collaborator traits for the platform side effects a lock needs.
//!
//! The state machine never talks to the chat platform directly; an adapter
//! implements these traits and binds platform details (which bot's send
//! permission to flip, how notices are rendered).

use {anyhow::Result, async_trait::async_trait};

use crate::types::LockKind;

/// Permission side effects on a spawn channel.
#[async_trait]
pub trait ChannelGate: Send + Sync {
    /// Revoke the game bot's ability to post in the channel.
    async fn revoke_send(&self, channel_id: &str) -> Result<()>;

    /// Restore the game bot's ability to post in the channel.
    async fn restore_send(&self, channel_id: &str) -> Result<()>;

    /// Show or hide the channel for a role.
    async fn set_visibility(&self, channel_id: &str, role_id: &str, visible: bool) -> Result<()>;
}

/// Lock-notice side effects.
#[async_trait]
pub trait Notice: Send + Sync {
    /// Post the lock notice (with its unlock affordance) and return the
    /// posted message's id.
    async fn post_lock_notice(&self, channel_id: &str, trigger: &str, kind: LockKind)
    -> Result<String>;

    /// Best-effort deletion of a previously posted notice.
    async fn delete_notice(&self, channel_id: &str, message_id: &str);

    /// Whether one of our notices is already visible in the channel's recent
    /// history. Defensive double-check against dispatch races.
    async fn has_recent_notice(&self, channel_id: &str) -> Result<bool>;
}

/// Gate that performs nothing. Used by offline tooling.
pub struct NoopGate;

#[async_trait]
impl ChannelGate for NoopGate {
    async fn revoke_send(&self, _channel_id: &str) -> Result<()> {
        Ok(())
    }

    async fn restore_send(&self, _channel_id: &str) -> Result<()> {
        Ok(())
    }

    async fn set_visibility(&self, _channel_id: &str, _role_id: &str, _visible: bool) -> Result<()> {
        Ok(())
    }
}

/// Notice sink that performs nothing. Used by offline tooling.
pub struct NoopNotice;

#[async_trait]
impl Notice for NoopNotice {
    async fn post_lock_notice(
        &self,
        channel_id: &str,
        _trigger: &str,
        _kind: LockKind,
    ) -> Result<String> {
        Ok(format!("noop-{channel_id}"))
    }

    async fn delete_notice(&self, _channel_id: &str, _message_id: &str) {}

    async fn has_recent_notice(&self, _channel_id: &str) -> Result<bool> {
        Ok(false)
    }
}

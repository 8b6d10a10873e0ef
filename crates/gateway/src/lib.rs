//! The coordinating service tying the cores together.
//!
//! [`SpawnGuard`] owns the watchlist, the lock state machine, the pagination
//! sessions, and the per-guild settings, and exposes the three entry points a
//! platform adapter drives: inbound spawn messages, button presses, and
//! prefix commands.

pub mod dispatch;
pub mod service;
pub mod settings;

pub use {
    dispatch::{COMMAND_PREFIX, CommandContext},
    service::{ButtonPress, ButtonResponse, InboundMessage, SpawnGuard, SpawnOutcome},
    settings::{Settings, SettingsStore},
};

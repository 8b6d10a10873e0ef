//! Per-message pagination sessions with a uniform button protocol.
//!
//! Every list-style command shares one session manager. A session is keyed
//! by the rendered message's id, owned by the command author, navigated via
//! `{prefix}prev_page` / `{prefix}next_page` / `{prefix}close_list` buttons,
//! and expires on a fixed deadline after creation. The manager owns page
//! arithmetic, authorization, and lifecycle; rendering belongs to the
//! command that opened the session.

pub mod error;
pub mod manager;
pub mod session;

pub use {
    error::PageError,
    manager::{PageUpdate, SessionManager},
    session::{PageAction, PageRenderer, PageSpec, PageView, RenderedPage, button_id, parse_action},
};

//! Public/private watchlists of spawn names and the trigger matcher.
//!
//! The two lists control which detected names lock a channel; private
//! entries carry stronger unlock-authorization requirements. Matching is
//! whole-word and case-insensitive so an entry never fires inside a longer
//! name.

pub mod error;
pub mod matcher;
pub mod store;

pub use {
    error::{Error, Result},
    matcher::Detection,
    store::{AddReport, ListKind, RemoveReport, Watchlist},
};

//! Command handlers over the lock, watchlist, and pagination cores.
//!
//! Handlers are platform-agnostic: they return plain reply text, plus a
//! [`PageSpec`] when the reply should become a pagination session once the
//! platform has sent it and knows the rendered message's id.

pub mod help;
pub mod listing;
pub mod lock_admin;
pub mod locks_listing;
pub mod render;
pub mod status;
pub mod watchlist_admin;

use spawnlock_pagination::PageSpec;

/// What a command hands back to the dispatcher.
pub struct CommandReply {
    pub text: String,
    /// Present when the reply is the first page of a result set; the caller
    /// opens the session against the sent message's id.
    pub page: Option<PageSpec>,
}

impl CommandReply {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: None,
        }
    }

    /// A paginated reply: text is the rendered first page.
    #[must_use]
    pub fn paged(spec: PageSpec) -> Self {
        Self {
            text: spec.rendered(0).text,
            page: Some(spec),
        }
    }
}

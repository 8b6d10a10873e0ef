use std::time::{Duration, Instant};

use {dashmap::DashMap, tracing::debug};

use crate::{
    error::PageError,
    session::{PageAction, PageSpec, RenderedPage},
};

/// Outcome of a handled navigation event.
#[derive(Debug)]
pub enum PageUpdate {
    /// Re-render the message with this page.
    Page(RenderedPage),
    /// The session was closed; delete the rendered message (or strip its
    /// controls if deletion is not permitted).
    Closed,
}

struct PageSession {
    owner_user_id: String,
    spec: PageSpec,
    page: usize,
    expires_at: Instant,
}

/// All live pagination sessions, keyed by rendered-message id.
///
/// One session per rendered message; sessions for different messages never
/// collide. Expiry is a fixed deadline from creation, identical for every
/// command kind, evaluated lazily on access.
pub struct SessionManager {
    ttl: Duration,
    sessions: DashMap<String, PageSession>,
}

impl SessionManager {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: DashMap::new(),
        }
    }

    /// Register a session for a freshly sent message and return its first
    /// page.
    pub fn open(&self, message_id: &str, owner_user_id: &str, spec: PageSpec) -> RenderedPage {
        self.open_at(message_id, owner_user_id, spec, Instant::now())
    }

    pub fn open_at(
        &self,
        message_id: &str,
        owner_user_id: &str,
        spec: PageSpec,
        now: Instant,
    ) -> RenderedPage {
        let page = spec.rendered(0);
        self.sessions.insert(
            message_id.to_string(),
            PageSession {
                owner_user_id: owner_user_id.to_string(),
                spec,
                page: 0,
                expires_at: now + self.ttl,
            },
        );
        debug!(message = message_id, owner = owner_user_id, "pagination session opened");
        page
    }

    /// Process a button event against the session for `message_id`.
    pub fn handle(
        &self,
        message_id: &str,
        action: PageAction,
        acting_user_id: &str,
    ) -> Result<PageUpdate, PageError> {
        self.handle_at(message_id, action, acting_user_id, Instant::now())
    }

    pub fn handle_at(
        &self,
        message_id: &str,
        action: PageAction,
        acting_user_id: &str,
        now: Instant,
    ) -> Result<PageUpdate, PageError> {
        {
            let Some(session) = self.sessions.get(message_id) else {
                return Err(PageError::Expired);
            };
            if now >= session.expires_at {
                drop(session);
                self.sessions.remove(message_id);
                return Err(PageError::Expired);
            }
            if session.owner_user_id != acting_user_id {
                return Err(PageError::NotOwner);
            }
        }

        if action == PageAction::Close {
            self.sessions.remove(message_id);
            return Ok(PageUpdate::Closed);
        }

        let mut session = self.sessions.get_mut(message_id).ok_or(PageError::Expired)?;
        let total_pages = session.spec.total_pages();
        // Clamped navigation: a stale click past the boundary re-renders the
        // current page instead of erroring.
        session.page = match action {
            PageAction::Prev => session.page.saturating_sub(1),
            PageAction::Next => (session.page + 1).min(total_pages - 1),
            PageAction::Close => unreachable!("close handled above"),
        };
        Ok(PageUpdate::Page(session.spec.rendered(session.page)))
    }

    /// Drop every session past its deadline.
    pub fn evict_expired(&self) {
        self.evict_expired_at(Instant::now());
    }

    pub fn evict_expired_at(&self, now: Instant) {
        self.sessions.retain(|_, session| now < session.expires_at);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use {
        super::*,
        crate::session::{PageRenderer, PageView},
    };

    struct RowsRenderer;

    impl PageRenderer for RowsRenderer {
        fn render(&self, view: &PageView<'_>) -> String {
            view.rows.join(",")
        }
    }

    fn spec(rows: usize) -> PageSpec {
        PageSpec {
            rows: (0..rows).map(|i| format!("r{i}")).collect(),
            page_size: 5,
            prefix: "list_".into(),
            renderer: Arc::new(RowsRenderer),
        }
    }

    fn manager() -> SessionManager {
        SessionManager::new(Duration::from_secs(60))
    }

    fn page(update: PageUpdate) -> RenderedPage {
        match update {
            PageUpdate::Page(p) => p,
            PageUpdate::Closed => panic!("expected a page"),
        }
    }

    #[test]
    fn open_renders_first_page() {
        let mgr = manager();
        let first = mgr.open("m1", "alice", spec(47));
        assert_eq!(first.page, 0);
        assert_eq!(first.total_pages, 10);
        assert_eq!(first.text, "r0,r1,r2,r3,r4");
        assert!(!first.has_prev);
        assert!(first.has_next);
    }

    #[test]
    fn next_and_prev_navigate() {
        let mgr = manager();
        mgr.open("m1", "alice", spec(47));

        let p = page(mgr.handle("m1", PageAction::Next, "alice").unwrap());
        assert_eq!(p.page, 1);
        assert_eq!(p.text, "r5,r6,r7,r8,r9");

        let p = page(mgr.handle("m1", PageAction::Prev, "alice").unwrap());
        assert_eq!(p.page, 0);
    }

    #[test]
    fn navigation_is_clamped_at_boundaries() {
        let mgr = manager();
        mgr.open("m1", "alice", spec(47));

        let p = page(mgr.handle("m1", PageAction::Prev, "alice").unwrap());
        assert_eq!(p.page, 0);

        for _ in 0..20 {
            mgr.handle("m1", PageAction::Next, "alice").unwrap();
        }
        let p = page(mgr.handle("m1", PageAction::Next, "alice").unwrap());
        assert_eq!(p.page, 9);
    }

    #[test]
    fn unknown_message_is_expired() {
        let mgr = manager();
        assert_eq!(
            mgr.handle("ghost", PageAction::Next, "anyone").unwrap_err(),
            PageError::Expired
        );
    }

    #[test]
    fn only_the_owner_may_navigate() {
        let mgr = manager();
        mgr.open("m1", "alice", spec(47));
        assert_eq!(
            mgr.handle("m1", PageAction::Next, "bob").unwrap_err(),
            PageError::NotOwner
        );
        // No state change: alice still sees page 0 advance to 1.
        let p = page(mgr.handle("m1", PageAction::Next, "alice").unwrap());
        assert_eq!(p.page, 1);
    }

    #[test]
    fn close_removes_the_session() {
        let mgr = manager();
        mgr.open("m1", "alice", spec(47));
        assert!(matches!(
            mgr.handle("m1", PageAction::Close, "alice").unwrap(),
            PageUpdate::Closed
        ));
        assert_eq!(
            mgr.handle("m1", PageAction::Next, "alice").unwrap_err(),
            PageError::Expired
        );
    }

    #[test]
    fn sessions_expire_on_deadline() {
        let mgr = manager();
        let now = Instant::now();
        mgr.open_at("m1", "alice", spec(47), now);

        let later = now + Duration::from_secs(61);
        assert_eq!(
            mgr.handle_at("m1", PageAction::Next, "alice", later).unwrap_err(),
            PageError::Expired
        );
        assert!(mgr.is_empty());
    }

    #[test]
    fn expiry_applies_regardless_of_acting_user() {
        let mgr = manager();
        let now = Instant::now();
        mgr.open_at("m1", "alice", spec(47), now);

        let later = now + Duration::from_secs(120);
        assert_eq!(
            mgr.handle_at("m1", PageAction::Next, "bob", later).unwrap_err(),
            PageError::Expired
        );
    }

    #[test]
    fn concurrent_sessions_do_not_collide() {
        let mgr = manager();
        mgr.open("m1", "alice", spec(47));
        mgr.open("m2", "bob", spec(12));

        let p1 = page(mgr.handle("m1", PageAction::Next, "alice").unwrap());
        let p2 = page(mgr.handle("m2", PageAction::Next, "bob").unwrap());
        assert_eq!(p1.page, 1);
        assert_eq!(p2.page, 1);
        assert_eq!(p2.total_pages, 3);
    }

    #[test]
    fn evict_expired_sweeps_old_sessions() {
        let mgr = manager();
        let now = Instant::now();
        mgr.open_at("old", "alice", spec(5), now);
        mgr.open_at("new", "alice", spec(5), now + Duration::from_secs(30));

        mgr.evict_expired_at(now + Duration::from_secs(61));
        assert_eq!(mgr.len(), 1);
    }
}

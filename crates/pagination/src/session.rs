//! Page arithmetic, the button id protocol, and the render seam.

use std::sync::Arc;

/// Navigation events a pagination button can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Prev,
    Next,
    Close,
}

const PREV_SUFFIX: &str = "prev_page";
const NEXT_SUFFIX: &str = "next_page";
const CLOSE_SUFFIX: &str = "close_list";

/// Compose the custom id for a session's button.
#[must_use]
pub fn button_id(prefix: &str, action: PageAction) -> String {
    let suffix = match action {
        PageAction::Prev => PREV_SUFFIX,
        PageAction::Next => NEXT_SUFFIX,
        PageAction::Close => CLOSE_SUFFIX,
    };
    format!("{prefix}{suffix}")
}

/// Split a button custom id back into its prefix and action.
#[must_use]
pub fn parse_action(custom_id: &str) -> Option<(&str, PageAction)> {
    if let Some(prefix) = custom_id.strip_suffix(PREV_SUFFIX) {
        return Some((prefix, PageAction::Prev));
    }
    if let Some(prefix) = custom_id.strip_suffix(NEXT_SUFFIX) {
        return Some((prefix, PageAction::Next));
    }
    if let Some(prefix) = custom_id.strip_suffix(CLOSE_SUFFIX) {
        return Some((prefix, PageAction::Close));
    }
    None
}

/// The slice of a result set a renderer turns into message text.
pub struct PageView<'a> {
    pub rows: &'a [String],
    /// Index of `rows[0]` within the full result set, for absolute numbering.
    pub offset: usize,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// Per-command rendering of a page. The manager stays content-agnostic.
pub trait PageRenderer: Send + Sync {
    fn render(&self, view: &PageView<'_>) -> String;
}

/// A fully rendered page plus what the caller needs to build controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub text: String,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prefix: String,
}

/// Everything a command hands over when opening a session.
pub struct PageSpec {
    pub rows: Vec<String>,
    pub page_size: usize,
    pub prefix: String,
    pub renderer: Arc<dyn PageRenderer>,
}

impl PageSpec {
    #[must_use]
    pub fn total_pages(&self) -> usize {
        let size = self.page_size.max(1);
        self.rows.len().div_ceil(size).max(1)
    }

    /// Render one page deterministically from the stored rows.
    #[must_use]
    pub fn rendered(&self, page: usize) -> RenderedPage {
        let size = self.page_size.max(1);
        let total_pages = self.total_pages();
        let page = page.min(total_pages - 1);
        let start = page * size;
        let end = (start + size).min(self.rows.len());
        let view = PageView {
            rows: &self.rows[start.min(self.rows.len())..end],
            offset: start,
            page,
            total_pages,
            total_rows: self.rows.len(),
        };
        RenderedPage {
            text: self.renderer.render(&view),
            page,
            total_pages,
            has_prev: page > 0,
            has_next: page + 1 < total_pages,
            prefix: self.prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct JoinRenderer;

    impl PageRenderer for JoinRenderer {
        fn render(&self, view: &PageView<'_>) -> String {
            format!(
                "{} [{}/{}]",
                view.rows.join(","),
                view.page + 1,
                view.total_pages
            )
        }
    }

    fn spec(rows: usize, page_size: usize) -> PageSpec {
        PageSpec {
            rows: (0..rows).map(|i| format!("r{i}")).collect(),
            page_size,
            prefix: "list_".into(),
            renderer: Arc::new(JoinRenderer),
        }
    }

    #[test]
    fn forty_seven_rows_page_five_makes_ten_pages() {
        assert_eq!(spec(47, 5).total_pages(), 10);
    }

    #[test]
    fn empty_rows_still_have_one_page() {
        let page = spec(0, 5).rendered(0);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let page = spec(47, 5).rendered(9);
        assert_eq!(page.text, "r45,r46 [10/10]");
        assert!(page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn out_of_range_page_clamps() {
        let page = spec(47, 5).rendered(99);
        assert_eq!(page.page, 9);
    }

    #[test]
    fn button_id_roundtrip() {
        for action in [PageAction::Prev, PageAction::Next, PageAction::Close] {
            let id = button_id("locks_", action);
            assert_eq!(parse_action(&id), Some(("locks_", action)));
        }
    }

    #[test]
    fn parse_rejects_unknown_ids() {
        assert_eq!(parse_action("unlock_1234"), None);
        assert_eq!(parse_action("list_open"), None);
    }
}

//! Shared page renderers for the list-style commands.

use std::fmt::Write as _;

use spawnlock_pagination::{PageRenderer, PageView};

/// Numbered single-line rows under a title, with absolute numbering across
/// pages.
pub struct NumberedRows {
    pub title: String,
}

impl PageRenderer for NumberedRows {
    fn render(&self, view: &PageView<'_>) -> String {
        let mut out = format!("{} ({})\n", self.title, view.total_rows);
        for (i, row) in view.rows.iter().enumerate() {
            let _ = writeln!(out, "{}. {row}", view.offset + i + 1);
        }
        let _ = write!(out, "Page {} of {}", view.page + 1, view.total_pages);
        out
    }
}

/// Multi-line rows under a title, separated by blank lines.
pub struct BlockRows {
    pub title: String,
}

impl PageRenderer for BlockRows {
    fn render(&self, view: &PageView<'_>) -> String {
        let mut out = format!("{} ({})\n\n", self.title, view.total_rows);
        out.push_str(&view.rows.join("\n\n"));
        let _ = write!(out, "\n\nPage {} of {}", view.page + 1, view.total_pages);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_absolute_across_pages() {
        let renderer = NumberedRows {
            title: "Watched names".into(),
        };
        let rows = vec!["pichu (public)".to_string(), "mew (private)".to_string()];
        let text = renderer.render(&PageView {
            rows: &rows,
            offset: 25,
            page: 1,
            total_pages: 2,
            total_rows: 27,
        });
        assert!(text.starts_with("Watched names (27)\n"));
        assert!(text.contains("26. pichu (public)"));
        assert!(text.contains("27. mew (private)"));
        assert!(text.ends_with("Page 2 of 2"));
    }

    #[test]
    fn block_rows_are_blank_line_separated() {
        let renderer = BlockRows {
            title: "Locked channels".into(),
        };
        let rows = vec!["a\nb".to_string(), "c\nd".to_string()];
        let text = renderer.render(&PageView {
            rows: &rows,
            offset: 0,
            page: 0,
            total_pages: 1,
            total_rows: 2,
        });
        assert!(text.contains("a\nb\n\nc\nd"));
    }
}

//! Page arithmetic for the button paginator.
//!
//! The bot renders long lists (help entries, custom commands) as lines of
//! text; [`Pager`] splits them into pages and tracks the current one. Moving
//! past either end wraps around.

/// Splits `lines` into pages of `page_size` lines joined with newlines.
///
/// A `page_size` of zero is treated as one. An empty input yields no pages.
#[must_use]
pub fn chunk_lines<S: AsRef<str>>(lines: &[S], page_size: usize) -> Vec<String> {
    lines
        .chunks(page_size.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

/// A set of rendered pages and a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pages: Vec<String>,
    current: usize,
}

impl Pager {
    /// Builds a pager over `lines`; `empty_text` is shown when there are none.
    #[must_use]
    pub fn new<S: AsRef<str>>(lines: &[S], page_size: usize, empty_text: &str) -> Self {
        let mut pages = chunk_lines(lines, page_size);
        if pages.is_empty() {
            pages.push(empty_text.to_string());
        }
        Self { pages, current: 0 }
    }

    /// Number of pages, at least one
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the current page
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Whether navigation buttons are worth showing
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.pages.len() > 1
    }

    /// Text of the current page
    #[must_use]
    pub fn current(&self) -> &str {
        &self.pages[self.current]
    }

    /// Text of page `index`, clamped to the last page
    #[must_use]
    pub fn page(&self, index: usize) -> &str {
        &self.pages[index.min(self.pages.len() - 1)]
    }

    /// Moves to the next page, wrapping to the first.
    pub fn next(&mut self) -> &str {
        self.current = (self.current + 1) % self.pages.len();
        self.current()
    }

    /// Moves to the previous page, wrapping to the last.
    pub fn previous(&mut self) -> &str {
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.pages.len() - 1);
        self.current()
    }

    /// `Page x/y` footer text
    #[must_use]
    pub fn footer(&self) -> String {
        format!("Page {}/{}", self.current + 1, self.pages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_chunk_lines() {
        let pages = chunk_lines(&lines(5), 2);
        assert_eq!(pages, vec!["line 1\nline 2", "line 3\nline 4", "line 5"]);
        assert!(chunk_lines::<String>(&[], 3).is_empty());
        assert_eq!(chunk_lines(&lines(2), 0).len(), 2);
    }

    #[test]
    fn test_empty_pager_has_one_page() {
        let pager = Pager::new::<&str>(&[], 10, "Nothing here");
        assert_eq!(pager.page_count(), 1);
        assert!(!pager.is_paginated());
        assert_eq!(pager.current(), "Nothing here");
        assert_eq!(pager.footer(), "Page 1/1");
    }

    #[test]
    fn test_navigation_wraps() {
        let mut pager = Pager::new(&lines(7), 3, "");
        assert_eq!(pager.page_count(), 3);
        assert!(pager.is_paginated());

        assert_eq!(pager.previous(), "line 7");
        assert_eq!(pager.current_index(), 2);
        assert_eq!(pager.next(), "line 1\nline 2\nline 3");
        assert_eq!(pager.next(), "line 4\nline 5\nline 6");
        assert_eq!(pager.footer(), "Page 2/3");
        pager.next();
        pager.next();
        assert_eq!(pager.current_index(), 0);
    }

    #[test]
    fn test_page_is_clamped() {
        let pager = Pager::new(&lines(4), 2, "");
        assert_eq!(pager.page(1), "line 3\nline 4");
        assert_eq!(pager.page(99), "line 3\nline 4");
    }
}

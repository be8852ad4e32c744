//! Explicit pagination cursor, owned by the caller.

/// Position in the paginated feed.
///
/// `page` is the page the next fetch requests. After a fetch, the returned
/// cursor records that page and whether the server called it the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    is_last_page: bool,
}

impl PageCursor {
    pub fn first() -> Self {
        Self {
            page: 1,
            is_last_page: false,
        }
    }

    /// Cursor at `page`; pages below 1 are clamped to 1.
    pub fn at(page: u32) -> Self {
        Self {
            page: page.max(1),
            is_last_page: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    /// Record the server's answer for this page.
    pub fn with_last_page(self, is_last_page: bool) -> Self {
        Self { is_last_page, ..self }
    }

    /// The following page, or `None` once the last page was reached.
    pub fn next(&self) -> Option<Self> {
        if self.is_last_page {
            return None;
        }
        Some(Self::at(self.page.saturating_add(1)))
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_is_one() {
        assert_eq!(PageCursor::first().page(), 1);
        assert_eq!(PageCursor::at(0).page(), 1);
    }

    #[test]
    fn next_advances_until_last_page() {
        let cursor = PageCursor::first().with_last_page(false);
        let next = cursor.next().unwrap();
        assert_eq!(next.page(), 2);
        assert!(!next.is_last_page());

        let last = next.with_last_page(true);
        assert!(last.next().is_none());
    }
}

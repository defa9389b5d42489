//! Page arithmetic and boundary-aware navigation.

/// Number of pages for `total` items, never less than 1.
pub fn total_pages(total: u32, page_size: u32) -> u32 {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Navigation request from the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
    To(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: u32,
    total_pages: u32,
}

impl Paginator {
    pub fn new(page: u32, total_count: u32, page_size: u32) -> Self {
        Self::with_total_pages(page, total_pages(total_count, page_size))
    }

    pub fn with_total_pages(page: u32, total_pages: u32) -> Self {
        Self {
            page: page.max(1),
            total_pages: total_pages.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// `true` when the current page lies past the last page (the result set shrank).
    pub fn is_beyond_end(&self) -> bool {
        self.page > self.total_pages
    }

    pub fn next(&self) -> u32 {
        (self.page + 1).min(self.total_pages)
    }

    pub fn prev(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    /// Page the control leads to, or `None` when it is a no-op at a boundary.
    pub fn target(&self, nav: PageNav) -> Option<u32> {
        let target = match nav {
            PageNav::First => 1,
            PageNav::Prev => self.prev(),
            PageNav::Next => self.next(),
            PageNav::Last => self.total_pages,
            PageNav::To(page) => page.clamp(1, self.total_pages),
        };
        (target != self.page).then_some(target)
    }
}

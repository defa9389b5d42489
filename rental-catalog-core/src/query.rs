//! 查询参数状态（搜索文本 + 页码）

/// Parameters of one list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    /// 1-indexed.
    pub page: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: String::new(),
            page: 1,
        }
    }
}

/// Current query of a list, plus the page bound from the last result.
///
/// Every setter returns the new [`Query`] when something changed and `None`
/// otherwise; callers fetch only on `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    current: Query,
    total_pages: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            current: Query::default(),
            total_pages: 1,
        }
    }

    pub fn current(&self) -> &Query {
        &self.current
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// 设置搜索文本，页码重置为 1
    pub fn set_text(&mut self, text: impl Into<String>) -> Option<Query> {
        let next = Query {
            text: text.into(),
            page: 1,
        };
        self.replace(next)
    }

    /// 跳转到指定页（按已知总页数截断到 `[1, total_pages]`）
    pub fn set_page(&mut self, page: u32) -> Option<Query> {
        let next = Query {
            text: self.current.text.clone(),
            page: page.clamp(1, self.total_pages),
        };
        self.replace(next)
    }

    /// Record the page bound implied by the latest result. Never below 1.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
    }

    fn replace(&mut self, next: Query) -> Option<Query> {
        if next == self.current {
            return None;
        }
        self.current = next.clone();
        Some(next)
    }
}

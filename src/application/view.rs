use crate::domain::{
    categories, category_filter, user_text_filter, Item, PageQuery, Pagination, ResourceKind,
    SearchMode, ALL_CATEGORIES,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page, search text and category held by a list screen. The store never
/// sees this struct; it only receives the `PageQuery` derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    kind: ResourceKind,
    page: u32,
    page_size: u32,
    search: String,
    category: String,
}

impl ListView {
    pub fn new(kind: ResourceKind, page_size: u32) -> Self {
        Self {
            kind,
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size).with_search(self.search.clone())
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination::new(self.page, self.page_size, total)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.search {
            self.search = text;
            self.page = 1;
        }
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if category != self.category {
            self.category = category;
            self.page = 1;
        }
    }

    /// Jump straight to a page; 0 is clamped to 1.
    pub fn go_to(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self, total: u64) -> bool {
        if self.pagination(total).has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Items of the current page after the display filters are applied.
    pub fn visible<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        match self.kind {
            ResourceKind::Product => category_filter(items, &self.category),
            ResourceKind::User => {
                if self.kind.search_mode() == SearchMode::Display && !self.search.trim().is_empty() {
                    user_text_filter(items, &self.search)
                } else {
                    items.iter().collect()
                }
            }
        }
    }

    pub fn categories(&self, items: &[Item]) -> Vec<String> {
        categories(items)
    }
}

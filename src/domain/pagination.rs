use super::Item;

pub const ALL_CATEGORIES: &str = "All";

/// Page arithmetic over a server-reported total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// True when the current page lies past the last page the total allows.
    pub fn out_of_range(&self) -> bool {
        u64::from(self.page) > self.total_pages()
    }
}

/// Distinct categories of the given items in first-seen order, prefixed by
/// `"All"`.
pub fn categories(items: &[Item]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for category in items.iter().filter_map(Item::category) {
        if !out.iter().any(|c| c == category) {
            out.push(category.to_string());
        }
    }
    out
}

/// Narrows already-fetched items to one category. `"All"` keeps everything.
pub fn category_filter<'a>(items: &'a [Item], category: &str) -> Vec<&'a Item> {
    if category == ALL_CATEGORIES {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.category() == Some(category))
        .collect()
}

/// Case-insensitive match of `text` against `"{firstName} {lastName} {email}"`.
pub fn user_text_filter<'a>(items: &'a [Item], text: &str) -> Vec<&'a Item> {
    let needle = text.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            let haystack = format!(
                "{} {} {}",
                item.str_field("firstName").unwrap_or_default(),
                item.str_field("lastName").unwrap_or_default(),
                item.str_field("email").unwrap_or_default(),
            )
            .to_lowercase();
            haystack.contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: u64, category: &str) -> Item {
        Item::try_from(json!({ "id": id, "category": category })).unwrap()
    }

    #[test]
    fn thirty_items_make_three_pages_of_ten() {
        let first = Pagination::new(1, 10, 30);
        assert_eq!(first.total_pages(), 3);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let last = Pagination::new(3, 10, 30);
        assert!(last.has_prev());
        assert!(!last.has_next());
        assert!(!last.out_of_range());
    }

    #[test]
    fn partial_last_page_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 31).total_pages(), 4);
        assert_eq!(Pagination::new(1, 10, 0).total_pages(), 0);
    }

    #[test]
    fn page_past_the_total_is_out_of_range() {
        let p = Pagination::new(4, 10, 30);
        assert!(p.out_of_range());
        assert!(!p.has_next());
    }

    #[test]
    fn categories_come_from_the_current_page() {
        let items = vec![
            product(1, "beauty"),
            product(2, "groceries"),
            product(3, "beauty"),
        ];
        assert_eq!(categories(&items), vec!["All", "beauty", "groceries"]);
    }

    #[test]
    fn category_filter_narrows_the_page() {
        let items = vec![product(1, "beauty"), product(2, "groceries")];
        assert_eq!(category_filter(&items, "All").len(), 2);

        let beauty = category_filter(&items, "beauty");
        assert_eq!(beauty.len(), 1);
        assert_eq!(beauty[0].id().as_deref(), Some("1"));

        assert!(category_filter(&items, "furniture").is_empty());
    }

    #[test]
    fn user_filter_matches_name_and_email() {
        let items = vec![
            Item::try_from(json!({ "id": 1, "firstName": "Emily", "lastName": "Johnson", "email": "emily.johnson@x.dummyjson.com" })).unwrap(),
            Item::try_from(json!({ "id": 2, "firstName": "Michael", "lastName": "Williams", "email": "michael.williams@x.dummyjson.com" })).unwrap(),
        ];

        assert_eq!(user_text_filter(&items, "emily johnson").len(), 1);
        assert_eq!(user_text_filter(&items, "WILLIAMS").len(), 1);
        assert_eq!(user_text_filter(&items, "dummyjson").len(), 2);
        assert!(user_text_filter(&items, "nobody").is_empty());
    }
}

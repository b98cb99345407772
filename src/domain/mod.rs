use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod pagination;

pub use pagination::{categories, category_filter, user_text_filter, Pagination, ALL_CATEGORIES};

/// The two resource kinds served by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Product,
    User,
}

/// How a kind treats non-empty search text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Sent to the remote search operation.
    Remote,
    /// Not sent to the remote; the view narrows the current page.
    Display,
}

impl ResourceKind {
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Product => "products",
            ResourceKind::User => "users",
        }
    }

    /// JSON key holding the items of a listing response.
    pub fn collection_key(&self) -> &'static str {
        self.path()
    }

    pub fn search_mode(&self) -> SearchMode {
        match self {
            ResourceKind::Product => SearchMode::Remote,
            ResourceKind::User => SearchMode::Display,
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            ResourceKind::Product => "Failed to fetch products",
            ResourceKind::User => "Failed to fetch users",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Product => "product",
            ResourceKind::User => "user",
        };
        f.write_str(name)
    }
}

/// An open record as returned by the remote. Only a handful of fields are
/// ever read; everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(pub Map<String, Value>);

impl Item {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// The `id` field rendered as a string, whether the remote sent a number
    /// or a string.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl TryFrom<Value> for Item {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Item(map)),
            other => Err(DomainError::Parse(format!("expected a record, got {}", other))),
        }
    }
}

/// One page of a listing as reported by the remote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Item>,
    /// Server-reported count for the whole query, not the page size.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            search: String::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page == 0 {
            return Err(DomainError::InvalidQuery("page must be >= 1".to_string()));
        }
        if self.page_size == 0 {
            return Err(DomainError::InvalidQuery("page size must be >= 1".to_string()));
        }
        Ok(())
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// The search text exactly as entered. Only the empty string means
    /// "no search"; whitespace is passed through like any other text.
    pub fn search_text(&self) -> Option<&str> {
        (!self.search.is_empty()).then_some(self.search.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    Parse(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

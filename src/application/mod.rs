use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    domain::{DomainError, Item, PageQuery, ResourceKind},
    ports::{ResourceProvider, SessionProvider},
};

pub mod session;
pub mod store;
pub mod view;

pub use session::{Session, SessionStore};
pub use store::{FetchOutcome, ResourceStore, StoreState};
pub use view::{ListView, DEFAULT_PAGE_SIZE};

/// One store per resource kind plus the session. Stores are independent of
/// each other.
pub struct CatalogService {
    provider: Arc<dyn ResourceProvider>,
    products: ResourceStore,
    users: ResourceStore,
    session: SessionStore,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn ResourceProvider>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            products: ResourceStore::new(ResourceKind::Product, provider.clone()),
            users: ResourceStore::new(ResourceKind::User, provider.clone()),
            session: SessionStore::new(sessions),
            provider,
        }
    }

    pub fn products(&self) -> &ResourceStore {
        &self.products
    }

    pub fn users(&self) -> &ResourceStore {
        &self.users
    }

    pub fn store(&self, kind: ResourceKind) -> &ResourceStore {
        match kind {
            ResourceKind::Product => &self.products,
            ResourceKind::User => &self.users,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get(&self, kind: ResourceKind, id: &str) -> Result<Item, DomainError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidQuery(format!("{} id must not be empty", kind)));
        }
        tracing::debug!(%kind, id, "fetching detail");
        self.provider.get(kind, id).await
    }

    /// Login-gated product listing. Refuses without an active session and
    /// issues no request in that case.
    pub async fn dashboard(
        &self,
        query: &PageQuery,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome, DomainError> {
        let session = self.session.require_active(now)?;
        tracing::debug!(user = %session.display_name(), "opening dashboard");
        self.products.fetch(query).await
    }

    /// One-item product listing straight through the provider, so the caller
    /// sees the underlying error rather than the store's generic message.
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.provider
            .list(ResourceKind::Product, 1, 0)
            .await
            .map(|_| ())
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }
}

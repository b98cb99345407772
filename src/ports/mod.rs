use crate::domain::{DomainError, Item, Page, ResourceKind};
use async_trait::async_trait;

#[async_trait]
pub trait ResourceProvider: Send + Sync {
    async fn list(&self, kind: ResourceKind, limit: u64, skip: u64) -> Result<Page, DomainError>;
    async fn search(
        &self,
        kind: ResourceKind,
        query: &str,
        limit: u64,
        skip: u64,
    ) -> Result<Page, DomainError>;
    async fn get(&self, kind: ResourceKind, id: &str) -> Result<Item, DomainError>;
    fn provider_name(&self) -> &'static str;
}

/// Raw result of a successful login call.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: Option<String>,
    pub profile: Item,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn login(
        &self,
        username: &str,
        password: &str,
        expires_in_mins: u32,
    ) -> Result<LoginResponse, DomainError>;
}

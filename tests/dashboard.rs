//! The login-gated product dashboard.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;

use dummyshop::application::{CatalogService, FetchOutcome};
use dummyshop::domain::{DomainError, Item, Page, PageQuery, ResourceKind};
use dummyshop::ports::{LoginResponse, ResourceProvider, SessionProvider};

#[derive(Default)]
struct CountingCatalog {
    listings: AtomicUsize,
}

#[async_trait]
impl ResourceProvider for CountingCatalog {
    async fn list(&self, _kind: ResourceKind, limit: u64, _skip: u64) -> Result<Page, DomainError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        let items = (1..=limit.min(30))
            .map(|id| {
                Item::try_from(json!({
                    "id": id,
                    "title": format!("Product {}", id),
                    "description": "A product",
                    "price": 10
                }))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { items, total: 30 })
    }

    async fn search(
        &self,
        kind: ResourceKind,
        _query: &str,
        limit: u64,
        skip: u64,
    ) -> Result<Page, DomainError> {
        self.list(kind, limit, skip).await
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> Result<Item, DomainError> {
        Err(DomainError::ResourceNotFound(format!("{} {}", kind, id)))
    }

    fn provider_name(&self) -> &'static str {
        "counting"
    }
}

struct FixedLogin;

#[async_trait]
impl SessionProvider for FixedLogin {
    async fn login(
        &self,
        username: &str,
        password: &str,
        _expires_in_mins: u32,
    ) -> Result<LoginResponse, DomainError> {
        if password != "emilyspass" {
            return Err(DomainError::Authentication("Invalid credentials".to_string()));
        }
        Ok(LoginResponse {
            token: "token-1".to_string(),
            refresh_token: None,
            profile: Item::try_from(json!({ "username": username, "firstName": "Emily" }))?,
        })
    }
}

fn service() -> (Arc<CountingCatalog>, CatalogService) {
    let catalog = Arc::new(CountingCatalog::default());
    let service = CatalogService::new(catalog.clone(), Arc::new(FixedLogin));
    (catalog, service)
}

#[tokio::test]
async fn refuses_without_a_session_and_sends_nothing() {
    let (catalog, service) = service();

    let err = service
        .dashboard(&PageQuery::new(1, 10), chrono::Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Authentication(_)));
    assert_eq!(catalog.listings.load(Ordering::SeqCst), 0);
    assert_eq!(service.products().snapshot().total, 0);
}

#[tokio::test]
async fn refuses_once_the_session_has_expired() {
    let (catalog, service) = service();
    let session = service.session().login("emilys", "emilyspass").await.unwrap();

    let err = service
        .dashboard(&PageQuery::new(1, 10), session.expires_at + Duration::seconds(1))
        .await
        .unwrap_err();

    match err {
        DomainError::Authentication(message) => assert_eq!(message, "session expired"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(catalog.listings.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn refuses_after_logout() {
    let (catalog, service) = service();
    service.session().login("emilys", "emilyspass").await.unwrap();
    service.session().logout();

    let err = service
        .dashboard(&PageQuery::new(1, 10), chrono::Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Authentication(_)));
    assert_eq!(catalog.listings.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_login_leaves_the_dashboard_closed() {
    let (_, service) = service();
    assert!(service.session().login("emilys", "nope").await.is_err());
    assert!(service.session().current().is_none());

    let err = service
        .dashboard(&PageQuery::new(1, 10), chrono::Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Authentication(_)));
}

#[tokio::test]
async fn lists_products_for_an_active_session() {
    let (catalog, service) = service();
    let session = service.session().login("emilys", "emilyspass").await.unwrap();

    let outcome = service
        .dashboard(&PageQuery::new(1, 10), session.logged_in_at)
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(catalog.listings.load(Ordering::SeqCst), 1);
    let state = service.products().snapshot();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.total, 30);
    assert_eq!(state.items[0].str_field("description"), Some("A product"));
}

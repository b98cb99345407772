use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    domain::{DomainError, Item, PageQuery, ResourceKind, SearchMode},
    ports::ResourceProvider,
};

/// Observable state of one resource store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Current page only; replaced wholesale on every successful fetch.
    pub items: Vec<Item>,
    /// Server-reported count for the last applied query.
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

/// What happened to the response of a single `fetch` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch was issued before this one resolved; its response was
    /// dropped.
    Stale,
}

/// Holds the last fetched page for one resource kind.
///
/// Every `fetch` takes a fresh request id from a monotonically increasing
/// counter. A response is written to the state only while its id is still
/// the latest one issued, so an older request resolving late can never
/// overwrite a newer one. Start and completion are both applied under the
/// watch channel's lock, which keeps `loading` consistent with the latest
/// outstanding request.
pub struct ResourceStore {
    kind: ResourceKind,
    provider: Arc<dyn ResourceProvider>,
    state: watch::Sender<StoreState>,
    generation: AtomicU64,
}

impl ResourceStore {
    pub fn new(kind: ResourceKind, provider: Arc<dyn ResourceProvider>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            kind,
            provider,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub async fn fetch(&self, query: &PageQuery) -> Result<FetchOutcome, DomainError> {
        query.validate()?;

        let mut request_id = 0;
        self.state.send_modify(|state| {
            request_id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
        });

        let limit = query.limit();
        let skip = query.skip();
        let result = match (query.search_text(), self.kind.search_mode()) {
            (Some(text), SearchMode::Remote) => {
                tracing::debug!(kind = %self.kind, request_id, text, limit, skip, "searching");
                self.provider.search(self.kind, text, limit, skip).await
            }
            _ => {
                tracing::debug!(kind = %self.kind, request_id, limit, skip, "listing");
                self.provider.list(self.kind, limit, skip).await
            }
        };

        let mut outcome = FetchOutcome::Stale;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != request_id {
                return false;
            }
            match result {
                Ok(mut page) => {
                    let max = usize::try_from(limit).unwrap_or(usize::MAX);
                    if page.items.len() > max {
                        tracing::warn!(
                            kind = %self.kind,
                            received = page.items.len(),
                            limit,
                            "remote returned an oversized page, truncating"
                        );
                        page.items.truncate(max);
                    }
                    state.items = page.items;
                    state.total = page.total;
                    outcome = FetchOutcome::Applied;
                }
                Err(e) => {
                    tracing::warn!(kind = %self.kind, request_id, "fetch failed: {}", e);
                    state.error = Some(self.kind.failure_message().to_string());
                    outcome = FetchOutcome::Failed;
                }
            }
            state.loading = false;
            true
        });

        if outcome == FetchOutcome::Stale {
            tracing::debug!(kind = %self.kind, request_id, "discarding stale response");
        }

        Ok(outcome)
    }
}

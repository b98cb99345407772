use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::{
    domain::{DomainError, Item},
    ports::SessionProvider,
};

pub const SESSION_LIFETIME_MINS: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub refresh_token: Option<String>,
    pub profile: Item,
    pub logged_in_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn display_name(&self) -> String {
        let first = self.profile.str_field("firstName").unwrap_or_default();
        let last = self.profile.str_field("lastName").unwrap_or_default();
        let name = format!("{} {}", first, last).trim().to_string();
        if name.is_empty() {
            self.profile
                .str_field("username")
                .unwrap_or("unknown")
                .to_string()
        } else {
            name
        }
    }
}

/// In-memory holder of the current login. Nothing is persisted.
pub struct SessionStore {
    provider: Arc<dyn SessionProvider>,
    state: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        let (state, _) = watch::channel(None);
        Self { provider, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Authentication(
                "username and password are required".to_string(),
            ));
        }

        let response = self
            .provider
            .login(username, password, SESSION_LIFETIME_MINS)
            .await?;

        let logged_in_at = Utc::now();
        let session = Session {
            token: response.token,
            refresh_token: response.refresh_token,
            profile: response.profile,
            logged_in_at,
            expires_at: logged_in_at + Duration::minutes(i64::from(SESSION_LIFETIME_MINS)),
        };

        tracing::info!(user = %session.display_name(), "logged in");
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// The current session, provided one exists and has not expired at `now`.
    pub fn require_active(&self, now: DateTime<Utc>) -> Result<Session, DomainError> {
        match self.current() {
            None => Err(DomainError::Authentication("not logged in".to_string())),
            Some(session) if session.is_expired(now) => {
                tracing::info!(user = %session.display_name(), "session expired");
                Err(DomainError::Authentication("session expired".to_string()))
            }
            Some(session) => Ok(session),
        }
    }

    pub fn logout(&self) {
        if self.state.send_replace(None).is_some() {
            tracing::info!("logged out");
        }
    }
}

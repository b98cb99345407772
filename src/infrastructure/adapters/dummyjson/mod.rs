use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{DomainError, Item, Page, ResourceKind},
    ports::{LoginResponse, ResourceProvider, SessionProvider},
};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(rename = "expiresInMins")]
    expires_in_mins: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct DummyJsonAdapter {
    client: reqwest::Client,
    base_url: Url,
}

impl DummyJsonAdapter {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DomainError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::Network(e.to_string()))?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim())
            .map_err(|e| DomainError::Configuration(format!("base url {:?}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::Configuration(format!(
                "base url {:?} cannot carry a path",
                raw
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends each segment to the base path. Segments are percent-encoded,
    /// so `/`, `?` and `#` inside one stay inside it.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(DomainError::InvalidQuery(format!(
                "{:?} is not a valid path segment",
                bad
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::Configuration(format!("base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url, query: &[(&str, String)]) -> Result<Value, DomainError> {
        tracing::debug!(%url, ?query, "GET");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Server {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DomainError::Parse(e.to_string()))
    }

    /// Pulls `{ <collection>: [...], total: N }` out of a listing body.
    fn parse_page(kind: ResourceKind, body: Value) -> Result<Page, DomainError> {
        let mut map: Map<String, Value> = match body {
            Value::Object(map) => map,
            other => {
                return Err(DomainError::Parse(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };

        let items = match map.remove(kind.collection_key()) {
            Some(Value::Array(values)) => values
                .into_iter()
                .map(Item::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(DomainError::Parse(format!(
                    "missing `{}` array",
                    kind.collection_key()
                )))
            }
        };

        let total = map
            .get("total")
            .and_then(Value::as_u64)
            .ok_or_else(|| DomainError::Parse("missing `total` count".to_string()))?;

        Ok(Page { items, total })
    }
}

#[async_trait]
impl ResourceProvider for DummyJsonAdapter {
    async fn list(&self, kind: ResourceKind, limit: u64, skip: u64) -> Result<Page, DomainError> {
        let url = self.endpoint(&[kind.path()])?;
        let body = self
            .get_json(url, &[("limit", limit.to_string()), ("skip", skip.to_string())])
            .await?;
        Self::parse_page(kind, body)
    }

    async fn search(
        &self,
        kind: ResourceKind,
        query: &str,
        limit: u64,
        skip: u64,
    ) -> Result<Page, DomainError> {
        let url = self.endpoint(&[kind.path(), "search"])?;
        let body = self
            .get_json(
                url,
                &[
                    ("q", query.to_string()),
                    ("limit", limit.to_string()),
                    ("skip", skip.to_string()),
                ],
            )
            .await?;
        Self::parse_page(kind, body)
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> Result<Item, DomainError> {
        let url = self.endpoint(&[kind.path(), id])?;
        match self.get_json(url, &[]).await {
            Ok(body) => Item::try_from(body),
            Err(DomainError::Server { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(DomainError::ResourceNotFound(format!("{} {}", kind, id)))
            }
            Err(e) => Err(e),
        }
    }

    fn provider_name(&self) -> &'static str {
        "DummyJSON"
    }
}

#[async_trait]
impl SessionProvider for DummyJsonAdapter {
    async fn login(
        &self,
        username: &str,
        password: &str,
        expires_in_mins: u32,
    ) -> Result<LoginResponse, DomainError> {
        let request = LoginRequest {
            username,
            password,
            expires_in_mins,
        };

        let response = self
            .client
            .post(self.endpoint(&["auth", "login"])?)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Login failed".to_string());
            return Err(DomainError::Authentication(message));
        }

        let mut profile: Map<String, Value> = response
            .json()
            .await
            .map_err(|e| DomainError::Parse(e.to_string()))?;

        // Newer API versions name it `accessToken`, older ones `token`.
        let token = ["accessToken", "token"]
            .iter()
            .find_map(|key| match profile.remove(*key) {
                Some(Value::String(token)) => Some(token),
                _ => None,
            })
            .ok_or_else(|| DomainError::Parse("login response carries no token".to_string()))?;

        let refresh_token = match profile.remove("refreshToken") {
            Some(Value::String(token)) => Some(token),
            _ => None,
        };

        Ok(LoginResponse {
            token,
            refresh_token,
            profile: Item(profile),
        })
    }
}

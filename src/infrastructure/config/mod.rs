use anyhow::{bail, Context, Result};
use std::env;

use crate::{application::DEFAULT_PAGE_SIZE, infrastructure::adapters::dummyjson::DEFAULT_BASE_URL};

pub const BASE_URL_VAR: &str = "DUMMYJSON_BASE_URL";
pub const PAGE_SIZE_VAR: &str = "DUMMYSHOP_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(PAGE_SIZE_VAR) {
            let size: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer, got {:?}", PAGE_SIZE_VAR, raw))?;
            if size == 0 {
                bail!("{} must be >= 1", PAGE_SIZE_VAR);
            }
            config.page_size = size;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.base_url, "https://dummyjson.com");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost:8080"),
            (PAGE_SIZE_VAR, "25"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn rejects_bad_page_size() {
        assert!(AppConfig::from_lookup(lookup(&[(PAGE_SIZE_VAR, "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(PAGE_SIZE_VAR, "ten")])).is_err());
    }
}

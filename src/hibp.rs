//! Have I Been Pwned API client

use crate::breach::{Breach, BreachLookup, BreachQuery, Paste};
use crate::config::HibpConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

const API_KEY_HEADER: &str = "hibp-api-key";

/// [`BreachLookup`] over the HIBP v3 REST API.
///
/// A 404 answer means the account is unknown to the service and maps
/// to an empty list.
#[derive(Debug, Clone)]
pub struct HibpClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HibpClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &HibpConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid breach service URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid breach service URL {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// `{base}/{endpoint}/{account}` with the account percent-encoded
    /// as a single path segment.
    fn endpoint(&self, endpoint: &str, account: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint).push(account);
        }
        url
    }

    fn breaches_url(&self, email: &str, query: &BreachQuery) -> Url {
        let mut url = self.endpoint("breachedaccount", email);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("truncateResponse", bool_param(query.truncate));
            pairs.append_pair("includeUnverified", bool_param(query.include_unverified));
            if let Some(domain) = query.domain.as_deref().filter(|d| !d.is_empty()) {
                pairs.append_pair("domain", domain);
            }
        }
        url
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();

        match status {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok());
                Err(Error::RateLimited { retry_after_secs })
            }
            StatusCode::UNAUTHORIZED => Err(Error::Lookup(
                "unauthorized, missing or invalid API key".to_string(),
            )),
            s if s.is_success() => {
                let body = response.text().await?;
                if body.trim().is_empty() {
                    return Ok(Vec::new());
                }
                Ok(serde_json::from_str(&body)?)
            }
            s => Err(Error::Lookup(format!("HTTP {s}"))),
        }
    }
}

const fn bool_param(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[async_trait]
impl BreachLookup for HibpClient {
    async fn lookup_breaches(&self, email: &str, query: &BreachQuery) -> Result<Vec<Breach>> {
        self.get_list(self.breaches_url(email, query)).await
    }

    async fn lookup_pastes(&self, email: &str) -> Result<Vec<Paste>> {
        self.get_list(self.endpoint("pasteaccount", email)).await
    }
}

//! HTTP client for the shopping-search provider (`SerpApi`, `google_shopping`).
//!
//! Locale parameters and the API key are fixed per client; each call only
//! carries the query, an optional location and an optional `tbs` token.
//! Provider-level failures (an `"error"` field in the body) surface as
//! [`ShoppingError::Api`] regardless of the HTTP status they came with.

use std::time::Duration;

use impact_core::SearchLocale;
use reqwest::{Client, Url};

use crate::error::ShoppingError;
use crate::query::SearchRequest;
use crate::types::ShoppingSearchResponse;

const DEFAULT_BASE_URL: &str = "https://serpapi.com/";
const SEARCH_PATH: &str = "search.json";
const ENGINE: &str = "google_shopping";

/// Client for the shopping-search endpoint.
///
/// Use [`ShoppingClient::new`] for production or
/// [`ShoppingClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct ShoppingClient {
    client: Client,
    api_key: String,
    base_url: Url,
    locale: SearchLocale,
}

impl ShoppingClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        locale: SearchLocale,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ShoppingError> {
        Self::with_base_url(api_key, locale, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ShoppingError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        locale: SearchLocale,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ShoppingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ShoppingError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            locale,
        })
    }

    /// Runs one shopping search.
    ///
    /// # Errors
    ///
    /// - [`ShoppingError::Api`] if the provider reports an error.
    /// - [`ShoppingError::UnexpectedStatus`] for a non-2xx status without one.
    /// - [`ShoppingError::Http`] on network failure or timeout.
    /// - [`ShoppingError::Deserialize`] if a 2xx body is not the expected shape.
    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<ShoppingSearchResponse, ShoppingError> {
        let url = self.build_url(request)?;
        tracing::debug!(query = %request.query, tbs = ?request.tbs, "shopping search");

        // The URL carries the API key; keep it out of error messages.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        let parsed = serde_json::from_str::<ShoppingSearchResponse>(&body);
        match parsed {
            Ok(ShoppingSearchResponse {
                error: Some(message),
                ..
            }) => Err(ShoppingError::Api(message)),
            Ok(_) | Err(_) if !status.is_success() => Err(ShoppingError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_key(&url),
            }),
            Ok(payload) => Ok(payload),
            Err(source) => Err(ShoppingError::Deserialize {
                context: format!("search(q={})", request.query),
                source,
            }),
        }
    }

    /// Full request URL with percent-encoded query parameters.
    fn build_url(&self, request: &SearchRequest) -> Result<Url, ShoppingError> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| ShoppingError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("engine", ENGINE);
            pairs.append_pair("q", &request.query);
            pairs.append_pair("google_domain", &self.locale.domain);
            pairs.append_pair("gl", &self.locale.country);
            pairs.append_pair("hl", &self.locale.language);
            pairs.append_pair("num", &self.locale.num_results.to_string());
            if let Some(location) = &request.location {
                pairs.append_pair("location", location);
            }
            if let Some(tbs) = &request.tbs {
                pairs.append_pair("tbs", tbs);
            }
            pairs.append_pair("api_key", &self.api_key);
        }
        Ok(url)
    }
}

/// URL text safe for logs and error messages.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" { "[redacted]".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

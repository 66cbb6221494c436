//! Search-as-you-type suggestions.
//!
//! The upstream endpoint answers with a JSON array whose second element is
//! the list of suggestion strings:
//!
//! `["casq", ["casque", "casque bluetooth"], ...]`

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ShoppingError;

const DEFAULT_BASE_URL: &str = "http://google.com/complete/search";
const CLIENT_PARAM: &str = "chrome";

/// Client for the autocomplete endpoint.
#[derive(Debug, Clone)]
pub struct SuggestClient {
    client: Client,
    base_url: Url,
    language: String,
}

impl SuggestClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(language: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ShoppingError> {
        Self::with_base_url(language, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ShoppingError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        language: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ShoppingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        let parsed = Url::parse(base_url).map_err(|e| ShoppingError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            language: language.to_owned(),
        })
    }

    /// Suggestions for a partial query. A blank query returns an empty list
    /// without calling upstream.
    ///
    /// # Errors
    ///
    /// - [`ShoppingError::Http`] on network failure or non-2xx status.
    /// - [`ShoppingError::Deserialize`] if the body is not JSON.
    /// - [`ShoppingError::Api`] if the JSON is not the expected array shape.
    pub async fn suggest(&self, query: &str) -> Result<Vec<String>, ShoppingError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.build_url(query);
        let response = self.client.get(url).send().await?.error_for_status()?;
        // `text()` honours the charset the endpoint declares (often ISO-8859-1).
        let body = response.text().await?;
        parse_suggestions(&body)
    }

    fn build_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("client", CLIENT_PARAM)
            .append_pair("hl", &self.language)
            .append_pair("q", query);
        url
    }
}

/// Extracts the suggestion list (element `[1]`), skipping non-string entries.
fn parse_suggestions(body: &str) -> Result<Vec<String>, ShoppingError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ShoppingError::Deserialize {
            context: "suggest".to_string(),
            source: e,
        })?;

    let list = value
        .as_array()
        .and_then(|top| top.get(1))
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| ShoppingError::Api("unexpected suggestion payload".to_string()))?;

    Ok(list
        .iter()
        .filter_map(serde_json::Value::as_str)
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_second_element() {
        let body = r#"["casq",["casque","casque bluetooth"],["",""],[],{}]"#;
        assert_eq!(
            parse_suggestions(body).expect("parse"),
            vec!["casque".to_string(), "casque bluetooth".to_string()]
        );
    }

    #[test]
    fn skips_non_string_entries() {
        let body = r#"["x",["a",1,null,"b"]]"#;
        assert_eq!(
            parse_suggestions(body).expect("parse"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(matches!(
            parse_suggestions(r#"{"q":"x"}"#),
            Err(ShoppingError::Api(_))
        ));
        assert!(matches!(parse_suggestions(r#"["x"]"#), Err(ShoppingError::Api(_))));
        assert!(matches!(
            parse_suggestions("not json"),
            Err(ShoppingError::Deserialize { .. })
        ));
    }

    #[test]
    fn build_url_sets_client_language_and_query() {
        let client = SuggestClient::with_base_url("fr", 5, "ua", "http://suggest.test/complete/search")
            .expect("client");
        assert_eq!(
            client.build_url("café noir").as_str(),
            "http://suggest.test/complete/search?client=chrome&hl=fr&q=caf%C3%A9+noir"
        );
    }
}

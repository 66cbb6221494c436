use thiserror::Error;

/// Errors returned by the shopping-search and suggestion clients.
#[derive(Debug, Error)]
pub enum ShoppingError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an `"error"` field in its JSON body.
    #[error("search provider error: {0}")]
    Api(String),

    /// Non-2xx status without a provider error message.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Locale parameters forwarded to the shopping-search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLocale {
    /// Search domain, e.g. `google.ca`.
    pub domain: String,
    /// Two-letter country code (`gl`).
    pub country: String,
    /// Interface language (`hl`).
    pub language: String,
    /// Number of results requested per search.
    pub num_results: u32,
}

impl Default for SearchLocale {
    fn default() -> Self {
        Self {
            domain: "google.ca".to_string(),
            country: "ca".to_string(),
            language: "fr".to_string(),
            num_results: 20,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub merchants_path: PathBuf,
    pub serpapi_key: Option<String>,
    pub serpapi_base_url: String,
    pub suggest_base_url: String,
    pub search_locale: SearchLocale,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("merchants_path", &self.merchants_path)
            .field("database_url", &"[redacted]")
            .field(
                "serpapi_key",
                &self.serpapi_key.as_ref().map(|_| "[redacted]"),
            )
            .field("serpapi_base_url", &self.serpapi_base_url)
            .field("suggest_base_url", &self.suggest_base_url)
            .field("search_locale", &self.search_locale)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

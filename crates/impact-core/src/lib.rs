pub mod app_config;
pub mod config;
pub mod merchants;

pub use app_config::{AppConfig, Environment, SearchLocale};
pub use config::{load_app_config, load_app_config_from_env};
pub use merchants::{
    estimate_commission, load_merchants, parse_merchants, MerchantConfig, MerchantEntry,
    MerchantsFile, RewardType,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read merchants file {path}: {source}")]
    MerchantsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse merchants file: {0}")]
    MerchantsFileParse(#[source] serde_yaml::Error),

    #[error("merchant config validation failed: {0}")]
    Validation(String),
}

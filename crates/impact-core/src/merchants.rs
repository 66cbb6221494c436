use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a merchant rewards a referred purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    /// Commission goes to a partner charity.
    Donation,
    /// Commission is returned to the shopper.
    Cashback,
}

impl std::fmt::Display for RewardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardType::Donation => write!(f, "donation"),
            RewardType::Cashback => write!(f, "cashback"),
        }
    }
}

impl std::str::FromStr for RewardType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donation" => Ok(RewardType::Donation),
            "cashback" => Ok(RewardType::Cashback),
            other => Err(ConfigError::Validation(format!(
                "reward_type must be 'donation' or 'cashback', got '{other}'"
            ))),
        }
    }
}

/// One partner merchant as declared in `config/merchants.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantConfig {
    pub name: String,
    pub category: String,
    pub reward_type: RewardType,
    /// Percentage of the purchase price paid out, e.g. `5.5`.
    pub commission_rate: Decimal,
    /// Search page prefix; the cleaned product title is appended to it.
    pub search_url: Option<String>,
    /// Tracking parameters appended after the encoded title.
    pub affiliate_suffix: Option<String>,
    pub logo_url: Option<String>,
    pub url: Option<String>,
}

/// The subset of a merchant record that result matching needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantEntry {
    pub id: i64,
    pub name: String,
    pub search_url: Option<String>,
    pub affiliate_suffix: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MerchantsFile {
    pub merchants: Vec<MerchantConfig>,
}

/// Load and validate the merchant directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_merchants(path: &Path) -> Result<MerchantsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MerchantsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_merchants(&content)
}

/// Parse and validate merchant YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_merchants(content: &str) -> Result<MerchantsFile, ConfigError> {
    let merchants_file: MerchantsFile =
        serde_yaml::from_str(content).map_err(ConfigError::MerchantsFileParse)?;

    validate_merchants(&merchants_file)?;

    Ok(merchants_file)
}

fn validate_merchants(merchants_file: &MerchantsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for merchant in &merchants_file.merchants {
        if merchant.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "merchant name must be non-empty".to_string(),
            ));
        }

        if merchant.category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "merchant '{}' has an empty category",
                merchant.name
            )));
        }

        if merchant.commission_rate < Decimal::ZERO
            || merchant.commission_rate > Decimal::ONE_HUNDRED
        {
            return Err(ConfigError::Validation(format!(
                "merchant '{}' has commission_rate {}; must be between 0 and 100",
                merchant.name, merchant.commission_rate
            )));
        }

        if let Some(ref search_url) = merchant.search_url {
            if !(search_url.starts_with("https://") || search_url.starts_with("http://")) {
                return Err(ConfigError::Validation(format!(
                    "merchant '{}' has search_url '{search_url}'; must start with http:// or https://",
                    merchant.name
                )));
            }
        }

        let lower_name = merchant.name.trim().to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate merchant name: '{}'",
                merchant.name
            )));
        }
    }

    Ok(())
}

/// Commission earned on a referred purchase: `price × rate / 100`, rounded to cents.
///
/// `None` when the product overflows `Decimal`.
#[must_use]
pub fn estimate_commission(price: Decimal, commission_rate: Decimal) -> Option<Decimal> {
    price
        .checked_mul(commission_rate)?
        .checked_div(Decimal::ONE_HUNDRED)
        .map(|gain| gain.round_dp(2))
}

#[cfg(test)]
#[path = "merchants_test.rs"]
mod tests;

//! Response types for the `google_shopping` search engine.
//!
//! Only the fields the comparison needs are modelled; everything else in the
//! payload is ignored. Observed quirks:
//!
//! - `price` is usually display text (`"1 129,00 $"`, `"$24.99"`) but some
//!   result types send a bare number, hence [`PriceValue`].
//! - `extracted_price` is the provider's own numeric parse and is preferred
//!   when present.
//! - Shipping arrives as free text in `delivery` (current) or `shipping`
//!   (older payloads), e.g. `"Livraison gratuite"`, `"+ $15.00 delivery"`.
//! - `link` is absent on many results; `product_link` points at the
//!   provider's own product page and is the fallback.
//! - An `error` string can arrive with HTTP 200 (e.g. no results for the
//!   query) or with 4xx (bad key, exhausted quota).

use serde::{Deserialize, Serialize};

use crate::price::PriceValue;

/// Top-level search response.
#[derive(Debug, Deserialize)]
pub struct ShoppingSearchResponse {
    #[serde(default)]
    pub shopping_results: Vec<ShoppingResult>,

    /// Refinement facets (brand, price band, condition) offered for the query.
    #[serde(default)]
    pub filters: Vec<FilterGroup>,

    pub error: Option<String>,
}

/// A single offer in `shopping_results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShoppingResult {
    /// 1-based rank in the provider's ordering.
    pub position: Option<i64>,

    #[serde(default)]
    pub title: String,

    pub price: Option<PriceValue>,

    pub extracted_price: Option<f64>,

    /// Seller label, e.g. `"Amazon.ca - Marketplace"`.
    pub source: Option<String>,

    pub link: Option<String>,

    pub product_link: Option<String>,

    pub thumbnail: Option<String>,

    pub rating: Option<f64>,

    pub reviews: Option<u64>,

    pub delivery: Option<String>,

    pub shipping: Option<String>,
}

/// One facet, e.g. `{"type": "Price", "options": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterGroup {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub options: Vec<FilterOption>,
}

/// A selectable facet value. `tbs` is the token to send back to apply it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterOption {
    pub text: String,

    pub tbs: Option<String>,
}

//! Shopping-search integration and result normalization.
//!
//! - [`ShoppingClient`] / [`SuggestClient`]: upstream HTTP clients
//! - [`price`]: price and shipping normalization
//! - [`matcher`]: partner attribution and affiliate deep links
//! - [`assemble`]: filtering, sorting and the final payload

pub mod assemble;
pub mod client;
pub mod error;
pub mod matcher;
pub mod price;
pub mod query;
pub mod suggest;
pub mod types;

pub use assemble::{assemble, CompareResult, ProductResult};
pub use client::ShoppingClient;
pub use error::ShoppingError;
pub use matcher::{MerchantEntry, ResolvedLink};
pub use price::{PriceValue, Shipping};
pub use query::{
    build_tbs, parse_price_bound, CompareParams, Condition, PriceBounds, SearchRequest, SortMode,
};
pub use suggest::SuggestClient;
pub use types::{FilterGroup, FilterOption, ShoppingResult, ShoppingSearchResponse};

//! Turns a raw search response into the comparison payload.

use serde::Serialize;

use crate::matcher::{resolve_link, MerchantEntry};
use crate::price::{normalize_price, parse_shipping, total_price, PriceValue};
use crate::query::{CompareParams, PriceBounds, SortMode};
use crate::types::{FilterGroup, ShoppingResult, ShoppingSearchResponse};

/// One offer as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductResult {
    /// Provider rank, stable across re-sorts.
    pub id: Option<i64>,
    pub title: String,
    /// Display price text.
    pub price: String,
    /// Numeric item price; price bounds apply to this.
    pub price_value: f64,
    pub shipping_cost: f64,
    pub shipping_label: String,
    /// `price_value + shipping_cost`; price sorts order by this.
    pub total: f64,
    pub source: Option<String>,
    pub link: Option<String>,
    /// Matched partner merchant, if any.
    pub merchant_id: Option<i64>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
}

/// Comparison payload: products plus the provider's refinement facets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareResult {
    pub products: Vec<ProductResult>,
    pub filters: Vec<FilterGroup>,
}

/// Maps one provider result, normalizing prices and resolving its link.
#[must_use]
pub fn map_result(item: &ShoppingResult, merchants: &[MerchantEntry]) -> ProductResult {
    let extracted = item.extracted_price.filter(|p| p.is_finite() && *p >= 0.0);

    let price_value = extracted
        .or_else(|| item.price.as_ref().map(normalize_price))
        .unwrap_or(0.0);

    let display_price = item
        .price
        .as_ref()
        .map(PriceValue::display)
        .or_else(|| extracted.map(|p| PriceValue::Number(p).display()))
        .unwrap_or_default();

    let shipping = parse_shipping(item.delivery.as_deref().or(item.shipping.as_deref()));
    let total = total_price(price_value, &shipping);
    let resolved = resolve_link(item, merchants);

    ProductResult {
        id: item.position,
        title: item.title.clone(),
        price: display_price,
        price_value,
        shipping_cost: shipping.cost,
        shipping_label: shipping.label,
        total,
        source: item.source.clone(),
        link: resolved.link,
        merchant_id: resolved.merchant_id,
        image: item.thumbnail.clone(),
        rating: item.rating.filter(|r| r.is_finite()),
        reviews: item.reviews,
    }
}

/// Keeps products whose item price lies inside `bounds`.
///
/// With any bound set, products of unknown price (`0`) are dropped too.
#[must_use]
pub fn apply_price_bounds(products: Vec<ProductResult>, bounds: PriceBounds) -> Vec<ProductResult> {
    if bounds.is_unbounded() {
        return products;
    }
    products
        .into_iter()
        .filter(|p| p.price_value > 0.0 && bounds.contains(p.price_value))
        .collect()
}

/// Stable in-place sort. Price modes order by total (item plus shipping);
/// unrated products go last under [`SortMode::Rating`].
pub fn sort_products(products: &mut [ProductResult], sort: SortMode) {
    match sort {
        SortMode::Relevance => {}
        SortMode::PriceAsc => products.sort_by(|a, b| a.total.total_cmp(&b.total)),
        SortMode::PriceDesc => products.sort_by(|a, b| b.total.total_cmp(&a.total)),
        SortMode::Rating => products.sort_by(|a, b| {
            let a = a.rating.unwrap_or(f64::NEG_INFINITY);
            let b = b.rating.unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        }),
    }
}

/// Full pipeline: map, filter by price, sort.
#[must_use]
pub fn assemble(
    response: ShoppingSearchResponse,
    merchants: &[MerchantEntry],
    params: &CompareParams,
) -> CompareResult {
    let products = response
        .shopping_results
        .iter()
        .map(|item| map_result(item, merchants))
        .collect();

    let mut products = apply_price_bounds(products, params.bounds);
    sort_products(&mut products, params.sort);

    CompareResult {
        products,
        filters: response.filters,
    }
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;

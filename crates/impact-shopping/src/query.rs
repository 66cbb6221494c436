//! Comparison parameters and the `tbs` refinement token.
//!
//! `tbs` is a comma-separated list of `key:value` pairs understood by the
//! shopping engine. A caller-supplied token always wins; otherwise one is
//! composed from the structured parameters.

use std::fmt;

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Provider order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl SortMode {
    /// Lenient parse: unknown or empty values fall back to [`SortMode::Relevance`].
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("price_asc") => SortMode::PriceAsc,
            Some("price_desc") => SortMode::PriceDesc,
            Some("rating") => SortMode::Rating,
            _ => SortMode::Relevance,
        }
    }

    fn tbs_order(self) -> Option<&'static str> {
        match self {
            SortMode::Relevance => None,
            SortMode::PriceAsc => Some("p_ord:p"),
            SortMode::PriceDesc => Some("p_ord:pd"),
            SortMode::Rating => Some("p_ord:rv"),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortMode::Relevance => "relevance",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
            SortMode::Rating => "rating",
        };
        f.write_str(s)
    }
}

/// Item condition filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    /// Lenient parse: anything other than `new` or `used` means no filter.
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            Some("new") => Some(Condition::New),
            Some("used") => Some(Condition::Used),
            _ => None,
        }
    }

    fn tbs_token(self) -> &'static str {
        match self {
            Condition::New => "new:1",
            Condition::Used => "new:3",
        }
    }
}

/// Parses an optional price bound. Blank, unparseable, negative or
/// non-finite input means "no bound".
#[must_use]
pub fn parse_price_bound(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Inclusive price window applied to item prices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBounds {
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// Everything a comparison request can carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompareParams {
    pub query: String,
    pub sort: SortMode,
    pub location: Option<String>,
    pub bounds: PriceBounds,
    pub condition: Option<Condition>,
    /// Raw refinement token; forwarded verbatim when present.
    pub tbs: Option<String>,
}

impl CompareParams {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// The `tbs` token to forward, if any.
    #[must_use]
    pub fn effective_tbs(&self) -> Option<String> {
        if let Some(raw) = self.tbs.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return Some(raw.to_string());
        }
        build_tbs(self.sort, self.bounds, self.condition)
    }

    /// Upstream request for these parameters.
    #[must_use]
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.trim().to_string(),
            location: self
                .location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            tbs: self.effective_tbs(),
        }
    }
}

/// Composes a `tbs` token from structured refinements.
///
/// Token order is `mr:1`, price window, condition, ordering. Returns `None`
/// when nothing applies.
#[must_use]
pub fn build_tbs(
    sort: SortMode,
    bounds: PriceBounds,
    condition: Option<Condition>,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if !bounds.is_unbounded() {
        parts.push("price:1".to_string());
        if let Some(min) = bounds.min {
            parts.push(format!("ppr_min:{min}"));
        }
        if let Some(max) = bounds.max {
            parts.push(format!("ppr_max:{max}"));
        }
    }
    if let Some(condition) = condition {
        parts.push(condition.tbs_token().to_string());
    }
    if let Some(order) = sort.tbs_order() {
        parts.push(order.to_string());
    }

    if parts.is_empty() {
        return None;
    }
    Some(format!("mr:1,{}", parts.join(",")))
}

/// Parameters of a single upstream search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub location: Option<String>,
    pub tbs: Option<String>,
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

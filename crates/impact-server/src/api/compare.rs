use axum::{
    extract::{Query, State},
    Extension, Json,
};
use impact_shopping::{
    assemble, parse_price_bound, CompareParams, CompareResult, Condition, MerchantEntry,
    PriceBounds, ShoppingError, SortMode,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// Raw query string. Everything is optional text so that malformed
/// refinements degrade to "absent" instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub(super) struct CompareQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub condition: Option<String>,
    pub tbs: Option<String>,
}

impl CompareQuery {
    /// `None` when the search term is missing or blank.
    pub(super) fn into_params(self) -> Option<CompareParams> {
        let query = self.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty())?;

        Some(CompareParams {
            query,
            sort: SortMode::parse_lenient(self.sort.as_deref()),
            location: self.location,
            bounds: PriceBounds {
                min: parse_price_bound(self.min_price.as_deref()),
                max: parse_price_bound(self.max_price.as_deref()),
            },
            condition: Condition::parse_lenient(self.condition.as_deref()),
            tbs: self.tbs,
        })
    }
}

fn map_shopping_error(request_id: &str, error: &ShoppingError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "shopping search failed");
    let message = match error {
        ShoppingError::Api(message) => message.clone(),
        _ => "Failed to fetch data".to_string(),
    };
    ApiError::new(request_id, "upstream_error", message)
}

/// GET /api/compare: search, attribute, normalize, filter and sort offers.
pub(super) async fn compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ApiResponse<CompareResult>>, ApiError> {
    let rid = req_id.0;

    let Some(params) = query.into_params() else {
        return Err(ApiError::new(rid, "bad_request", "Query required"));
    };
    let Some(client) = state.shopping.as_deref() else {
        tracing::error!(request_id = %rid, "compare requested but no search API key is configured");
        return Err(ApiError::new(
            rid,
            "internal_error",
            "Server misconfiguration: No API Key",
        ));
    };

    let request = params.search_request();
    let (response, merchants) = tokio::try_join!(
        async {
            client
                .search(&request)
                .await
                .map_err(|e| map_shopping_error(&rid, &e))
        },
        async {
            impact_db::list_active_merchants(&state.pool)
                .await
                .map_err(|e| map_db_error(rid.clone(), &e))
        },
    )?;

    let merchants: Vec<MerchantEntry> = merchants.into_iter().map(MerchantEntry::from).collect();
    let result = assemble(response, &merchants, &params);
    tracing::debug!(
        request_id = %rid,
        query = %params.query,
        sort = %params.sort,
        products = result.products.len(),
        "compare assembled"
    );

    Ok(Json(ApiResponse::new(result, rid)))
}

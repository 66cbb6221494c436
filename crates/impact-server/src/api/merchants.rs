use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, parse_user_id, ApiError, ApiResponse, AppState};

/// Category value meaning "no category filter".
const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Serialize)]
pub(super) struct MerchantItem {
    id: i64,
    name: String,
    category: String,
    reward_type: String,
    commission_rate: Decimal,
    search_url: Option<String>,
    affiliate_suffix: Option<String>,
    logo_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MerchantsData {
    merchants: Vec<MerchantItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MerchantQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// GET /api/merchants: the partner directory, optionally filtered.
pub(super) async fn list_merchants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MerchantQuery>,
) -> Result<Json<ApiResponse<MerchantsData>>, ApiError> {
    let rid = &req_id.0;

    let favorites_of = if query.favorites_only {
        Some(parse_user_id(rid, query.user_id.as_deref())?)
    } else {
        None
    };
    let category = non_blank(query.category.as_deref()).filter(|c| *c != ALL_CATEGORIES);

    let rows = impact_db::list_merchants(
        &state.pool,
        impact_db::MerchantFilters {
            category,
            name_query: non_blank(query.q.as_deref()),
            favorites_of,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    let merchants = rows
        .into_iter()
        .map(|row| MerchantItem {
            id: row.id,
            name: row.name,
            category: row.category,
            reward_type: row.reward_type,
            commission_rate: row.commission_rate,
            search_url: row.search_url,
            affiliate_suffix: row.affiliate_suffix,
            logo_url: row.logo_url,
            url: row.url,
        })
        .collect();

    Ok(Json(ApiResponse::new(MerchantsData { merchants }, req_id.0)))
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use impact_db::{ClickRow, ClickStats, NewClick};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, parse_user_id, ApiError, ApiResponse, AppState};

/// Largest amount a `NUMERIC(12,2)` price column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

#[derive(Debug, Deserialize)]
pub(super) struct TrackRequest {
    pub merchant_id: Option<i64>,
    pub user_id: Option<String>,
    pub product_title: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ClicksQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct Tracked {
    success: bool,
    id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct ClicksData {
    clicks: Vec<ClickRow>,
    stats: ClickStats,
}

/// POST /api/track: record an outbound referral as a pending click.
///
/// The merchant's current commission rate is snapshotted so later rate
/// changes don't rewrite history.
pub(super) async fn track_click(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TrackRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tracked>>), ApiError> {
    let rid = &req_id.0;

    let Some(merchant_id) = body.merchant_id else {
        return Err(ApiError::new(rid, "bad_request", "merchant_id required"));
    };
    // Anonymous clicks are allowed; a present user id must still be valid.
    let user_id = match body.user_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_user_id(rid, Some(raw))?),
    };
    if body.price.is_some_and(|p| p.is_sign_negative()) {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "price must not be negative",
        ));
    }
    if body.price.is_some_and(|p| p > MAX_PRICE) {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!("price must not exceed {MAX_PRICE}"),
        ));
    }

    let merchant = impact_db::get_merchant_by_id(&state.pool, merchant_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(rid, "not_found", format!("merchant {merchant_id} not found"))
        })?;

    let estimated_gain = body
        .price
        .map(|price| {
            impact_core::estimate_commission(price, merchant.commission_rate)
                .ok_or_else(|| ApiError::new(rid, "validation_error", "price is out of range"))
        })
        .transpose()?;
    let product_title = body
        .product_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let id = impact_db::insert_click(
        &state.pool,
        &NewClick {
            merchant_id,
            user_id,
            product_title,
            commission_rate: merchant.commission_rate,
            price: body.price,
            estimated_gain,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(
        request_id = %rid,
        click_id = id,
        merchant = %merchant.name,
        "click tracked"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(Tracked { success: true, id }, rid.clone())),
    ))
}

/// GET /api/clicks?user_id=: click history plus dashboard totals.
pub(super) async fn list_clicks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ClicksQuery>,
) -> Result<Json<ApiResponse<ClicksData>>, ApiError> {
    let rid = &req_id.0;
    let user_id = parse_user_id(rid, query.user_id.as_deref())?;
    let limit = normalize_limit(query.limit);

    let (clicks, stats) = tokio::try_join!(
        impact_db::list_clicks_for_user(&state.pool, user_id, limit),
        impact_db::click_stats_for_user(&state.pool, user_id),
    )
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(ClicksData { clicks, stats }, rid.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_price_matches_column_precision() {
        assert_eq!(MAX_PRICE.to_string(), "9999999999.99");
    }
}

//! Favorites: product favorites (keyed by title) and merchant favorites
//! (keyed by merchant, no title).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use impact_db::{FavoriteRow, NewFavorite};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, parse_user_id, ApiError, ApiResponse, AppState};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct FavoritesQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateFavoriteRequest {
    pub user_id: Option<String>,
    pub merchant_id: Option<i64>,
    pub product_title: Option<String>,
    pub product_link: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteFavoriteRequest {
    pub id: Option<i64>,
    pub user_id: Option<String>,
    pub merchant_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct FavoritesData {
    favorites: Vec<FavoriteRow>,
}

#[derive(Debug, Serialize)]
pub(super) struct AlreadyFavorite {
    message: &'static str,
    id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct Created<T: Serialize> {
    success: bool,
    data: T,
}

#[derive(Debug, Serialize)]
pub(super) struct Deleted {
    success: bool,
    deleted: u64,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn map_insert_error(
    request_id: &str,
    merchant_id: Option<i64>,
    e: &impact_db::DbError,
) -> ApiError {
    if e.is_unique_violation() {
        return ApiError::new(request_id, "conflict", "favorite already exists");
    }
    if e.is_foreign_key_violation() {
        let message = match merchant_id {
            Some(id) => format!("merchant {id} not found"),
            None => "merchant not found".to_string(),
        };
        return ApiError::new(request_id, "not_found", message);
    }
    map_db_error(request_id.to_owned(), e)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/favorites?user_id=: newest first.
pub(super) async fn list_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FavoritesQuery>,
) -> Result<Json<ApiResponse<FavoritesData>>, ApiError> {
    let user_id = parse_user_id(&req_id.0, query.user_id.as_deref())?;

    let favorites = impact_db::list_favorites_for_user(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(FavoritesData { favorites }, req_id.0)))
}

/// POST /api/favorites: idempotent by business key.
///
/// An existing favorite answers 200 with its id; a new one answers 201
/// with the stored row.
pub(super) async fn create_favorite(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateFavoriteRequest>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;
    let user_id = parse_user_id(rid, body.user_id.as_deref())?;
    let product_title = non_blank(body.product_title.as_deref());

    if product_title.is_none() && body.merchant_id.is_none() {
        return Err(ApiError::new(
            rid,
            "bad_request",
            "product_title or merchant_id required",
        ));
    }

    let favorite = NewFavorite {
        user_id,
        merchant_id: body.merchant_id,
        product_title,
        product_link: non_blank(body.product_link.as_deref()),
        image_url: non_blank(body.image_url.as_deref()),
        price: body.price.unwrap_or(Decimal::ZERO),
    };

    let existing = impact_db::find_existing_favorite(&state.pool, &favorite)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if let Some(id) = existing {
        return Ok(Json(ApiResponse::new(
            AlreadyFavorite {
                message: "already_favorite",
                id,
            },
            rid.clone(),
        ))
        .into_response());
    }

    let row = impact_db::insert_favorite(&state.pool, &favorite)
        .await
        .map_err(|e| map_insert_error(rid, favorite.merchant_id, &e))?;
    tracing::info!(request_id = %rid, favorite_id = row.id, "favorite created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            Created {
                success: true,
                data: row,
            },
            rid.clone(),
        )),
    )
        .into_response())
}

/// DELETE /api/favorites: by `id`, or by `user_id` + `merchant_id` for
/// merchant favorites.
pub(super) async fn delete_favorite(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DeleteFavoriteRequest>,
) -> Result<Json<ApiResponse<Deleted>>, ApiError> {
    let rid = &req_id.0;

    let deleted = match (body.id, body.merchant_id) {
        (Some(id), _) => impact_db::delete_favorite(&state.pool, id).await,
        (None, Some(merchant_id)) => {
            let user_id = parse_user_id(rid, body.user_id.as_deref())?;
            impact_db::delete_merchant_favorite(&state.pool, user_id, merchant_id).await
        }
        (None, None) => {
            return Err(ApiError::new(
                rid,
                "bad_request",
                "id or user_id and merchant_id required",
            ));
        }
    }
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(
        Deleted {
            success: true,
            deleted,
        },
        rid.clone(),
    )))
}

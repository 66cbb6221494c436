mod clicks;
mod compare;
mod favorites;
mod merchants;
mod suggest;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use impact_shopping::{ShoppingClient, SuggestClient};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// `None` when no search API key is configured.
    pub shopping: Option<Arc<ShoppingClient>>,
    pub suggest: Arc<SuggestClient>,
}

/// Success envelope: the payload's own keys at the top level, plus `meta`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(flatten)]
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &impact_db::DbError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// Parses a caller-supplied user id, rejecting blanks and non-UUIDs.
pub(super) fn parse_user_id(request_id: &str, raw: Option<&str>) -> Result<Uuid, ApiError> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty()).ok_or_else(|| {
        ApiError::new(request_id, "bad_request", "user_id required")
    })?;
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("user_id must be a UUID, got '{raw}'"),
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Routes that spend upstream quota sit behind the rate limiter.
fn metered_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/compare", get(compare::compare))
        .route("/api/suggest", get(suggest::suggest))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/merchants", get(merchants::list_merchants))
        .route(
            "/api/favorites",
            get(favorites::list_favorites)
                .post(favorites::create_favorite)
                .delete(favorites::delete_favorite),
        )
        .route("/api/track", post(clicks::track_click))
        .route("/api/clicks", get(clicks::list_clicks));

    Router::new()
        .merge(routes)
        .merge(metered_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match impact_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::new(
                HealthData {
                    status: "ok",
                    database: "ok",
                },
                req_id.0,
            )),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::new(
                    HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    req_id.0,
                )),
            )
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SuggestQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SuggestData {
    suggestions: Vec<String>,
}

/// GET /api/suggest: autocomplete. Never fails: upstream trouble yields
/// an empty list.
pub(super) async fn suggest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SuggestQuery>,
) -> Json<ApiResponse<SuggestData>> {
    let term = query.q.unwrap_or_default();

    let suggestions = match state.suggest.suggest(&term).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "autocomplete failed");
            Vec::new()
        }
    };

    Json(ApiResponse::new(SuggestData { suggestions }, req_id.0))
}

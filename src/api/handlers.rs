use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use nanoid::nanoid;
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::ErrorBody;
use crate::error::FetchError;

use super::AppState;
use super::models::{CardsQuery, INTERNAL_ERROR, MISSING_QUERY_ERROR, MISSING_QUERY_HINT};

type ApiError = (StatusCode, Json<ErrorBody>);

/// Relays one page of upstream search results verbatim.
pub async fn cards_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CardsQuery>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let request_id = nanoid!(8);

    let query = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(MISSING_QUERY_ERROR).with_hint(MISSING_QUERY_HINT)),
            ));
        }
    };

    let Some(page) = params.page() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(format!(
                "Query parameter \"page\" must be a positive integer, got {:?}.",
                params.page.as_deref().unwrap_or_default()
            ))),
        ));
    };

    log::info!("[{request_id}] searching cards q={query:?} page={page}");

    match state.upstream.fetch_raw(query, page).await {
        Ok(body) => {
            log::info!(
                "[{request_id}] upstream answered in {}ms",
                start.elapsed().as_millis()
            );
            Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
        }
        Err(FetchError::UpstreamHttp { status, body }) => {
            log::error!("[{request_id}] upstream card API error: {status}");
            Err((
                status,
                Json(
                    ErrorBody::new(format!(
                        "API request failed: {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or_default()
                    ))
                    .with_details(body),
                ),
            ))
        }
        Err(e) => {
            log::error!("[{request_id}] server error: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(INTERNAL_ERROR).with_details(e.to_string())),
            ))
        }
    }
}

//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tracing::warn;

use crate::board::TransitClient;

use super::dto::*;
use super::state::AppState;

/// Header carrying the client API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Create the application router.
///
/// `/health` is always open; `/v1/*` requires the API key when one is set.
pub fn create_router<C: TransitClient + 'static>(state: AppState<C>) -> Router {
    let v1 = Router::new()
        .route("/board", get(board::<C>))
        .route("/board/:key", get(board_item::<C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key::<C>,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/v1", v1)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// The board for every configured stop.
async fn board<C: TransitClient + 'static>(
    State(state): State<AppState<C>>,
) -> Json<BoardResponse> {
    let board = state.service.get_board(Utc::now()).await;
    Json(board.into())
}

/// One stop by key.
async fn board_item<C: TransitClient + 'static>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<BoardItemResponse>, AppError> {
    let item = state
        .service
        .get_board_item(&key, Utc::now())
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Board item '{key}' not found"),
        })?;
    Ok(Json(item.into()))
}

/// Reject `/v1/*` requests without the configured API key.
async fn require_api_key<C: TransitClient + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = &state.api_key {
        let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_ref()) {
            return Err(AppError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid or missing API key".to_string(),
            ),
        };

        warn!(%status, %message, "request rejected");

        let body = Json(ErrorResponse { detail: message });
        (status, body).into_response()
    }
}

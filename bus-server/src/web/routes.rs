//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::catalog::{BusCatalog, CatalogError};
use crate::domain::{InvalidStopId, Stop, StopId};
use crate::lookup::{RouteMatch, find_matches};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<C>(state: AppState<C>) -> Router
where
    C: BusCatalog + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/routes", get(find_routes::<C>))
        .route("/routes/describe", get(describe_routes::<C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Route lookup as JSON.
async fn find_routes<C>(
    State(state): State<AppState<C>>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteMatchResponse>, AppError>
where
    C: BusCatalog + 'static,
{
    let result = lookup(&state, query).await?;
    Ok(Json(RouteMatchResponse::from(&result)))
}

/// Route lookup as a plain-text description.
async fn describe_routes<C>(
    State(state): State<AppState<C>>,
    Query(query): Query<RouteQuery>,
) -> Result<String, AppError>
where
    C: BusCatalog + 'static,
{
    let result = lookup(&state, query).await?;
    Ok(result.to_string())
}

async fn lookup<C>(state: &AppState<C>, query: RouteQuery) -> Result<RouteMatch, AppError>
where
    C: BusCatalog + 'static,
{
    let origin = match query.stop.as_deref() {
        Some(raw) => Some(resolve_stop(state, raw).await?),
        None => None,
    };

    find_matches(
        &state.catalog,
        state.sink.as_ref(),
        origin.as_ref(),
        query.name.as_deref(),
    )
    .await
    .ok_or_else(|| AppError::BadRequest {
        message: "both 'stop' and 'name' query parameters are required".to_string(),
    })
}

async fn resolve_stop<C: BusCatalog>(state: &AppState<C>, raw: &str) -> Result<Stop, AppError> {
    let id = StopId::parse(raw)?;
    state
        .catalog
        .stop(&id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("unknown stop {id}"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<InvalidStopId> for AppError {
    fn from(e: InvalidStopId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

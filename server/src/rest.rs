use crate::errors::Error;
use crate::ingest::ingest;
use crate::metrics;
use crate::model::{HistoryEntry, StatusResponse};
use crate::query::{self, DisplayZone};
use crate::store::ReadingStore;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::error;

const STORAGE_UNAVAILABLE: &str = "Storage unavailable";

#[derive(Clone)]
struct AppState {
    store: Arc<dyn ReadingStore>,
    display_zone: DisplayZone,
}

pub fn create_router(store: Arc<dyn ReadingStore>, display_zone: DisplayZone) -> Router {
    let state = AppState {
        store,
        display_zone,
    };

    Router::new()
        .route("/", get(home))
        .route("/data", get(get_latest).post(post_reading))
        .route("/history", get(get_history))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

pub async fn bind(addr: &str) -> crate::errors::Result<TcpListener> {
    Ok(TcpListener::bind(addr).await?)
}

async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let view = query::page_view(state.store.as_ref(), state.display_zone).await?;
    Ok(Html(view.render()))
}

async fn get_latest(State(state): State<AppState>) -> Result<Response, AppError> {
    let response = match query::latest_view(state.store.as_ref()).await? {
        Some(data) => Json(data).into_response(),
        None => Json(json!({})).into_response(),
    };
    Ok(response)
}

async fn post_reading(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    ingest(state.store.as_ref(), &body).await?;
    Ok(Json(StatusResponse::success()))
}

async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let history = query::history_view(state.store.as_ref(), state.display_zone).await?;
    Ok(Json(history))
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            e if e.is_storage() => {
                error!("Storage error: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, STORAGE_UNAVAILABLE.to_string())
            }
            e => {
                error!("API error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(StatusResponse::error(message))).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

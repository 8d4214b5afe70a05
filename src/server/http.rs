//! Sandbox resource API: a throwaway backend for fixture runs.

use crate::adapters::memory::{InMemoryApiClient, ResourceNotFound};
use crate::app::dto::*;
use crate::domain::ports::ApiClient;
use crate::domain::resource::ResourcePath;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct HttpState {
    pub store: Arc<InMemoryApiClient>,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> impl IntoResponse {
    (status, Json(ApiErrorBody { error: msg.into() }))
}

pub fn build_router(store: Arc<InMemoryApiClient>) -> Router {
    let state = Arc::new(HttpState { store });

    Router::new()
        .route("/health", get(health))
        .route("/{*path}", post(create).delete(delete))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(store: Arc<InMemoryApiClient>, addr: SocketAddr) -> Result<()> {
    let app = build_router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("sandbox API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        live_resources: state.store.live_count(),
    })
}

async fn create(
    State(state): State<Arc<HttpState>>,
    Path(path): Path<String>,
    Json(req): Json<CreateRequest>,
) -> impl IntoResponse {
    if req.label.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "label must not be empty").into_response();
    }
    let collection = ResourcePath::new(&path);
    match state.store.create(collection.as_str(), &req.label) {
        Ok(id) => {
            let member = collection.member(&id);
            tracing::info!(%member, "created");
            (
                StatusCode::CREATED,
                Json(CreateResponse {
                    id,
                    path: Some(member),
                }),
            )
                .into_response()
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn delete(
    State(state): State<Arc<HttpState>>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    let member = ResourcePath::new(&path).to_string();
    match state.store.delete(&member) {
        Ok(()) => {
            tracing::info!(%member, "deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) if e.is::<ResourceNotFound>() => {
            api_error(StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

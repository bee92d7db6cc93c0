//! Read-side HTTP layer serving cached valuations.

use crate::{
    cache::ResultCache,
    model::{TokenMetadata, Valuation},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use uuid::Uuid;

/// Shared state for the read handlers: the valuation cache written by the
/// poller, and the configured well display names.
#[derive(Debug, Clone)]
pub struct ReadState {
    cache: ResultCache,
    well_names: Arc<HashMap<String, String>>,
}

impl ReadState {
    /// Creates the read state over the given cache and name map.
    pub fn new(cache: ResultCache, well_names: HashMap<String, String>) -> Self {
        Self { cache, well_names: Arc::new(well_names) }
    }

    /// Decodes the latest cached valuation for a well. `Ok(None)` means the
    /// well has not been successfully polled; a decode error means the
    /// cached payload is not a valuation document.
    async fn latest_valuation(&self, well_id: &Uuid) -> serde_json::Result<Option<Valuation>> {
        let raw = self.cache.get(&well_id.to_string()).await;
        if raw.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw).map(Some)
    }
}

/// Return a 404 Not Found response
pub async fn return_404() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

/// Return a 200 OK response
pub async fn return_200() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn root() -> Response {
    (StatusCode::OK, "Welcome to Wells Oracle!").into_response()
}

async fn get_valuation(State(state): State<ReadState>, Path(id): Path<String>) -> Response {
    let Ok(well_id) = Uuid::parse_str(&id) else {
        return (StatusCode::BAD_REQUEST, "invalid well id").into_response();
    };

    match state.latest_valuation(&well_id).await {
        Ok(Some(valuation)) => Json(valuation).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "valuation not found").into_response(),
        Err(err) => {
            tracing::error!(%err, %well_id, "cached valuation failed to decode");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to load valuation").into_response()
        }
    }
}

async fn get_metadata(State(state): State<ReadState>, Path(id): Path<String>) -> Response {
    let Ok(well_id) = Uuid::parse_str(&id) else {
        return (StatusCode::BAD_REQUEST, "invalid well id").into_response();
    };

    let valuation = match state.latest_valuation(&well_id).await {
        Ok(Some(valuation)) => valuation,
        Ok(None) => return (StatusCode::NOT_FOUND, "valuation not found").into_response(),
        Err(err) => {
            tracing::error!(%err, %well_id, "cached valuation failed to decode");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to load valuation")
                .into_response();
        }
    };

    let Some(name) = state.well_names.get(&well_id.to_string()) else {
        return (StatusCode::NOT_FOUND, "well not found").into_response();
    };

    Json(TokenMetadata::new(name, &valuation)).into_response()
}

/// Builds the read-side router.
pub fn router(state: ReadState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthcheck", get(return_200))
        .route("/valuation/:id", get(get_valuation))
        .route("/metadata/:id", get(get_metadata))
        .fallback(return_404)
        .with_state(state)
}

/// Serve the oracle read layer on the given socket address.
pub fn serve_oracle(socket: impl Into<SocketAddr>, state: ReadState) -> tokio::task::JoinHandle<()> {
    let router = router(state);

    let addr = socket.into();
    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => {
                if let Err(err) = axum::serve(listener, router).await {
                    tracing::error!(%err, "serve failed");
                }
            }
            Err(err) => {
                tracing::error!(%err, "failed to bind to the address");
            }
        };
    })
}

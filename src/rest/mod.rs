//! REST API for the clock-in wizard.
//!
//! Hosts wizard instances for a web front end: create a wizard, move it
//! through its steps, and submit. Reference data and the OpenAPI document
//! are served alongside.

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    http::header,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Default port for the REST API server
pub const DEFAULT_PORT: u16 = 7010;

async fn openapi_json() -> Result<impl IntoResponse, error::ApiError> {
    let json = ApiDoc::json().map_err(|e| error::ApiError::InternalError(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json))
}

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/openapi.json", get(openapi_json))
        .route("/api/v1/roles", get(routes::roles::list))
        .route("/api/v1/catalog", get(routes::catalog::get))
        .route("/api/v1/catalog/refresh", post(routes::catalog::refresh))
        // Wizard endpoints
        .route("/api/v1/wizards", post(routes::wizards::create))
        .route(
            "/api/v1/wizards/:id",
            get(routes::wizards::get_one).delete(routes::wizards::delete),
        )
        .route("/api/v1/wizards/:id/role", post(routes::wizards::select_role))
        .route(
            "/api/v1/wizards/:id/selection",
            put(routes::wizards::update_selection),
        )
        .route("/api/v1/wizards/:id/next", post(routes::wizards::next))
        .route("/api/v1/wizards/:id/prev", post(routes::wizards::prev))
        .route(
            "/api/v1/wizards/:id/return",
            post(routes::wizards::return_to_previous),
        )
        .route("/api/v1/wizards/:id/submit", post(routes::wizards::submit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server.
///
/// Reference data is preloaded in the background so wizards waiting on
/// equipment lists are released as soon as it arrives.
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let catalog = state.catalog.clone();
    tokio::spawn(async move {
        if let Err(e) = catalog.load().await {
            tracing::warn!(error = %e, "Reference data preload failed");
        }
    });

    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("REST API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// State backed by mock collaborators and an empty catalog
#[cfg(test)]
pub(crate) fn test_state() -> (ApiState, crate::mock::MockCollaborators) {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::catalog::{data_ready, Catalog};
    use crate::config::Config;
    use crate::mock::{MockCatalogApi, MockCollaborators};

    let mocks = MockCollaborators::new();
    let (handle, _ready) = data_ready();
    let catalog = Catalog::new(
        Arc::new(MockCatalogApi::default()),
        Duration::from_secs(60),
        handle,
    );
    let state = ApiState::new(Config::default(), mocks.context(), catalog);
    (state, mocks)
}

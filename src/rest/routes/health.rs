//! Health check endpoint.

use axum::{extract::State, Json};

use crate::rest::dto::HealthResponse;
use crate::rest::state::ApiState;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_wizards: state.wizard_count().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::test_state;

    #[tokio::test]
    async fn test_health() {
        let (state, _mocks) = test_state();
        let resp = health(State(state)).await;
        assert_eq!(resp.status, "ok");
        assert!(!resp.version.is_empty());
        assert_eq!(resp.active_wizards, 0);
    }
}

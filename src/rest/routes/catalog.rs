//! Reference data endpoint.

use axum::{extract::State, Json};

use crate::catalog::CatalogData;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// Jobsites, cost codes, equipment and trucks for the wizard dropdowns
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "Catalog",
    responses(
        (status = 200, description = "Cached reference data", body = CatalogData),
        (status = 502, description = "Timesheet backend unavailable", body = ErrorResponse)
    )
)]
pub async fn get(State(state): State<ApiState>) -> Result<Json<CatalogData>, ApiError> {
    let data = state.catalog.load().await?;
    Ok(Json(data.as_ref().clone()))
}

/// Drop the cached reference data and fetch it again
#[utoipa::path(
    post,
    path = "/api/v1/catalog/refresh",
    tag = "Catalog",
    responses(
        (status = 200, description = "Freshly loaded reference data", body = CatalogData),
        (status = 502, description = "Timesheet backend unavailable", body = ErrorResponse)
    )
)]
pub async fn refresh(State(state): State<ApiState>) -> Result<Json<CatalogData>, ApiError> {
    let data = state.catalog.refresh().await?;
    tracing::info!(
        jobsites = data.jobsites.len(),
        equipment = data.equipment.len(),
        "Reference data refreshed"
    );
    Ok(Json(data.as_ref().clone()))
}

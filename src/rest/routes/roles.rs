//! Role resolution endpoint.

use axum::{extract::Query, Json};

use crate::rest::dto::{RoleSummary, RolesQuery, RolesResponse};
use crate::wizard::roles;

/// Roles available for the given permission flags
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    params(RolesQuery),
    responses(
        (status = 200, description = "Available roles in display order", body = RolesResponse)
    )
)]
pub async fn list(Query(query): Query<RolesQuery>) -> Json<RolesResponse> {
    let available = roles(&query.into());
    let auto_selected = match available.as_slice() {
        [only] => Some(*only),
        _ => None,
    };

    Json(RolesResponse {
        roles: available.into_iter().map(RoleSummary::from).collect(),
        auto_selected,
    })
}

//! Clock-in wizard endpoints.
//!
//! Each wizard lives in the shared registry until it is submitted or
//! deleted. Handlers take the registry write lock for the whole operation,
//! so calls against one server are applied one at a time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::rest::dto::{CreateWizardRequest, SelectRoleRequest, SelectionRequest, WizardResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::submit::SubmitOutcome;
use crate::wizard::{ClockInWizard, WizardError};

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Wizard '{}' not found", id))
}

fn respond(id: Uuid, wizard: &ClockInWizard) -> Json<WizardResponse> {
    Json(WizardResponse {
        id,
        wizard: wizard.view(),
    })
}

/// Open a wizard and resolve the user's roles
#[utoipa::path(
    post,
    path = "/api/v1/wizards",
    tag = "Wizards",
    request_body = CreateWizardRequest,
    responses(
        (status = 200, description = "Wizard created", body = WizardResponse),
        (status = 422, description = "No roles enabled for the user", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    Json(request): Json<CreateWizardRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut wizard = ClockInWizard::new(
        state.context.clone(),
        request.user_id.clone(),
        request.clock_in_type(),
    );
    wizard.start(request.flags).await?;

    let id = Uuid::new_v4();
    let response = respond(id, &wizard);
    state.wizards.write().await.insert(id, wizard);

    tracing::info!(wizard_id = %id, user_id = %request.user_id, "Wizard opened");
    Ok(response)
}

/// Get a wizard's current state
#[utoipa::path(
    get,
    path = "/api/v1/wizards/{id}",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    responses(
        (status = 200, description = "Wizard state", body = WizardResponse),
        (status = 404, description = "Wizard not found", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let wizards = state.wizards.read().await;
    let wizard = wizards.get(&id).ok_or_else(|| not_found(id))?;
    Ok(respond(id, wizard))
}

/// Discard a wizard
#[utoipa::path(
    delete,
    path = "/api/v1/wizards/{id}",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    responses(
        (status = 204, description = "Wizard discarded"),
        (status = 404, description = "Wizard not found", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .wizards
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Choose the role and sub-role
#[utoipa::path(
    post,
    path = "/api/v1/wizards/{id}/role",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    request_body = SelectRoleRequest,
    responses(
        (status = 200, description = "Role selected", body = WizardResponse),
        (status = 400, description = "Role not available", body = ErrorResponse),
        (status = 404, description = "Wizard not found", body = ErrorResponse)
    )
)]
pub async fn select_role(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectRoleRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut wizards = state.wizards.write().await;
    let wizard = wizards.get_mut(&id).ok_or_else(|| not_found(id))?;
    wizard.select_role(request.role, request.sub_role)?;
    Ok(respond(id, wizard))
}

/// Update selections. Fields are applied in declaration order and the
/// first refused field stops the update.
#[utoipa::path(
    put,
    path = "/api/v1/wizards/{id}/selection",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Selections updated", body = WizardResponse),
        (status = 400, description = "Field not editable on this step", body = ErrorResponse),
        (status = 404, description = "Wizard not found", body = ErrorResponse)
    )
)]
pub async fn update_selection(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut wizards = state.wizards.write().await;
    let wizard = wizards.get_mut(&id).ok_or_else(|| not_found(id))?;
    apply_selection(wizard, request)?;
    Ok(respond(id, wizard))
}

fn apply_selection(wizard: &mut ClockInWizard, request: SelectionRequest) -> Result<(), WizardError> {
    if let Some(jobsite) = request.jobsite {
        wizard.set_jobsite(jobsite)?;
    }
    if let Some(cost_code) = request.cost_code {
        wizard.set_cost_code(cost_code)?;
    }
    if let Some(equipment) = request.equipment {
        wizard.set_equipment(equipment)?;
    }
    if let Some(truck) = request.truck {
        wizard.set_truck(truck)?;
    }
    if let Some(material) = request.material_type {
        wizard.set_material_type(material)?;
    }
    if let Some(mileage) = request.starting_mileage {
        wizard.set_starting_mileage(mileage)?;
    }
    if request.comment.is_some() {
        wizard.set_comment(request.comment);
    }
    Ok(())
}

/// Advance to the next step
#[utoipa::path(
    post,
    path = "/api/v1/wizards/{id}/next",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    responses(
        (status = 200, description = "Moved forward", body = WizardResponse),
        (status = 409, description = "No forward move from this step", body = ErrorResponse)
    )
)]
pub async fn next(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut wizards = state.wizards.write().await;
    let wizard = wizards.get_mut(&id).ok_or_else(|| not_found(id))?;
    wizard.handle_next_step().await?;
    Ok(respond(id, wizard))
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/api/v1/wizards/{id}/prev",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    responses(
        (status = 200, description = "Moved back", body = WizardResponse),
        (status = 409, description = "Already at the first step", body = ErrorResponse)
    )
)]
pub async fn prev(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut wizards = state.wizards.write().await;
    let wizard = wizards.get_mut(&id).ok_or_else(|| not_found(id))?;
    wizard.handle_prev_step()?;
    Ok(respond(id, wizard))
}

/// Rebuild the wizard from the user's previous timesheet
#[utoipa::path(
    post,
    path = "/api/v1/wizards/{id}/return",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    responses(
        (status = 200, description = "Returned to previous job", body = WizardResponse),
        (status = 404, description = "No previous timesheet or work record", body = ErrorResponse)
    )
)]
pub async fn return_to_previous(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut wizards = state.wizards.write().await;
    let wizard = wizards.get_mut(&id).ok_or_else(|| not_found(id))?;
    wizard.handle_return().await?;
    Ok(respond(id, wizard))
}

/// Submit the clock-in. A successful submit discards the wizard.
#[utoipa::path(
    post,
    path = "/api/v1/wizards/{id}/submit",
    tag = "Wizards",
    params(("id" = Uuid, Path, description = "Wizard id")),
    responses(
        (status = 200, description = "Clocked in", body = SubmitOutcome),
        (status = 400, description = "Selections incomplete", body = ErrorResponse),
        (status = 422, description = "Location unavailable", body = ErrorResponse),
        (status = 502, description = "Timesheet backend failed", body = ErrorResponse)
    )
)]
pub async fn submit(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    let mut wizards = state.wizards.write().await;
    let wizard = wizards.get_mut(&id).ok_or_else(|| not_found(id))?;
    let outcome = wizard.submit().await?;
    wizards.remove(&id);
    Ok(Json(outcome))
}

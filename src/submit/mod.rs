//! Clock-in submission pipeline.
//!
//! Runs strictly in order: preconditions, coordinates, session resolution,
//! location tracking, payload assembly, timesheet creation, then the
//! follow-up bookkeeping (session link, notification, preferences, active
//! timesheet refresh). Bookkeeping failures after the timesheet exists are
//! logged and do not fail the submit.

mod payload;

pub use payload::{ClockInPayload, RoleDetails, SwitchJobsClosure};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::notifications::Notification;
use crate::session::resolve_session;
use crate::types::{ClockInRoleType, ClockInType, Coordinates, WorkRole};
use crate::wizard::{terminal_step, WizardContext, WizardError, WizardState};

/// Page view stored in preferences after clocking in
pub const DASHBOARD_VIEW: &str = "dashboard";

/// Result of a successful clock-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmitOutcome {
    pub timesheet_id: String,
    pub session_id: String,
    /// Where the caller should navigate next
    pub redirect: String,
}

/// Check that the state holds everything its role submits.
///
/// Returns the role and sub-role the payload is built for.
pub fn validate_selections(
    state: &WizardState,
) -> Result<(WorkRole, ClockInRoleType), WizardError> {
    let role = state.role.ok_or(WizardError::MissingSelection("role"))?;
    let sub_role = state.sub_role.unwrap_or_else(|| role.default_sub_role());
    if sub_role.role() != role {
        return Err(WizardError::SubRoleMismatch { role, sub_role });
    }

    if state.jobsite.is_none() {
        return Err(WizardError::MissingSelection("jobsite"));
    }

    match role {
        WorkRole::Mechanic => {}
        WorkRole::General => require(state.cost_code.is_some(), "cost_code")?,
        WorkRole::Truck => {
            require(state.cost_code.is_some(), "cost_code")?;
            match sub_role {
                ClockInRoleType::TruckDriver => {
                    require(state.truck.is_some(), "truck")?;
                    require(state.starting_mileage.is_some(), "starting_mileage")?;
                }
                ClockInRoleType::TruckEquipmentOperator => {
                    require(state.equipment.is_some(), "equipment")?;
                }
                _ => {}
            }
        }
        WorkRole::Tasco => {
            if !sub_role.skips_material() {
                require(state.material_type.is_some(), "material_type")?;
            }
            if sub_role.needs_equipment() {
                require(state.equipment.is_some(), "equipment")?;
            }
        }
    }

    Ok((role, sub_role))
}

fn require(present: bool, field: &'static str) -> Result<(), WizardError> {
    if present {
        Ok(())
    } else {
        Err(WizardError::MissingSelection(field))
    }
}

/// Assemble the role-specific payload from a validated state
pub fn build_payload(
    state: &WizardState,
    clock_in_type: &ClockInType,
    user_id: &str,
    session_id: &str,
    at: Coordinates,
    now: DateTime<Utc>,
    mechanic_cost_code: &str,
) -> Result<ClockInPayload, WizardError> {
    let (role, sub_role) = validate_selections(state)?;
    let jobsite_id = state
        .jobsite
        .as_ref()
        .map(|j| j.id.clone())
        .ok_or(WizardError::MissingSelection("jobsite"))?;

    let cost_code = match role {
        WorkRole::Mechanic => Some(mechanic_cost_code.to_string()),
        _ => state.cost_code.as_ref().map(|c| c.code.clone()),
    };

    let equipment_id = state.equipment.as_ref().map(|e| e.id.clone());
    let details = match role {
        WorkRole::General | WorkRole::Mechanic => RoleDetails::default(),
        WorkRole::Truck => RoleDetails {
            labor_type: Some(sub_role),
            truck: match sub_role {
                ClockInRoleType::TruckDriver => state.truck.as_ref().map(|t| t.id.clone()),
                _ => None,
            },
            equipment: match sub_role {
                ClockInRoleType::TruckEquipmentOperator => equipment_id,
                _ => None,
            },
            starting_mileage: match sub_role {
                ClockInRoleType::TruckDriver => state.starting_mileage,
                _ => None,
            },
            ..Default::default()
        },
        WorkRole::Tasco => RoleDetails {
            labor_type: Some(sub_role),
            equipment: if sub_role.needs_equipment() {
                equipment_id
            } else {
                None
            },
            material_type: if sub_role.skips_material() {
                None
            } else {
                state.material_type.clone()
            },
            shift_type: sub_role.shift_type().map(str::to_string),
            ..Default::default()
        },
    };

    let switch_jobs = match clock_in_type {
        ClockInType::Jobsite => None,
        ClockInType::SwitchJobs {
            previous_timesheet_id,
            ..
        } => {
            if previous_timesheet_id.trim().is_empty() {
                return Err(WizardError::MissingPreviousTimesheet);
            }
            Some(SwitchJobsClosure::new(
                previous_timesheet_id.clone(),
                now,
                at,
                state.comment.clone(),
            ))
        }
    };

    Ok(ClockInPayload {
        user_id: user_id.to_string(),
        session_id: session_id.to_string(),
        date: now,
        jobsite_id,
        cost_code,
        work_type: role,
        clock_in_lat: at.lat,
        clock_in_lng: at.lng,
        details,
        switch_jobs,
    })
}

/// Run the whole submission for a wizard sitting on its terminal step
pub async fn submit(
    ctx: &WizardContext,
    user_id: &str,
    clock_in_type: &ClockInType,
    state: &WizardState,
) -> Result<SubmitOutcome, WizardError> {
    if user_id.trim().is_empty() {
        return Err(WizardError::MissingUserId);
    }
    if !ctx.location.has_permission().await {
        return Err(WizardError::LocationPermissionDenied);
    }

    let (role, sub_role) = validate_selections(state)?;
    if state.step != terminal_step(role) {
        return Err(WizardError::InvalidTransition {
            step: state.step,
            action: "submit",
        });
    }
    if let ClockInType::SwitchJobs {
        previous_timesheet_id,
        ..
    } = clock_in_type
    {
        if previous_timesheet_id.trim().is_empty() {
            return Err(WizardError::MissingPreviousTimesheet);
        }
    }

    let at = ctx
        .location
        .stored_coordinates()
        .await
        .ok_or(WizardError::CoordinatesUnavailable)?;

    let now = Utc::now();
    let resolution = resolve_session(
        ctx.sessions.as_ref(),
        ctx.timesheets.as_ref(),
        user_id,
        now,
        ctx.rules.session_expiry(),
    )
    .await?;
    let session_id = resolution.session_id().to_string();

    if !ctx.location.is_tracking_active(&session_id).await {
        let tracking = ctx
            .location
            .start_clock_in_tracking(user_id, &session_id)
            .await;
        if !tracking.success {
            tracing::warn!(user_id, session_id = %session_id, "Failed to start location tracking");
        }
    }

    let payload = build_payload(
        state,
        clock_in_type,
        user_id,
        &session_id,
        at,
        now,
        &ctx.rules.mechanic_cost_code,
    )?;
    let created = ctx.timesheets.create_timesheet(&payload).await?;

    tracing::info!(
        user_id,
        session_id = %session_id,
        timesheet_id = %created.id,
        role = %role,
        sub_role = %sub_role,
        clock_in_type = clock_in_type.key(),
        "Clocked in"
    );

    if let Err(e) = ctx.sessions.set_timesheet_id(&session_id, &created.id).await {
        tracing::warn!(session_id = %session_id, error = %e, "Failed to link timesheet to session");
    }

    if let ClockInType::SwitchJobs {
        previous_timesheet_id,
        ..
    } = clock_in_type
    {
        let notification =
            Notification::job_switch(user_id, previous_timesheet_id, state.comment.as_deref());
        if let Err(e) = ctx.notifier.send_notification(notification).await {
            tracing::warn!(user_id, error = %e, "Failed to send job switch notification");
        }
    }

    update_preferences(ctx, user_id, role, sub_role).await;

    match ctx.timesheets.fetch_active_timesheet(user_id).await {
        Ok(Some(active)) => {
            tracing::debug!(timesheet_id = %active.id, "Active timesheet refreshed");
        }
        Ok(None) => tracing::warn!(user_id, "No active timesheet after clock-in"),
        Err(e) => tracing::warn!(user_id, error = %e, "Failed to refresh active timesheet"),
    }

    Ok(SubmitOutcome {
        timesheet_id: created.id,
        session_id,
        redirect: ctx.rules.dashboard_path.clone(),
    })
}

async fn update_preferences(
    ctx: &WizardContext,
    user_id: &str,
    role: WorkRole,
    sub_role: ClockInRoleType,
) {
    let prefs = &ctx.preferences;
    let results = [
        prefs.set_current_page_view(user_id, DASHBOARD_VIEW).await,
        prefs.set_work_role(user_id, role.key()).await,
        prefs.set_labor_type(user_id, sub_role.key()).await,
    ];
    for result in results {
        if let Err(e) = result {
            tracing::warn!(user_id, error = %e, "Failed to store preference");
        }
    }
}

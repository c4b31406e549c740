//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::types::{ClockInRoleType, ClockInType, SelectOption, ViewFlags, WorkRole};
use crate::wizard::WizardView;

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of wizards currently held in memory
    pub active_wizards: usize,
}

// =============================================================================
// Roles
// =============================================================================

/// Permission flags passed as query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RolesQuery {
    #[serde(default)]
    pub mechanic_view: bool,
    #[serde(default)]
    pub labor_view: bool,
    #[serde(default)]
    pub truck_view: bool,
    #[serde(default)]
    pub tasco_view: bool,
}

impl From<RolesQuery> for ViewFlags {
    fn from(q: RolesQuery) -> Self {
        ViewFlags {
            mechanic_view: q.mechanic_view,
            labor_view: q.labor_view,
            truck_view: q.truck_view,
            tasco_view: q.tasco_view,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleSummary {
    pub role: WorkRole,
    pub label: String,
    pub sub_roles: Vec<ClockInRoleType>,
}

impl From<WorkRole> for RoleSummary {
    fn from(role: WorkRole) -> Self {
        Self {
            role,
            label: role.label().to_string(),
            sub_roles: role.sub_roles().to_vec(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RolesResponse {
    pub roles: Vec<RoleSummary>,
    /// Set when exactly one role is available and will be picked automatically
    pub auto_selected: Option<WorkRole>,
}

// =============================================================================
// Wizards
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ClockInKind {
    #[default]
    Jobsite,
    SwitchJobs,
}

/// Request to open a clock-in wizard
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWizardRequest {
    pub user_id: String,
    #[serde(default)]
    pub clock_in_type: ClockInKind,
    /// Timesheet being closed (switch-jobs only)
    #[serde(default)]
    pub previous_timesheet_id: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub flags: ViewFlags,
}

impl CreateWizardRequest {
    pub fn clock_in_type(&self) -> ClockInType {
        match self.clock_in_type {
            ClockInKind::Jobsite => ClockInType::Jobsite,
            ClockInKind::SwitchJobs => ClockInType::SwitchJobs {
                previous_timesheet_id: self.previous_timesheet_id.clone().unwrap_or_default(),
                comment: self.comment.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WizardResponse {
    pub id: Uuid,
    pub wizard: WizardView,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRoleRequest {
    pub role: WorkRole,
    #[serde(default)]
    pub sub_role: Option<ClockInRoleType>,
}

/// Partial update of wizard selections; absent fields are left alone
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SelectionRequest {
    #[serde(default)]
    pub jobsite: Option<SelectOption>,
    #[serde(default)]
    pub cost_code: Option<SelectOption>,
    #[serde(default)]
    pub equipment: Option<SelectOption>,
    #[serde(default)]
    pub truck: Option<SelectOption>,
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub starting_mileage: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_to_jobsite() {
        let request: CreateWizardRequest =
            serde_json::from_str(r#"{"user_id": "u-1", "flags": {"labor_view": true}}"#).unwrap();
        assert_eq!(request.clock_in_type(), ClockInType::Jobsite);
        assert!(request.flags.labor_view);
    }

    #[test]
    fn test_create_request_switch_jobs() {
        let request: CreateWizardRequest = serde_json::from_str(
            r#"{"user_id": "u-1", "clock_in_type": "switchJobs", "previous_timesheet_id": "ts-2"}"#,
        )
        .unwrap();
        assert_eq!(
            request.clock_in_type(),
            ClockInType::SwitchJobs {
                previous_timesheet_id: "ts-2".into(),
                comment: None
            }
        );
    }

    #[test]
    fn test_role_summary() {
        let summary = RoleSummary::from(WorkRole::Truck);
        assert_eq!(summary.label, "Trucking");
        assert_eq!(summary.sub_roles.len(), 3);
    }
}

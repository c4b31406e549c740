//! Timesheet creation payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ClockInRoleType, Coordinates, WorkRole};

/// Body of the timesheet creation request.
///
/// Role-specific fields are omitted when they do not apply, and the
/// switch-jobs closure fields appear only when a previous timesheet is
/// being closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInPayload {
    pub user_id: String,
    pub session_id: String,
    pub date: DateTime<Utc>,
    pub jobsite_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_code: Option<String>,
    pub work_type: WorkRole,
    pub clock_in_lat: f64,
    pub clock_in_lng: f64,
    #[serde(flatten)]
    pub details: RoleDetails,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub switch_jobs: Option<SwitchJobsClosure>,
}

/// Fields that only some roles send
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_type: Option<ClockInRoleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_mileage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_type: Option<String>,
}

/// Closes out the previous timesheet when switching jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchJobsClosure {
    #[serde(rename = "previousTimeSheetId")]
    pub previous_timesheet_id: String,
    pub end_time: DateTime<Utc>,
    pub clock_out_lat: f64,
    pub clock_out_lng: f64,
    #[serde(default)]
    pub previous_job_comment: Option<String>,
}

impl SwitchJobsClosure {
    pub fn new(
        previous_timesheet_id: impl Into<String>,
        end_time: DateTime<Utc>,
        at: Coordinates,
        comment: Option<String>,
    ) -> Self {
        Self {
            previous_timesheet_id: previous_timesheet_id.into(),
            end_time,
            clock_out_lat: at.lat,
            clock_out_lng: at.lng,
            previous_job_comment: comment,
        }
    }
}

//! Timesheet records exchanged with the timesheet API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::{ClockInRoleType, WorkRole};
use super::select::SelectOption;

/// How the wizard was entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClockInType {
    /// Plain clock-in at a jobsite
    Jobsite,
    /// Close the running timesheet and open a new one in a single submit
    #[serde(rename_all = "camelCase")]
    SwitchJobs {
        previous_timesheet_id: String,
        #[serde(default)]
        comment: Option<String>,
    },
}

impl ClockInType {
    pub fn is_switch_jobs(&self) -> bool {
        matches!(self, ClockInType::SwitchJobs { .. })
    }

    pub fn key(&self) -> &'static str {
        match self {
            ClockInType::Jobsite => "jobsite",
            ClockInType::SwitchJobs { .. } => "switchJobs",
        }
    }
}

/// The user's most recent timesheet, used by "return to prior job"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousTimesheet {
    pub id: String,
    pub work_type: WorkRole,
    #[serde(default)]
    pub labor_type: Option<ClockInRoleType>,
    pub jobsite: SelectOption,
    #[serde(default)]
    pub cost_code: Option<SelectOption>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Role-specific details recorded against a previous timesheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousWork {
    #[serde(default)]
    pub equipment: Option<SelectOption>,
    #[serde(default)]
    pub truck: Option<SelectOption>,
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub shift_type: Option<String>,
    #[serde(default)]
    pub starting_mileage: Option<u32>,
}

/// Result of a successful timesheet creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTimesheet {
    pub id: String,
}

/// The timesheet currently open for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimesheet {
    pub id: String,
    pub work_type: WorkRole,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub jobsite_id: Option<String>,
}

//! Wizard steps and the mutable state a wizard carries between them

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::{ClockInRoleType, SelectOption, WorkRole};

/// Screen the wizard is currently showing.
///
/// `JobsiteConfirm` and `MaterialSelect` share index 3: general labor
/// confirms the scanned jobsite there, Tasco picks material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Loading,
    RoleSelect,
    JobsiteScan,
    JobsiteConfirm,
    MaterialSelect,
    Detail,
    Verify,
    TruckExtra,
}

impl WizardStep {
    /// Numeric position used by front ends that render steps by index
    pub fn index(&self) -> u8 {
        match self {
            WizardStep::Loading => 0,
            WizardStep::RoleSelect => 1,
            WizardStep::JobsiteScan => 2,
            WizardStep::JobsiteConfirm | WizardStep::MaterialSelect => 3,
            WizardStep::Detail => 4,
            WizardStep::Verify => 5,
            WizardStep::TruckExtra => 6,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            WizardStep::Loading => "loading",
            WizardStep::RoleSelect => "roleSelect",
            WizardStep::JobsiteScan => "jobsiteScan",
            WizardStep::JobsiteConfirm => "jobsiteConfirm",
            WizardStep::MaterialSelect => "materialSelect",
            WizardStep::Detail => "detail",
            WizardStep::Verify => "verify",
            WizardStep::TruckExtra => "truckExtra",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Everything the user has selected so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WizardState {
    pub step: WizardStep,
    /// Set when the user navigated back; suppresses auto-advance once
    pub came_from_back: bool,
    pub role: Option<WorkRole>,
    pub sub_role: Option<ClockInRoleType>,
    pub jobsite: Option<SelectOption>,
    pub cost_code: Option<SelectOption>,
    pub equipment: Option<SelectOption>,
    pub truck: Option<SelectOption>,
    pub material_type: Option<String>,
    pub shift_type: Option<String>,
    pub starting_mileage: Option<u32>,
    /// Fields were rebuilt from the previous timesheet
    pub return_path_used: bool,
    /// Comment closing out the previous job (switch-jobs only)
    pub comment: Option<String>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::Loading,
            came_from_back: false,
            role: None,
            sub_role: None,
            jobsite: None,
            cost_code: None,
            equipment: None,
            truck: None,
            material_type: None,
            shift_type: None,
            starting_mileage: None,
            return_path_used: false,
            comment: None,
            loading: false,
            last_error: None,
        }
    }
}

impl WizardState {
    /// Set role and sub-role together; the Tasco shift type follows the sub-role
    pub fn set_role(&mut self, role: WorkRole, sub_role: ClockInRoleType) {
        self.role = Some(role);
        self.sub_role = Some(sub_role);
        self.shift_type = sub_role.shift_type().map(str::to_string);
    }
}

//! Step routing for each role.
//!
//! Pure functions of `(step, role, sub_role)`; the controller applies
//! auto-advance and readiness waits on top of these.

use super::state::WizardStep;
use crate::types::{ClockInRoleType, WorkRole};

/// Step reached by "next", or None when there is no forward move
pub fn next_step(
    step: WizardStep,
    role: Option<WorkRole>,
    sub_role: Option<ClockInRoleType>,
) -> Option<WizardStep> {
    let role = role?;
    match step {
        WizardStep::Loading => None,
        WizardStep::RoleSelect => Some(WizardStep::JobsiteScan),
        WizardStep::JobsiteScan => Some(match role {
            WorkRole::General => WizardStep::JobsiteConfirm,
            WorkRole::Mechanic | WorkRole::Truck => WizardStep::Detail,
            WorkRole::Tasco if sub_role.is_some_and(|s| s.skips_material()) => WizardStep::Detail,
            WorkRole::Tasco => WizardStep::MaterialSelect,
        }),
        WizardStep::JobsiteConfirm | WizardStep::MaterialSelect => Some(WizardStep::Detail),
        WizardStep::Detail => Some(WizardStep::Verify),
        WizardStep::Verify if role == WorkRole::Truck => Some(WizardStep::TruckExtra),
        WizardStep::Verify | WizardStep::TruckExtra => None,
    }
}

/// Step reached by "back", or None at the start of the wizard
pub fn prev_step(
    step: WizardStep,
    role: Option<WorkRole>,
    sub_role: Option<ClockInRoleType>,
) -> Option<WizardStep> {
    match step {
        WizardStep::Loading | WizardStep::RoleSelect => None,
        WizardStep::JobsiteScan => Some(WizardStep::RoleSelect),
        WizardStep::JobsiteConfirm | WizardStep::MaterialSelect => Some(WizardStep::JobsiteScan),
        WizardStep::Detail => Some(match role {
            Some(WorkRole::General) => WizardStep::JobsiteConfirm,
            Some(WorkRole::Tasco) if !sub_role.is_some_and(|s| s.skips_material()) => {
                WizardStep::MaterialSelect
            }
            _ => WizardStep::JobsiteScan,
        }),
        WizardStep::Verify => Some(WizardStep::Detail),
        WizardStep::TruckExtra => Some(WizardStep::Verify),
    }
}

/// The step a role submits from
pub fn terminal_step(role: WorkRole) -> WizardStep {
    match role {
        WorkRole::Truck => WizardStep::TruckExtra,
        _ => WizardStep::Verify,
    }
}

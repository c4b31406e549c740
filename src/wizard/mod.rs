//! Clock-in wizard controller.
//!
//! `ClockInWizard` owns the `WizardState` of one clock-in attempt. Callers
//! mutate selections through the setters, move with `handle_next_step` /
//! `handle_prev_step`, and finish with `submit`. Routing is in
//! `transitions`; payload assembly and the submit pipeline live in
//! `crate::submit`.

mod context;
mod error;
mod roles;
mod state;
mod transitions;

#[cfg(test)]
mod tests;

pub use context::WizardContext;
pub use error::WizardError;
pub use roles::roles;
pub use state::{WizardState, WizardStep};
pub use transitions::{next_step, prev_step, terminal_step};

use serde::Serialize;
use utoipa::ToSchema;

use crate::submit::{self, SubmitOutcome};
use crate::types::{ClockInRoleType, ClockInType, SelectOption, ViewFlags, WorkRole};

/// Serializable snapshot of a wizard for front ends
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WizardView {
    pub user_id: String,
    #[schema(value_type = Object)]
    pub clock_in_type: ClockInType,
    pub step: WizardStep,
    /// Numeric position of `step`
    pub step_index: u8,
    pub available_roles: Vec<WorkRole>,
    pub state: WizardState,
    /// Whether `submit` is legal on the current step
    pub can_submit: bool,
}

/// One clock-in attempt
pub struct ClockInWizard {
    ctx: WizardContext,
    user_id: String,
    clock_in_type: ClockInType,
    available_roles: Vec<WorkRole>,
    state: WizardState,
}

impl ClockInWizard {
    pub fn new(ctx: WizardContext, user_id: impl Into<String>, clock_in_type: ClockInType) -> Self {
        let mut state = WizardState::default();
        if let ClockInType::SwitchJobs { comment, .. } = &clock_in_type {
            state.comment.clone_from(comment);
        }
        Self {
            ctx,
            user_id: user_id.into(),
            clock_in_type,
            available_roles: Vec::new(),
            state,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn clock_in_type(&self) -> &ClockInType {
        &self.clock_in_type
    }

    pub fn available_roles(&self) -> &[WorkRole] {
        &self.available_roles
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            user_id: self.user_id.clone(),
            clock_in_type: self.clock_in_type.clone(),
            step: self.state.step,
            step_index: self.state.step.index(),
            available_roles: self.available_roles.clone(),
            state: self.state.clone(),
            can_submit: self
                .state
                .role
                .is_some_and(|role| terminal_step(role) == self.state.step),
        }
    }

    /// Leave `Loading` once the user's permissions are known.
    ///
    /// A single available role is selected automatically with its default
    /// sub-role and the wizard lands on `JobsiteScan`; switch-jobs
    /// clock-ins still stop on `RoleSelect` so the role can be confirmed.
    pub async fn start(&mut self, flags: ViewFlags) -> Result<WizardStep, WizardError> {
        if self.state.step != WizardStep::Loading {
            return Err(self.invalid("start"));
        }

        self.available_roles = roles(&flags);
        match self.available_roles.as_slice() {
            [] => {
                tracing::warn!(user_id = %self.user_id, "No clock-in roles enabled");
                return Err(WizardError::NoRolesAvailable);
            }
            [only] => {
                let role = *only;
                self.state.set_role(role, role.default_sub_role());
                self.state.step = if self.clock_in_type.is_switch_jobs() {
                    WizardStep::RoleSelect
                } else {
                    WizardStep::JobsiteScan
                };
            }
            _ => self.state.step = WizardStep::RoleSelect,
        }

        tracing::debug!(
            user_id = %self.user_id,
            step = %self.state.step,
            roles = ?self.available_roles,
            "Wizard started"
        );
        Ok(self.state.step)
    }

    /// Choose the role, and optionally the sub-role (defaults per role)
    pub fn select_role(
        &mut self,
        role: WorkRole,
        sub_role: Option<ClockInRoleType>,
    ) -> Result<(), WizardError> {
        self.ensure_editable("role", &[WizardStep::RoleSelect, WizardStep::JobsiteScan])?;
        if !self.available_roles.contains(&role) {
            return Err(WizardError::RoleNotAvailable(role));
        }
        let sub_role = sub_role.unwrap_or_else(|| role.default_sub_role());
        if sub_role.role() != role {
            return Err(WizardError::SubRoleMismatch { role, sub_role });
        }

        self.state.set_role(role, sub_role);
        tracing::debug!(user_id = %self.user_id, role = %role, sub_role = %sub_role, "Role selected");
        Ok(())
    }

    pub fn set_jobsite(&mut self, jobsite: SelectOption) -> Result<(), WizardError> {
        self.ensure_editable(
            "jobsite",
            &[WizardStep::JobsiteScan, WizardStep::JobsiteConfirm],
        )?;
        self.state.jobsite = Some(jobsite);
        Ok(())
    }

    pub fn set_material_type(&mut self, material: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable("material_type", &[WizardStep::MaterialSelect])?;
        self.state.material_type = Some(material.into());
        Ok(())
    }

    pub fn set_cost_code(&mut self, cost_code: SelectOption) -> Result<(), WizardError> {
        self.ensure_editable("cost_code", &[WizardStep::Detail])?;
        self.state.cost_code = Some(cost_code);
        Ok(())
    }

    pub fn set_equipment(&mut self, equipment: SelectOption) -> Result<(), WizardError> {
        self.ensure_editable("equipment", &[WizardStep::Detail])?;
        self.state.equipment = Some(equipment);
        Ok(())
    }

    pub fn set_truck(&mut self, truck: SelectOption) -> Result<(), WizardError> {
        self.ensure_editable("truck", &[WizardStep::Detail])?;
        self.state.truck = Some(truck);
        Ok(())
    }

    pub fn set_starting_mileage(&mut self, mileage: u32) -> Result<(), WizardError> {
        self.ensure_editable(
            "starting_mileage",
            &[WizardStep::Detail, WizardStep::TruckExtra],
        )?;
        self.state.starting_mileage = Some(mileage);
        Ok(())
    }

    /// Comment closing out the previous job; legal on any step
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.state.comment = comment.filter(|c| !c.trim().is_empty());
    }

    pub async fn handle_next_step(&mut self) -> Result<WizardStep, WizardError> {
        if self.state.loading {
            return Err(WizardError::AlreadySubmitting);
        }
        if self.state.step == WizardStep::RoleSelect && self.state.role.is_none() {
            return Err(WizardError::MissingSelection("role"));
        }
        if self.state.step == WizardStep::JobsiteScan && self.state.jobsite.is_none() {
            return Err(WizardError::MissingSelection("jobsite"));
        }

        let next = next_step(self.state.step, self.state.role, self.state.sub_role)
            .ok_or_else(|| self.invalid("advance"))?;

        self.state.came_from_back = false;
        self.enter(next).await;
        Ok(self.state.step)
    }

    pub fn handle_prev_step(&mut self) -> Result<WizardStep, WizardError> {
        if self.state.loading {
            return Err(WizardError::AlreadySubmitting);
        }
        let prev = prev_step(self.state.step, self.state.role, self.state.sub_role)
            .ok_or_else(|| self.invalid("go back"))?;

        tracing::debug!(from = %self.state.step, to = %prev, "Wizard step back");
        self.state.step = prev;
        self.state.came_from_back = true;
        Ok(prev)
    }

    /// Rebuild selections from the user's most recent timesheet and jump
    /// to verification (mechanics land on the detail step).
    ///
    /// Leaves the state untouched when either record is missing.
    pub async fn handle_return(&mut self) -> Result<WizardStep, WizardError> {
        if self.state.loading {
            return Err(WizardError::AlreadySubmitting);
        }
        self.ensure_editable("return", &[WizardStep::RoleSelect, WizardStep::JobsiteScan])?;

        let previous = self
            .ctx
            .timesheets
            .fetch_recent_timesheet(&self.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %self.user_id, "No previous timesheet to return to");
                WizardError::NoPreviousTimesheet
            })?;

        let work = self
            .ctx
            .timesheets
            .fetch_previous_work(&previous.id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(timesheet_id = %previous.id, "Previous timesheet has no work record");
                WizardError::NoPreviousWork(previous.id.clone())
            })?;

        let role = previous.work_type;
        if !self.available_roles.contains(&role) {
            return Err(WizardError::RoleNotAvailable(role));
        }
        let sub_role = previous
            .labor_type
            .filter(|s| s.role() == role)
            .unwrap_or_else(|| role.default_sub_role());

        let mut state = WizardState {
            comment: self.state.comment.take(),
            jobsite: Some(previous.jobsite),
            cost_code: previous.cost_code,
            equipment: work.equipment,
            truck: work.truck,
            material_type: work.material_type,
            starting_mileage: work.starting_mileage,
            return_path_used: true,
            ..WizardState::default()
        };
        state.set_role(role, sub_role);
        if work.shift_type.is_some() {
            state.shift_type = work.shift_type;
        }
        state.step = match role {
            WorkRole::Mechanic => WizardStep::Detail,
            _ => WizardStep::Verify,
        };
        self.state = state;

        tracing::info!(
            user_id = %self.user_id,
            timesheet_id = %previous.id,
            role = %role,
            step = %self.state.step,
            "Returned to previous job"
        );
        Ok(self.state.step)
    }

    /// Submit from the role's terminal step.
    ///
    /// On failure the step is unchanged and `last_error` holds the message.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WizardError> {
        if self.state.loading {
            return Err(WizardError::AlreadySubmitting);
        }
        self.state.loading = true;
        self.state.last_error = None;

        let result = submit::submit(&self.ctx, &self.user_id, &self.clock_in_type, &self.state).await;
        self.state.loading = false;

        match result {
            Ok(outcome) => {
                self.state.comment = None;
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(
                    user_id = %self.user_id,
                    step = %self.state.step,
                    error = %e,
                    "Clock-in submission failed"
                );
                self.state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn enter(&mut self, step: WizardStep) {
        tracing::debug!(from = %self.state.step, to = %step, "Wizard step forward");

        if step == WizardStep::Detail {
            if self.state.sub_role.is_some_and(|s| s.needs_equipment()) {
                self.ctx.data_ready.wait().await;
            }
            if self.state.sub_role.is_some_and(|s| s.skips_equipment()) && !self.state.came_from_back
            {
                tracing::debug!("No equipment for this shift, skipping to verification");
                self.state.step = WizardStep::Verify;
                return;
            }
        }

        self.state.step = step;
    }

    fn ensure_editable(
        &self,
        field: &'static str,
        steps: &[WizardStep],
    ) -> Result<(), WizardError> {
        if self.state.loading {
            return Err(WizardError::AlreadySubmitting);
        }
        if steps.contains(&self.state.step) {
            Ok(())
        } else {
            Err(WizardError::NotEditable {
                field,
                step: self.state.step,
            })
        }
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            step: self.state.step,
            action,
        }
    }
}

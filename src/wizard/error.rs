//! Errors returned by wizard operations

use thiserror::Error;

use super::state::WizardStep;
use crate::api::ApiError;
use crate::session::SessionError;
use crate::types::{ClockInRoleType, WorkRole};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("user id is missing")]
    MissingUserId,

    #[error("location permission has not been granted")]
    LocationPermissionDenied,

    #[error("no stored coordinates are available")]
    CoordinatesUnavailable,

    #[error("required selection '{0}' is missing")]
    MissingSelection(&'static str),

    #[error("role '{0}' is not available to this user")]
    RoleNotAvailable(WorkRole),

    #[error("sub-role '{sub_role}' does not belong to role '{role}'")]
    SubRoleMismatch {
        role: WorkRole,
        sub_role: ClockInRoleType,
    },

    #[error("no clock-in roles are enabled for this user")]
    NoRolesAvailable,

    #[error("cannot {action} from step {step}")]
    InvalidTransition {
        step: WizardStep,
        action: &'static str,
    },

    #[error("'{field}' cannot be changed on step {step}")]
    NotEditable {
        field: &'static str,
        step: WizardStep,
    },

    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error("switch-jobs clock-in requires the previous timesheet id")]
    MissingPreviousTimesheet,

    #[error("no previous timesheet found for this user")]
    NoPreviousTimesheet,

    #[error("no work record found for timesheet '{0}'")]
    NoPreviousWork(String),

    #[error("timesheet API error: {0}")]
    Api(#[from] ApiError),

    #[error("session error: {0}")]
    Session(String),
}

impl From<SessionError> for WizardError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Create(api) => WizardError::Api(api),
            other => WizardError::Session(other.to_string()),
        }
    }
}

impl WizardError {
    /// Whether the caller can fix the error by changing wizard input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WizardError::MissingUserId
                | WizardError::MissingSelection(_)
                | WizardError::RoleNotAvailable(_)
                | WizardError::SubRoleMismatch { .. }
                | WizardError::NotEditable { .. }
                | WizardError::MissingPreviousTimesheet
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_create_error_maps_to_api() {
        let err: WizardError =
            SessionError::Create(ApiError::network("/api/v1/sessions", "offline")).into();
        assert!(matches!(err, WizardError::Api(_)));

        let err: WizardError = SessionError::NotFound("s-1".into()).into();
        assert_eq!(err, WizardError::Session("session 's-1' not found".into()));
    }

    #[test]
    fn test_display_messages() {
        let err = WizardError::InvalidTransition {
            step: WizardStep::Verify,
            action: "advance",
        };
        assert_eq!(err.to_string(), "cannot advance from step verify");
        assert_eq!(
            WizardError::MissingSelection("jobsite").to_string(),
            "required selection 'jobsite' is missing"
        );
    }
}

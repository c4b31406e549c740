//! Timesheet backend collaborators.
//!
//! The wizard talks to the backend only through the `TimesheetApi` and
//! `CatalogApi` traits so tests can substitute in-memory doubles.

pub mod error;
mod http;

pub use error::ApiError;
pub use http::HttpTimesheetApi;

use async_trait::async_trait;

use crate::submit::ClockInPayload;
use crate::types::{
    ActiveTimesheet, CreatedTimesheet, PreviousTimesheet, PreviousWork, SelectOption,
};

/// Timesheet reads and mutations used by the clock-in wizard
#[async_trait]
pub trait TimesheetApi: Send + Sync {
    /// Most recent timesheet for the user, if any
    async fn fetch_recent_timesheet(
        &self,
        user_id: &str,
    ) -> Result<Option<PreviousTimesheet>, ApiError>;

    /// Role-specific work record attached to a timesheet, if any
    async fn fetch_previous_work(&self, timesheet_id: &str)
        -> Result<Option<PreviousWork>, ApiError>;

    /// Open a new clock session and return its id
    async fn create_session(&self, user_id: &str) -> Result<String, ApiError>;

    /// Create the timesheet described by the payload
    async fn create_timesheet(
        &self,
        payload: &ClockInPayload,
    ) -> Result<CreatedTimesheet, ApiError>;

    /// Currently open timesheet for the user
    async fn fetch_active_timesheet(
        &self,
        user_id: &str,
    ) -> Result<Option<ActiveTimesheet>, ApiError>;
}

/// Dropdown reference data
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn jobsites(&self) -> Result<Vec<SelectOption>, ApiError>;
    async fn cost_codes(&self) -> Result<Vec<SelectOption>, ApiError>;
    async fn equipment(&self) -> Result<Vec<SelectOption>, ApiError>;
    async fn trucks(&self) -> Result<Vec<SelectOption>, ApiError>;
}

//! timeclock - clock-in wizard and timesheet submission for workforce time tracking
//!
//! The library exposes the wizard state machine, the submission pipeline,
//! the collaborator traits it depends on, and the REST surface that hosts
//! wizards for a web front end.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod location;
pub mod logging;
pub mod mock;
pub mod notifications;
pub mod preferences;
pub mod rest;
pub mod session;
pub mod submit;
pub mod types;
pub mod wizard;

pub use submit::{ClockInPayload, SubmitOutcome};
pub use wizard::{roles, ClockInWizard, WizardContext, WizardError, WizardState, WizardStep};

//! Collaborators a wizard needs, injected as trait objects

use std::sync::Arc;

use crate::api::TimesheetApi;
use crate::catalog::DataReady;
use crate::config::WizardConfig;
use crate::location::LocationTracker;
use crate::notifications::Notifier;
use crate::preferences::Preferences;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct WizardContext {
    pub timesheets: Arc<dyn TimesheetApi>,
    pub sessions: Arc<dyn SessionStore>,
    pub location: Arc<dyn LocationTracker>,
    pub notifier: Arc<dyn Notifier>,
    pub preferences: Arc<dyn Preferences>,
    /// Raised once equipment and the other dropdown lists have loaded
    pub data_ready: DataReady,
    pub rules: WizardConfig,
}

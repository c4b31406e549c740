//! Wiring of concrete collaborators from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::HttpTimesheetApi;
use crate::catalog::{data_ready, Catalog};
use crate::config::Config;
use crate::location::FixedLocation;
use crate::notifications::NotificationService;
use crate::preferences::FilePreferences;
use crate::session::FileSessionStore;
use crate::wizard::WizardContext;

/// Collaborators shared by every wizard a process runs
pub struct App {
    pub config: Config,
    pub context: WizardContext,
    pub catalog: Catalog,
}

impl App {
    /// HTTP backend, file-backed stores under the state directory, fixed
    /// location and the configured notification integrations
    pub fn new(config: Config) -> Result<Self> {
        let api = Arc::new(
            HttpTimesheetApi::new(&config.api).context("Failed to create timesheet API client")?,
        );
        let sessions = Arc::new(
            FileSessionStore::open(config.sessions_file()).context("Failed to open session store")?,
        );
        let preferences = Arc::new(
            FilePreferences::open(config.preferences_file())
                .context("Failed to open preferences")?,
        );

        let (ready_handle, ready) = data_ready();
        let catalog = Catalog::new(
            api.clone(),
            Duration::from_secs(config.wizard.catalog_ttl_secs),
            ready_handle,
        );

        let context = WizardContext {
            timesheets: api,
            sessions,
            location: Arc::new(FixedLocation::from_config(&config.location)),
            notifier: Arc::new(NotificationService::from_config(&config.notifications)),
            preferences,
            data_ready: ready,
            rules: config.wizard.clone(),
        };

        Ok(Self {
            config,
            context,
            catalog,
        })
    }
}

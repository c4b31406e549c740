//! API state management for the REST server.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::wizard::{ClockInWizard, WizardContext};

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Live wizards keyed by the id handed to the front end
    pub wizards: Arc<RwLock<HashMap<Uuid, ClockInWizard>>>,
    /// Collaborators every new wizard is created with
    pub context: WizardContext,
    pub catalog: Catalog,
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(config: Config, context: WizardContext, catalog: Catalog) -> Self {
        Self {
            wizards: Arc::new(RwLock::new(HashMap::new())),
            context,
            catalog,
            config: Arc::new(config),
        }
    }

    /// Wire the HTTP backend and file-backed stores from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let app = App::new(config)?;
        Ok(Self::new(app.config, app.context, app.catalog))
    }

    pub async fn wizard_count(&self) -> usize {
        self.wizards.read().await.len()
    }
}

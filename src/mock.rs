//! Recording test doubles for every collaborator trait.
//!
//! Used by unit tests and by the integration tests under `tests/`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;

use crate::api::{ApiError, CatalogApi, TimesheetApi};
use crate::catalog::{CatalogData, DataReady};
use crate::config::WizardConfig;
use crate::location::{LocationTracker, TrackingResult};
use crate::notifications::{Notification, Notifier};
use crate::preferences::InMemoryPreferences;
use crate::session::InMemorySessionStore;
use crate::submit::ClockInPayload;
use crate::types::{
    ActiveTimesheet, Coordinates, CreatedTimesheet, PreviousTimesheet, PreviousWork, SelectOption,
};
use crate::wizard::WizardContext;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory timesheet backend
#[derive(Default)]
pub struct MockTimesheetApi {
    recent: Mutex<Option<PreviousTimesheet>>,
    previous_work: Mutex<HashMap<String, PreviousWork>>,
    active: Mutex<Option<ActiveTimesheet>>,
    create_session_error: Mutex<Option<ApiError>>,
    create_timesheet_error: Mutex<Option<ApiError>>,
    session_calls: AtomicUsize,
    payloads: Mutex<Vec<ClockInPayload>>,
}

impl MockTimesheetApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_recent_timesheet(&self, timesheet: Option<PreviousTimesheet>) {
        *lock(&self.recent) = timesheet;
    }

    pub fn set_previous_work(&self, timesheet_id: &str, work: PreviousWork) {
        lock(&self.previous_work).insert(timesheet_id.to_string(), work);
    }

    pub fn fail_create_session(&self, error: ApiError) {
        *lock(&self.create_session_error) = Some(error);
    }

    pub fn fail_create_timesheet(&self, error: ApiError) {
        *lock(&self.create_timesheet_error) = Some(error);
    }

    pub fn create_session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    /// Every payload passed to `create_timesheet`, in order
    pub fn payloads(&self) -> Vec<ClockInPayload> {
        lock(&self.payloads).clone()
    }

    pub fn last_payload(&self) -> Option<ClockInPayload> {
        lock(&self.payloads).last().cloned()
    }
}

#[async_trait]
impl TimesheetApi for MockTimesheetApi {
    async fn fetch_recent_timesheet(
        &self,
        _user_id: &str,
    ) -> Result<Option<PreviousTimesheet>, ApiError> {
        Ok(lock(&self.recent).clone())
    }

    async fn fetch_previous_work(
        &self,
        timesheet_id: &str,
    ) -> Result<Option<PreviousWork>, ApiError> {
        Ok(lock(&self.previous_work).get(timesheet_id).cloned())
    }

    async fn create_session(&self, _user_id: &str) -> Result<String, ApiError> {
        let n = self.session_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(err) = lock(&self.create_session_error).clone() {
            return Err(err);
        }
        Ok(format!("session-{}", n))
    }

    async fn create_timesheet(
        &self,
        payload: &ClockInPayload,
    ) -> Result<CreatedTimesheet, ApiError> {
        if let Some(err) = lock(&self.create_timesheet_error).clone() {
            return Err(err);
        }
        let mut payloads = lock(&self.payloads);
        payloads.push(payload.clone());
        let id = format!("timesheet-{}", payloads.len());

        *lock(&self.active) = Some(ActiveTimesheet {
            id: id.clone(),
            work_type: payload.work_type,
            start_time: payload.date,
            jobsite_id: Some(payload.jobsite_id.clone()),
        });
        Ok(CreatedTimesheet { id })
    }

    async fn fetch_active_timesheet(
        &self,
        _user_id: &str,
    ) -> Result<Option<ActiveTimesheet>, ApiError> {
        Ok(lock(&self.active).clone())
    }
}

/// Reference data served from memory
pub struct MockCatalogApi {
    data: CatalogData,
    equipment_error: Mutex<Option<ApiError>>,
    loads: AtomicUsize,
    gate: watch::Sender<bool>,
}

impl Default for MockCatalogApi {
    fn default() -> Self {
        Self {
            data: CatalogData::default(),
            equipment_error: Mutex::new(None),
            loads: AtomicUsize::new(0),
            gate: watch::channel(true).0,
        }
    }
}

impl MockCatalogApi {
    pub fn with_data(data: CatalogData) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    pub fn fail_equipment(&self, error: ApiError) {
        *lock(&self.equipment_error) = Some(error);
    }

    /// Number of full catalog fetches (counted on the jobsite request)
    pub fn load_calls(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Make jobsite requests block until `release_loads`
    pub fn hold_loads(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_loads(&self) {
        self.gate.send_replace(true);
    }
}

#[async_trait]
impl CatalogApi for MockCatalogApi {
    async fn jobsites(&self) -> Result<Vec<SelectOption>, ApiError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let mut gate = self.gate.subscribe();
        // The sender lives in `self`, so this cannot fail while we borrow it
        let _ = gate.wait_for(|open| *open).await;
        Ok(self.data.jobsites.clone())
    }

    async fn cost_codes(&self) -> Result<Vec<SelectOption>, ApiError> {
        Ok(self.data.cost_codes.clone())
    }

    async fn equipment(&self) -> Result<Vec<SelectOption>, ApiError> {
        match lock(&self.equipment_error).clone() {
            Some(err) => Err(err),
            None => Ok(self.data.equipment.clone()),
        }
    }

    async fn trucks(&self) -> Result<Vec<SelectOption>, ApiError> {
        Ok(self.data.trucks.clone())
    }
}

/// Location source with switchable permission, coordinates and tracking
pub struct MockLocation {
    permission: AtomicBool,
    coordinates: Mutex<Option<Coordinates>>,
    tracked_sessions: Mutex<HashSet<String>>,
    tracking_succeeds: AtomicBool,
    starts: Mutex<Vec<(String, String)>>,
}

impl Default for MockLocation {
    fn default() -> Self {
        Self {
            permission: AtomicBool::new(true),
            coordinates: Mutex::new(Some(Coordinates::new(40.2338, -111.6585))),
            tracked_sessions: Mutex::new(HashSet::new()),
            tracking_succeeds: AtomicBool::new(true),
            starts: Mutex::new(Vec::new()),
        }
    }
}

impl MockLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission.store(granted, Ordering::SeqCst);
    }

    pub fn set_coordinates(&self, coordinates: Option<Coordinates>) {
        *lock(&self.coordinates) = coordinates;
    }

    /// Mark a session as already tracked
    pub fn set_tracking_active(&self, session_id: &str) {
        lock(&self.tracked_sessions).insert(session_id.to_string());
    }

    pub fn fail_tracking(&self) {
        self.tracking_succeeds.store(false, Ordering::SeqCst);
    }

    pub fn start_calls(&self) -> usize {
        lock(&self.starts).len()
    }

    /// `(user_id, session_id)` of every tracking start, in call order
    pub fn tracking_starts(&self) -> Vec<(String, String)> {
        lock(&self.starts).clone()
    }
}

#[async_trait]
impl LocationTracker for MockLocation {
    async fn has_permission(&self) -> bool {
        self.permission.load(Ordering::SeqCst)
    }

    async fn stored_coordinates(&self) -> Option<Coordinates> {
        *lock(&self.coordinates)
    }

    async fn start_clock_in_tracking(&self, user_id: &str, session_id: &str) -> TrackingResult {
        lock(&self.starts).push((user_id.to_string(), session_id.to_string()));
        let success = self.tracking_succeeds.load(Ordering::SeqCst);
        if success {
            lock(&self.tracked_sessions).insert(session_id.to_string());
        }
        TrackingResult { success }
    }

    async fn is_tracking_active(&self, session_id: &str) -> bool {
        lock(&self.tracked_sessions).contains(session_id)
    }
}

/// Notifier that records what it was asked to send
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Notification> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_notification(&self, notification: Notification) -> anyhow::Result<()> {
        lock(&self.sent).push(notification);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("notification backend unavailable");
        }
        Ok(())
    }
}

/// The full set of doubles behind one `WizardContext`
pub struct MockCollaborators {
    pub timesheets: Arc<MockTimesheetApi>,
    pub sessions: Arc<InMemorySessionStore>,
    pub location: Arc<MockLocation>,
    pub notifier: Arc<MockNotifier>,
    pub preferences: Arc<InMemoryPreferences>,
}

impl Default for MockCollaborators {
    fn default() -> Self {
        Self {
            timesheets: Arc::new(MockTimesheetApi::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            location: Arc::new(MockLocation::new()),
            notifier: Arc::new(MockNotifier::new()),
            preferences: Arc::new(InMemoryPreferences::new()),
        }
    }
}

impl MockCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with reference data already loaded and default rules
    pub fn context(&self) -> WizardContext {
        self.context_with(DataReady::ready())
    }

    pub fn context_with(&self, data_ready: DataReady) -> WizardContext {
        WizardContext {
            timesheets: self.timesheets.clone(),
            sessions: self.sessions.clone(),
            location: self.location.clone(),
            notifier: self.notifier.clone(),
            preferences: self.preferences.clone(),
            data_ready,
            rules: WizardConfig::default(),
        }
    }
}

/// A previous timesheet record for return-path tests
pub fn previous_timesheet(
    id: &str,
    work_type: crate::types::WorkRole,
    labor_type: Option<crate::types::ClockInRoleType>,
) -> PreviousTimesheet {
    PreviousTimesheet {
        id: id.to_string(),
        work_type,
        labor_type,
        jobsite: SelectOption::new("js-1", "North Yard", "J-104"),
        cost_code: Some(SelectOption::new("cc-1", "Grading", "#01.20")),
        end_time: Some(Utc::now()),
    }
}

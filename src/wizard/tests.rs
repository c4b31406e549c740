//! Tests for the clock-in wizard controller

use std::time::Duration;

use super::*;
use crate::api::ApiError;
use crate::catalog::data_ready;
use crate::mock::{previous_timesheet, MockCollaborators};
use crate::session::SessionStore;
use crate::types::{PreviousWork, Session};

fn flags(roles: &[WorkRole]) -> ViewFlags {
    ViewFlags {
        mechanic_view: roles.contains(&WorkRole::Mechanic),
        labor_view: roles.contains(&WorkRole::General),
        truck_view: roles.contains(&WorkRole::Truck),
        tasco_view: roles.contains(&WorkRole::Tasco),
    }
}

fn jobsite() -> SelectOption {
    SelectOption::new("js-1", "North Yard", "J-104")
}

fn cost_code() -> SelectOption {
    SelectOption::new("cc-1", "Grading", "#01.20")
}

async fn started(mocks: &MockCollaborators, roles: &[WorkRole]) -> ClockInWizard {
    let mut wizard = ClockInWizard::new(mocks.context(), "u-1", ClockInType::Jobsite);
    wizard.start(flags(roles)).await.unwrap();
    wizard
}

#[tokio::test]
async fn test_single_role_auto_selects_and_skips_role_select() {
    let mocks = MockCollaborators::new();
    let wizard = started(&mocks, &[WorkRole::Truck]).await;

    assert_eq!(wizard.step(), WizardStep::JobsiteScan);
    assert_eq!(wizard.state().role, Some(WorkRole::Truck));
    assert_eq!(wizard.state().sub_role, Some(ClockInRoleType::TruckDriver));
    assert_eq!(wizard.available_roles(), &[WorkRole::Truck]);
}

#[tokio::test]
async fn test_single_role_switch_jobs_stops_on_role_select() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(
        mocks.context(),
        "u-1",
        ClockInType::SwitchJobs {
            previous_timesheet_id: "ts-1".into(),
            comment: Some("wrapped up early".into()),
        },
    );

    let step = wizard.start(flags(&[WorkRole::General])).await.unwrap();

    assert_eq!(step, WizardStep::RoleSelect);
    assert_eq!(wizard.state().role, Some(WorkRole::General));
    assert_eq!(wizard.state().comment.as_deref(), Some("wrapped up early"));
}

#[tokio::test]
async fn test_multiple_roles_require_selection() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::General, WorkRole::Tasco]).await;

    assert_eq!(wizard.step(), WizardStep::RoleSelect);
    assert!(wizard.state().role.is_none());
    assert_eq!(
        wizard.handle_next_step().await.unwrap_err(),
        WizardError::MissingSelection("role")
    );

    wizard.select_role(WorkRole::General, None).unwrap();
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::JobsiteScan);
}

#[tokio::test]
async fn test_no_roles_is_an_error() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(mocks.context(), "u-1", ClockInType::Jobsite);

    let err = wizard.start(ViewFlags::default()).await.unwrap_err();
    assert_eq!(err, WizardError::NoRolesAvailable);
    assert_eq!(wizard.step(), WizardStep::Loading);
}

#[tokio::test]
async fn test_select_role_rejects_unavailable_and_mismatched() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::General, WorkRole::Tasco]).await;

    assert_eq!(
        wizard.select_role(WorkRole::Truck, None).unwrap_err(),
        WizardError::RoleNotAvailable(WorkRole::Truck)
    );
    assert!(matches!(
        wizard.select_role(WorkRole::Tasco, Some(ClockInRoleType::TruckLabor)),
        Err(WizardError::SubRoleMismatch { .. })
    ));

    wizard
        .select_role(WorkRole::Tasco, Some(ClockInRoleType::TascoFEquipment))
        .unwrap();
    assert_eq!(wizard.state().shift_type.as_deref(), Some("F Shift"));
}

#[tokio::test]
async fn test_jobsite_required_to_leave_scan() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;

    assert_eq!(
        wizard.handle_next_step().await.unwrap_err(),
        WizardError::MissingSelection("jobsite")
    );
}

#[tokio::test]
async fn test_setter_refused_on_wrong_step() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::General]).await;

    assert_eq!(
        wizard.set_cost_code(cost_code()).unwrap_err(),
        WizardError::NotEditable {
            field: "cost_code",
            step: WizardStep::JobsiteScan
        }
    );
}

#[tokio::test]
async fn test_general_flow_confirms_jobsite() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::General]).await;

    wizard.set_jobsite(jobsite()).unwrap();
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::JobsiteConfirm);
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::Detail);
    wizard.set_cost_code(cost_code()).unwrap();
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::Verify);
    assert!(wizard.view().can_submit);

    let outcome = wizard.submit().await.unwrap();
    assert_eq!(outcome.redirect, "/dashboard");

    let payload = mocks.timesheets.last_payload().unwrap();
    assert_eq!(payload.cost_code.as_deref(), Some("#01.20"));
    assert_eq!(payload.work_type, WorkRole::General);
}

#[tokio::test]
async fn test_tasco_abcd_labor_auto_advances_past_detail() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::Tasco]).await;
    assert_eq!(wizard.state().sub_role, Some(ClockInRoleType::TascoAbcdLabor));

    wizard.set_jobsite(jobsite()).unwrap();
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::MaterialSelect);
    wizard.set_material_type("Gravel").unwrap();
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::Verify);
}

#[tokio::test]
async fn test_tasco_abcd_labor_back_into_detail_does_not_loop() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::Tasco]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.set_material_type("Gravel").unwrap();
    wizard.handle_next_step().await.unwrap();

    assert_eq!(wizard.handle_prev_step().unwrap(), WizardStep::Detail);
    assert!(wizard.state().came_from_back);
    assert_eq!(wizard.step(), WizardStep::Detail);

    assert_eq!(wizard.handle_prev_step().unwrap(), WizardStep::MaterialSelect);
}

#[tokio::test]
async fn test_tasco_f_shift_waits_for_equipment_data() {
    let mocks = MockCollaborators::new();
    let (handle, ready) = data_ready();
    let mut wizard = ClockInWizard::new(mocks.context_with(ready), "u-1", ClockInType::Jobsite);
    wizard.start(flags(&[WorkRole::Tasco, WorkRole::General])).await.unwrap();
    wizard
        .select_role(WorkRole::Tasco, Some(ClockInRoleType::TascoFEquipment))
        .unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.set_jobsite(jobsite()).unwrap();

    let advance = tokio::spawn(async move {
        let step = wizard.handle_next_step().await;
        (wizard, step)
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!advance.is_finished());

    handle.raise();
    let (wizard, step) = advance.await.unwrap();
    assert_eq!(step.unwrap(), WizardStep::Detail);
    assert_eq!(wizard.step(), WizardStep::Detail);
}

#[tokio::test]
async fn test_prev_refused_at_start() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::General, WorkRole::Truck]).await;

    assert!(matches!(
        wizard.handle_prev_step(),
        Err(WizardError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_next_refused_at_terminal_step() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    assert_eq!(wizard.step(), WizardStep::Verify);
    assert_eq!(
        wizard.handle_next_step().await.unwrap_err(),
        WizardError::InvalidTransition {
            step: WizardStep::Verify,
            action: "advance"
        }
    );
}

#[tokio::test]
async fn test_truck_flow_submits_from_extra_step() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::Truck]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::Detail);
    wizard.set_cost_code(cost_code()).unwrap();
    wizard
        .set_truck(SelectOption::new("tr-1", "Kenworth", "T-12"))
        .unwrap();
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::Verify);

    let err = wizard.submit().await.unwrap_err();
    assert!(matches!(err, WizardError::MissingSelection("starting_mileage")));
    assert_eq!(wizard.step(), WizardStep::Verify);

    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::TruckExtra);
    wizard.set_starting_mileage(120_400).unwrap();
    wizard.submit().await.unwrap();

    let payload = mocks.timesheets.last_payload().unwrap();
    assert_eq!(payload.details.truck.as_deref(), Some("tr-1"));
    assert_eq!(payload.details.starting_mileage, Some(120_400));
}

#[tokio::test]
async fn test_submit_requires_location_permission() {
    let mocks = MockCollaborators::new();
    mocks.location.set_permission(false);
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    let err = wizard.submit().await.unwrap_err();

    assert_eq!(err, WizardError::LocationPermissionDenied);
    assert_eq!(
        wizard.state().last_error.as_deref(),
        Some("location permission has not been granted")
    );
    assert!(!wizard.state().loading);
    assert_eq!(mocks.timesheets.create_session_calls(), 0);
}

#[tokio::test]
async fn test_submit_requires_user_id() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(mocks.context(), "", ClockInType::Jobsite);
    wizard.start(flags(&[WorkRole::Mechanic])).await.unwrap();
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    assert_eq!(wizard.submit().await.unwrap_err(), WizardError::MissingUserId);
}

#[tokio::test]
async fn test_submit_failure_keeps_step() {
    let mocks = MockCollaborators::new();
    mocks
        .timesheets
        .fail_create_timesheet(ApiError::http("/api/v1/timesheets/mechanic", 500, "boom"));
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    let err = wizard.submit().await.unwrap_err();

    assert!(matches!(err, WizardError::Api(_)));
    assert_eq!(wizard.step(), WizardStep::Verify);
    assert!(wizard.state().last_error.is_some());
    assert!(!wizard.state().loading);
}

#[tokio::test]
async fn test_submit_sets_preferences_and_links_session() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    let outcome = wizard.submit().await.unwrap();

    let prefs = crate::preferences::Preferences::values(mocks.preferences.as_ref(), "u-1").await;
    assert_eq!(prefs.current_page_view.as_deref(), Some("dashboard"));
    assert_eq!(prefs.work_role.as_deref(), Some("mechanic"));
    assert_eq!(prefs.labor_type.as_deref(), Some("mechanic"));

    let session = mocks
        .sessions
        .get_session(&outcome.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.timesheet_id.as_deref(), Some(outcome.timesheet_id.as_str()));
    assert_eq!(mocks.location.start_calls(), 1);
}

#[tokio::test]
async fn test_tracking_not_restarted_when_active() {
    let mocks = MockCollaborators::new();
    mocks
        .sessions
        .insert_session(Session::new("s-open", "u-1"))
        .await
        .unwrap();
    mocks.sessions.set_current_session("u-1", Some("s-open")).await.unwrap();
    mocks.location.set_tracking_active("s-open");
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    wizard.submit().await.unwrap();
    assert_eq!(mocks.location.start_calls(), 0);
}

#[tokio::test]
async fn test_tracking_failure_does_not_fail_submit() {
    let mocks = MockCollaborators::new();
    mocks.location.fail_tracking();
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    assert!(wizard.submit().await.is_ok());
    assert_eq!(mocks.location.start_calls(), 1);
}

async fn clock_in_mechanic(mocks: &MockCollaborators, user_id: &str) -> SubmitOutcome {
    let mut wizard = ClockInWizard::new(mocks.context(), user_id, ClockInType::Jobsite);
    wizard.start(flags(&[WorkRole::Mechanic])).await.unwrap();
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.submit().await.unwrap()
}

#[tokio::test]
async fn test_second_user_gets_own_session_and_tracking() {
    let mocks = MockCollaborators::new();

    let alice = clock_in_mechanic(&mocks, "alice").await;
    let bob = clock_in_mechanic(&mocks, "bob").await;

    assert_ne!(alice.session_id, bob.session_id);
    assert_eq!(mocks.timesheets.create_session_calls(), 2);
    assert_eq!(
        mocks.location.tracking_starts(),
        vec![
            ("alice".to_string(), alice.session_id.clone()),
            ("bob".to_string(), bob.session_id.clone()),
        ]
    );

    let payloads = mocks.timesheets.payloads();
    assert_eq!(payloads[0].session_id, alice.session_id);
    assert_eq!(payloads[1].session_id, bob.session_id);
}

#[tokio::test]
async fn test_preferences_stored_per_user() {
    let mocks = MockCollaborators::new();
    clock_in_mechanic(&mocks, "alice").await;

    let mut wizard = ClockInWizard::new(mocks.context(), "bob", ClockInType::Jobsite);
    wizard.start(flags(&[WorkRole::General])).await.unwrap();
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.set_cost_code(cost_code()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.submit().await.unwrap();

    let prefs = mocks.preferences.as_ref();
    let alice = crate::preferences::Preferences::values(prefs, "alice").await;
    let bob = crate::preferences::Preferences::values(prefs, "bob").await;
    assert_eq!(alice.work_role.as_deref(), Some("mechanic"));
    assert_eq!(bob.work_role.as_deref(), Some("general"));
}

#[tokio::test]
async fn test_existing_open_session_is_reused() {
    let mocks = MockCollaborators::new();
    mocks
        .sessions
        .insert_session(Session::new("s-open", "u-1"))
        .await
        .unwrap();
    mocks.sessions.set_current_session("u-1", Some("s-open")).await.unwrap();
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    let outcome = wizard.submit().await.unwrap();
    assert_eq!(outcome.session_id, "s-open");
    assert_eq!(mocks.timesheets.create_session_calls(), 0);
}

#[tokio::test]
async fn test_return_rebuilds_truck_state() {
    let mocks = MockCollaborators::new();
    mocks.timesheets.set_recent_timesheet(Some(previous_timesheet(
        "ts-77",
        WorkRole::Truck,
        Some(ClockInRoleType::TruckDriver),
    )));
    mocks.timesheets.set_previous_work(
        "ts-77",
        PreviousWork {
            truck: Some(SelectOption::new("tr-1", "Kenworth", "T-12")),
            starting_mileage: Some(90_000),
            ..Default::default()
        },
    );
    let mut wizard = started(&mocks, &[WorkRole::Truck, WorkRole::General]).await;

    let step = wizard.handle_return().await.unwrap();

    assert_eq!(step, WizardStep::Verify);
    let state = wizard.state();
    assert!(state.return_path_used);
    assert_eq!(state.role, Some(WorkRole::Truck));
    assert_eq!(state.jobsite, Some(jobsite()));
    assert_eq!(state.truck.as_ref().map(|t| t.id.as_str()), Some("tr-1"));
    assert_eq!(state.starting_mileage, Some(90_000));
}

#[tokio::test]
async fn test_return_for_mechanic_lands_on_detail() {
    let mocks = MockCollaborators::new();
    mocks.timesheets.set_recent_timesheet(Some(previous_timesheet(
        "ts-5",
        WorkRole::Mechanic,
        None,
    )));
    mocks
        .timesheets
        .set_previous_work("ts-5", PreviousWork::default());
    let mut wizard = started(&mocks, &[WorkRole::Mechanic]).await;

    assert_eq!(wizard.handle_return().await.unwrap(), WizardStep::Detail);
}

#[tokio::test]
async fn test_return_without_history_leaves_state() {
    let mocks = MockCollaborators::new();
    let mut wizard = started(&mocks, &[WorkRole::General, WorkRole::Truck]).await;
    let before = wizard.state().clone();

    assert_eq!(
        wizard.handle_return().await.unwrap_err(),
        WizardError::NoPreviousTimesheet
    );
    assert_eq!(wizard.state(), &before);
}

#[tokio::test]
async fn test_return_without_work_record_leaves_state() {
    let mocks = MockCollaborators::new();
    mocks.timesheets.set_recent_timesheet(Some(previous_timesheet(
        "ts-9",
        WorkRole::General,
        None,
    )));
    let mut wizard = started(&mocks, &[WorkRole::General, WorkRole::Truck]).await;
    let before = wizard.state().clone();

    assert_eq!(
        wizard.handle_return().await.unwrap_err(),
        WizardError::NoPreviousWork("ts-9".into())
    );
    assert_eq!(wizard.state(), &before);
}

#[tokio::test]
async fn test_switch_jobs_notifies_and_clears_comment() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(
        mocks.context(),
        "u-1",
        ClockInType::SwitchJobs {
            previous_timesheet_id: "ts-1".into(),
            comment: None,
        },
    );
    wizard.start(flags(&[WorkRole::Mechanic])).await.unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.set_comment(Some("pump failed".into()));
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    wizard.submit().await.unwrap();

    let sent = mocks.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reference_id, "ts-1");
    assert!(wizard.state().comment.is_none());
    let closure = mocks.timesheets.last_payload().unwrap().switch_jobs.unwrap();
    assert_eq!(closure.previous_job_comment.as_deref(), Some("pump failed"));
}

#[tokio::test]
async fn test_notification_failure_is_not_fatal() {
    let mocks = MockCollaborators::new();
    mocks.notifier.fail();
    let mut wizard = ClockInWizard::new(
        mocks.context(),
        "u-1",
        ClockInType::SwitchJobs {
            previous_timesheet_id: "ts-1".into(),
            comment: None,
        },
    );
    wizard.start(flags(&[WorkRole::Mechanic])).await.unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    assert!(wizard.submit().await.is_ok());
    assert_eq!(mocks.notifier.sent().len(), 1);
}

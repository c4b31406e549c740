//! End-to-end clock-in flows against mock collaborators
//!
//! These tests drive `ClockInWizard` through complete role branches and
//! assert on what reached the timesheet backend, the session store and the
//! notifier.

use chrono::{Duration, Utc};
use tempfile::TempDir;

use timeclock::mock::MockCollaborators;
use timeclock::session::{resolve_session, FileSessionStore, SessionResolution, SessionStore};
use timeclock::types::{ClockInRoleType, ClockInType, SelectOption, Session, ViewFlags, WorkRole};
use timeclock::{roles, ClockInWizard, WizardStep};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn only(role: WorkRole) -> ViewFlags {
    ViewFlags {
        mechanic_view: role == WorkRole::Mechanic,
        labor_view: role == WorkRole::General,
        truck_view: role == WorkRole::Truck,
        tasco_view: role == WorkRole::Tasco,
    }
}

fn jobsite() -> SelectOption {
    SelectOption::new("js-104", "North Yard", "J-104")
}

// ─── Role resolution ──────────────────────────────────────────────────────────

#[test]
fn test_single_flag_yields_single_role() {
    for role in WorkRole::all() {
        assert_eq!(roles(&only(*role)), vec![*role]);
    }
}

// ─── Mechanic ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_mechanic_single_role_end_to_end() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(mocks.context(), "emp-12", ClockInType::Jobsite);

    let mut observed = vec![wizard.step().index()];
    wizard.start(only(WorkRole::Mechanic)).await.unwrap();
    observed.push(wizard.step().index());

    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    observed.push(wizard.step().index());
    wizard.handle_next_step().await.unwrap();
    observed.push(wizard.step().index());

    assert_eq!(observed, vec![0, 2, 4, 5]);

    let outcome = wizard.submit().await.unwrap();
    assert_eq!(outcome.redirect, "/dashboard");

    let payload = mocks.timesheets.last_payload().unwrap();
    assert_eq!(payload.cost_code.as_deref(), Some("#00.50 Mechanics"));
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["workType"], "mechanic");
    assert_eq!(json["jobsiteId"], "js-104");
    assert_eq!(json["userId"], "emp-12");
    assert_eq!(json["sessionId"], outcome.session_id.as_str());
}

// ─── Tasco ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tasco_abcd_labor_auto_advance_and_back() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(mocks.context(), "emp-3", ClockInType::Jobsite);
    wizard.start(only(WorkRole::Tasco)).await.unwrap();
    wizard
        .select_role(WorkRole::Tasco, Some(ClockInRoleType::TascoAbcdLabor))
        .unwrap();

    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.set_material_type("Screened Topsoil").unwrap();

    // Detail is skipped on the way forward
    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::Verify);

    // ...but stays put when the user navigates back into it
    assert_eq!(wizard.handle_prev_step().unwrap(), WizardStep::Detail);
    assert_eq!(wizard.step(), WizardStep::Detail);

    assert_eq!(wizard.handle_next_step().await.unwrap(), WizardStep::Verify);
    wizard.submit().await.unwrap();

    let json = serde_json::to_value(mocks.timesheets.last_payload().unwrap()).unwrap();
    assert_eq!(json["workType"], "tasco");
    assert_eq!(json["shiftType"], "ABCD Shift");
    assert_eq!(json["materialType"], "Screened Topsoil");
    assert_eq!(json["laborType"], "tascoAbcdLabor");
    assert!(json.get("equipment").is_none());
}

// ─── Switch jobs ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_jobs_payload_fields_present_only_when_switching() {
    let mocks = MockCollaborators::new();

    for clock_in_type in [
        ClockInType::Jobsite,
        ClockInType::SwitchJobs {
            previous_timesheet_id: "ts-41".into(),
            comment: Some("moved to south pit".into()),
        },
    ] {
        let switching = clock_in_type.is_switch_jobs();
        let mut wizard = ClockInWizard::new(mocks.context(), "emp-8", clock_in_type);
        wizard.start(only(WorkRole::Mechanic)).await.unwrap();
        if wizard.step() == WizardStep::RoleSelect {
            wizard.handle_next_step().await.unwrap();
        }
        wizard.set_jobsite(jobsite()).unwrap();
        wizard.handle_next_step().await.unwrap();
        wizard.handle_next_step().await.unwrap();
        wizard.submit().await.unwrap();

        let json = serde_json::to_value(mocks.timesheets.last_payload().unwrap()).unwrap();
        for key in [
            "previousTimeSheetId",
            "endTime",
            "clockOutLat",
            "clockOutLng",
            "previousJobComment",
        ] {
            assert_eq!(json.get(key).is_some(), switching, "{} switching={}", key, switching);
        }
        if switching {
            assert_eq!(json["previousTimeSheetId"], "ts-41");
            assert_eq!(json["previousJobComment"], "moved to south pit");
        }
    }

    assert_eq!(mocks.notifier.sent().len(), 1);
}

// ─── Sessions ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_first_clock_in_creates_exactly_one_session() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(mocks.context(), "emp-1", ClockInType::Jobsite);
    wizard.start(only(WorkRole::Mechanic)).await.unwrap();
    wizard.set_jobsite(jobsite()).unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();

    let outcome = wizard.submit().await.unwrap();

    assert_eq!(mocks.timesheets.create_session_calls(), 1);
    assert_eq!(
        mocks.sessions.current_session_id("emp-1").await.unwrap().as_deref(),
        Some(outcome.session_id.as_str())
    );
}

#[tokio::test]
async fn test_two_users_sharing_collaborators_stay_separate() {
    let mocks = MockCollaborators::new();
    let mut outcomes = Vec::new();

    // Both wizards are open before either submits
    let mut wizards: Vec<ClockInWizard> = ["emp-a", "emp-b"]
        .into_iter()
        .map(|user| ClockInWizard::new(mocks.context(), user, ClockInType::Jobsite))
        .collect();
    for wizard in &mut wizards {
        wizard.start(only(WorkRole::Mechanic)).await.unwrap();
        wizard.set_jobsite(jobsite()).unwrap();
        wizard.handle_next_step().await.unwrap();
        wizard.handle_next_step().await.unwrap();
    }
    for wizard in &mut wizards {
        outcomes.push(wizard.submit().await.unwrap());
    }

    assert_ne!(outcomes[0].session_id, outcomes[1].session_id);
    assert_eq!(mocks.timesheets.create_session_calls(), 2);
    for (user, outcome) in ["emp-a", "emp-b"].iter().zip(&outcomes) {
        assert_eq!(
            mocks.sessions.current_session_id(user).await.unwrap().as_deref(),
            Some(outcome.session_id.as_str())
        );
    }
    assert_eq!(
        mocks.location.tracking_starts(),
        vec![
            ("emp-a".to_string(), outcomes[0].session_id.clone()),
            ("emp-b".to_string(), outcomes[1].session_id.clone()),
        ]
    );

    // A second clock-in by the first user reuses only their own session
    let mut again = ClockInWizard::new(mocks.context(), "emp-a", ClockInType::Jobsite);
    again.start(only(WorkRole::Mechanic)).await.unwrap();
    again.set_jobsite(jobsite()).unwrap();
    again.handle_next_step().await.unwrap();
    again.handle_next_step().await.unwrap();
    let reused = again.submit().await.unwrap();
    assert_eq!(reused.session_id, outcomes[0].session_id);
    assert_eq!(mocks.timesheets.create_session_calls(), 2);
}

#[tokio::test]
async fn test_expired_file_session_cleared_before_create() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sessions.json");
    let mocks = MockCollaborators::new();
    let now = Utc::now();

    {
        let store = FileSessionStore::open(&path).unwrap();
        let mut old = Session::new("s-yesterday", "emp-1");
        old.end_time = Some(now - Duration::hours(9));
        store.insert_session(old).await.unwrap();
        store
            .set_current_session("emp-1", Some("s-yesterday"))
            .await
            .unwrap();
    }

    let store = FileSessionStore::open(&path).unwrap();
    let resolution = resolve_session(
        &store,
        mocks.timesheets.as_ref(),
        "emp-1",
        now,
        Duration::hours(4),
    )
    .await
    .unwrap();

    assert!(matches!(resolution, SessionResolution::CreatedAfterExpiry(_)));
    let reopened = FileSessionStore::open(&path).unwrap();
    let sessions = reopened.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, resolution.session_id());
}

// ─── Selections ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_selected_option_reaches_payload_unchanged() {
    let mocks = MockCollaborators::new();
    let mut wizard = ClockInWizard::new(mocks.context(), "emp-5", ClockInType::Jobsite);
    wizard.start(only(WorkRole::General)).await.unwrap();

    let site = SelectOption::new("js-9", "Quarry Rd", "J-900");
    wizard.set_jobsite(site.clone()).unwrap();
    assert_eq!(wizard.state().jobsite.as_ref(), Some(&site));

    wizard.handle_next_step().await.unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard
        .set_cost_code(SelectOption::new("cc-2", "Paving", "#04.10"))
        .unwrap();
    wizard.handle_next_step().await.unwrap();
    wizard.submit().await.unwrap();

    let payload = mocks.timesheets.last_payload().unwrap();
    assert_eq!(payload.jobsite_id, site.id);
    assert_eq!(payload.cost_code.as_deref(), Some("#04.10"));
}

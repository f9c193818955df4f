mod common;

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use common::{World, date, person};
use hrm_leave::LeaveError;
use hrm_leave::config::WorkflowSettings;
use hrm_leave::leave::{CancelLeave, Decide, ListQuery};
use hrm_leave::model::{
    ApplicationId, ApproverRole, ApproverStatus, DayCounting, HalfDaySession, LeaveDays, LeaveStatus,
    Policy, PolicyId, PolicyRule, PolicyType, RoleCode, RoleDefinition, RuleKind,
};
use hrm_leave::services::{Clock, EventKind};

fn decide(id: ApplicationId, comments: &str) -> Decide {
    Decide {
        application_id: id,
        comments: Some(comments.to_string()),
        expected_version: None,
    }
}

fn max_days_policy(world: &World, limit: i64) -> Policy {
    Policy {
        id: PolicyId::new(),
        tenant_id: world.tenant,
        name: "Short leaves only".to_string(),
        policy_type: PolicyType::Leave,
        rules: vec![PolicyRule::active(RuleKind::MaxLeaveDays {
            limit: LeaveDays::whole(limit),
        })],
        applies_to: Default::default(),
        effective_from: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        effective_to: None,
        is_active: true,
    }
}

#[test]
fn two_level_approval_commits_the_reservation() {
    let world = World::new();

    let applied = world.apply_days(3).unwrap();
    assert_eq!(applied.status, LeaveStatus::Pending);
    assert_eq!(applied.total_days, LeaveDays::whole(3));
    assert_eq!(applied.approvers_count, 2);
    let balance = world.balance();
    assert_eq!(balance.pending, LeaveDays::whole(3));
    assert_eq!(balance.available_balance, LeaveDays::whole(7));

    let first = world
        .service
        .approve(&world.manager.actor(), decide(applied.application_id, "ok"))
        .unwrap();
    assert_eq!(first.new_status, LeaveStatus::ManagerApproved);
    assert!(!first.workflow_complete);
    assert_eq!(first.next_approver_role, Some(ApproverRole::HrManager));

    let second = world
        .service
        .approve(&world.hr.actor(), decide(applied.application_id, "enjoy"))
        .unwrap();
    assert_eq!(second.new_status, LeaveStatus::Approved);
    assert!(second.workflow_complete);
    assert_eq!(second.next_approver_role, None);

    let balance = world.balance();
    assert_eq!(balance.used, LeaveDays::whole(3));
    assert_eq!(balance.pending, LeaveDays::ZERO);
    assert_eq!(balance.available_balance, LeaveDays::whole(7));
    assert!(balance.is_consistent());

    let app = world
        .service
        .get_application(&world.employee.actor(), applied.application_id)
        .unwrap();
    assert_eq!(app.final_approved_by, Some(world.hr.id));
    assert!(app.workflow.approvers.iter().all(|a| a.status == ApproverStatus::Approved));
    let statuses: Vec<_> = app.status_history.iter().map(|h| h.to_status).collect();
    assert_eq!(
        statuses,
        vec![LeaveStatus::Pending, LeaveStatus::ManagerApproved, LeaveStatus::Approved]
    );
    assert_eq!(world.notifier.count(EventKind::Applied), 1);
    assert_eq!(world.notifier.count(EventKind::Approved), 1);

    let handed_on: Vec<_> = world
        .notifier
        .sent()
        .into_iter()
        .filter(|e| e.kind == EventKind::ManagerApproved)
        .collect();
    assert_eq!(handed_on.len(), 1);
    assert_eq!(handed_on[0].recipients, vec![world.hr.id]);
}

#[test]
fn applying_beyond_the_balance_changes_nothing() {
    let world = World::new();
    let before = world.balance();

    let err = world.apply_days(12).unwrap_err();

    assert!(matches!(err, LeaveError::InsufficientBalance { .. }));
    assert!(err.to_string().contains("available=10, requested=12"));
    assert_eq!(world.balance(), before);
    let listed = world
        .service
        .list_applications(&world.hr.actor(), ListQuery::default())
        .unwrap();
    assert_eq!(listed.total, 0);
}

#[test]
fn manager_rejection_restores_the_balance() {
    let world = World::new();
    let applied = world.apply_days(3).unwrap();

    let outcome = world
        .service
        .reject(
            &world.manager.actor(),
            decide(applied.application_id, "resourcing conflict"),
        )
        .unwrap();

    assert_eq!(outcome.new_status, LeaveStatus::Rejected);
    let balance = world.balance();
    assert_eq!(balance.pending, LeaveDays::ZERO);
    assert_eq!(balance.available_balance, LeaveDays::whole(10));
    assert_eq!(world.notifier.count(EventKind::Rejected), 1);

    let app = world
        .service
        .get_application(&world.employee.actor(), applied.application_id)
        .unwrap();
    assert_eq!(app.rejection_reason.as_deref(), Some("resourcing conflict"));
    assert_eq!(app.rejected_by, Some(world.manager.id));
}

#[test]
fn cancelling_an_approved_leave_returns_used_days() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();
    for approver in [&world.manager, &world.hr] {
        world
            .service
            .approve(&approver.actor(), decide(applied.application_id, "ok"))
            .unwrap();
    }
    assert_eq!(world.balance().used, LeaveDays::whole(2));

    let outcome = world
        .service
        .cancel(
            &world.employee.actor(),
            CancelLeave {
                application_id: applied.application_id,
                reason: Some("plans changed".to_string()),
                expected_version: None,
            },
        )
        .unwrap();

    assert_eq!(outcome.new_status, LeaveStatus::Cancelled);
    let balance = world.balance();
    assert_eq!(balance.used, LeaveDays::ZERO);
    assert_eq!(balance.available_balance, LeaveDays::whole(10));
    assert!(balance.is_consistent());
}

#[test]
fn tenant_day_limit_blocks_before_reserving() {
    let world = World::new();
    world.store.put_policy(max_days_policy(&world, 5));

    let err = world.apply_days(6).unwrap_err();

    match err {
        LeaveError::PolicyViolation { policy, message } => {
            assert_eq!(policy, "Short leaves only");
            assert!(message.contains('5'), "{message}");
        }
        other => panic!("expected a policy violation, got {other:?}"),
    }
    assert_eq!(world.balance().pending, LeaveDays::ZERO);
    assert_eq!(world.balance().available_balance, LeaveDays::whole(10));

    assert!(world.apply_days(5).is_ok());
}

#[test]
fn hr_may_approve_before_the_manager() {
    let world = World::new();
    let applied = world.apply_days(1).unwrap();

    let hr_first = world
        .service
        .approve(&world.hr.actor(), decide(applied.application_id, "fine"))
        .unwrap();
    assert_eq!(hr_first.new_status, LeaveStatus::Pending);
    assert_eq!(hr_first.next_approver_role, Some(ApproverRole::Manager));
    assert_eq!(world.notifier.count(EventKind::ManagerApproved), 0);

    let manager_last = world
        .service
        .approve(&world.manager.actor(), decide(applied.application_id, "fine"))
        .unwrap();
    assert_eq!(manager_last.new_status, LeaveStatus::Approved);
    assert!(manager_last.workflow_complete);
    assert_eq!(world.balance().used, LeaveDays::whole(1));
}

#[test]
fn hr_can_reject_after_manager_approval() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();
    world
        .service
        .approve(&world.manager.actor(), decide(applied.application_id, "ok"))
        .unwrap();

    let rejected = world
        .service
        .reject(&world.hr.actor(), decide(applied.application_id, "audit week"))
        .unwrap();

    assert_eq!(rejected.new_status, LeaveStatus::Rejected);
    assert_eq!(world.balance().available_balance, LeaveDays::whole(10));
}

#[test]
fn employees_cannot_approve_their_own_leave() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();

    let err = world
        .service
        .approve(&world.employee.actor(), decide(applied.application_id, "me"))
        .unwrap_err();

    assert!(matches!(err, LeaveError::NotAuthorized { .. }));
    assert_eq!(world.balance().pending, LeaveDays::whole(2));
}

#[test]
fn team_lead_outside_the_reporting_line_cannot_approve() {
    let world = World::new();
    let stranger = person(world.tenant, "TL-02", RoleCode::TeamLead, None, None);
    world.store.put_employee(stranger.clone());
    let applied = world.apply_days(2).unwrap();

    let err = world
        .service
        .approve(&stranger.actor(), decide(applied.application_id, "ok"))
        .unwrap_err();

    assert!(matches!(err, LeaveError::NotAuthorized { .. }));
}

#[test]
fn the_same_approver_cannot_act_twice() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();
    world
        .service
        .approve(&world.manager.actor(), decide(applied.application_id, "ok"))
        .unwrap();

    let err = world
        .service
        .approve(&world.manager.actor(), decide(applied.application_id, "again"))
        .unwrap_err();

    assert!(matches!(err, LeaveError::NotAuthorized { .. }));
}

#[test]
fn stale_version_is_a_conflict() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();
    world
        .service
        .approve(&world.manager.actor(), decide(applied.application_id, "ok"))
        .unwrap();

    let err = world
        .service
        .approve(
            &world.hr.actor(),
            Decide {
                application_id: applied.application_id,
                comments: None,
                expected_version: Some(0),
            },
        )
        .unwrap_err();

    assert_eq!(err, LeaveError::Conflict { expected: 0, actual: 1 });
    assert_eq!(world.balance().pending, LeaveDays::whole(2));
}

#[test]
fn closed_applications_cannot_be_cancelled_or_decided() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();
    world
        .service
        .reject(&world.manager.actor(), decide(applied.application_id, "no"))
        .unwrap();

    let cancel = CancelLeave {
        application_id: applied.application_id,
        reason: None,
        expected_version: None,
    };
    let err = world.service.cancel(&world.employee.actor(), cancel.clone()).unwrap_err();
    assert!(matches!(
        err,
        LeaveError::InvalidState {
            status: LeaveStatus::Rejected,
            ..
        }
    ));

    let err = world
        .service
        .approve(&world.hr.actor(), decide(applied.application_id, "late"))
        .unwrap_err();
    assert!(matches!(err, LeaveError::InvalidState { .. }));

    let fresh = world.apply_days(1).unwrap();
    let cancel = CancelLeave {
        application_id: fresh.application_id,
        ..cancel
    };
    world.service.cancel(&world.employee.actor(), cancel.clone()).unwrap();
    let err = world.service.cancel(&world.employee.actor(), cancel).unwrap_err();
    assert!(matches!(
        err,
        LeaveError::InvalidState {
            status: LeaveStatus::Cancelled,
            ..
        }
    ));
    assert_eq!(world.balance().available_balance, LeaveDays::whole(10));
}

#[test]
fn pending_cancellation_releases_and_notifies_approvers() {
    let world = World::new();
    let applied = world.apply_days(4).unwrap();

    world
        .service
        .cancel(
            &world.employee.actor(),
            CancelLeave {
                application_id: applied.application_id,
                reason: None,
                expected_version: None,
            },
        )
        .unwrap();

    assert_eq!(world.balance().pending, LeaveDays::ZERO);
    assert_eq!(world.balance().available_balance, LeaveDays::whole(10));
    let cancelled = world
        .notifier
        .sent()
        .into_iter()
        .find(|e| e.kind == EventKind::Cancelled)
        .unwrap();
    assert!(cancelled.recipients.contains(&world.manager.id));
    assert!(cancelled.recipients.contains(&world.employee.id));
}

#[test]
fn only_the_applicant_or_an_administrator_may_cancel() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();
    let cancel = CancelLeave {
        application_id: applied.application_id,
        reason: None,
        expected_version: None,
    };

    let err = world.service.cancel(&world.hr.actor(), cancel.clone()).unwrap_err();
    assert!(matches!(err, LeaveError::NotAuthorized { .. }));

    let outcome = world.service.cancel(&world.admin.actor(), cancel).unwrap();
    assert_eq!(outcome.new_status, LeaveStatus::Cancelled);
}

#[test]
fn past_dates_and_short_notice_are_rejected() {
    let world = World::new();
    let past = world.request(date(2, 20), date(2, 21));
    let err = world.service.apply(&world.employee.actor(), past).unwrap_err();
    assert!(matches!(err, LeaveError::Validation(_)));

    let mut strict = world.annual.clone();
    strict.min_days_notice = 14;
    world.store.put_leave_type(strict);
    let err = world.apply_days(2).unwrap_err();
    assert!(err.to_string().contains("Minimum 14 days notice"), "{err}");
    assert_eq!(world.balance().pending, LeaveDays::ZERO);
}

#[test]
fn consecutive_day_limit_is_enforced() {
    let world = World::new();
    let mut capped = world.annual.clone();
    capped.max_consecutive_days = Some(3);
    world.store.put_leave_type(capped);

    let err = world.apply_days(4).unwrap_err();
    assert!(err.to_string().contains("Maximum 3 consecutive days"), "{err}");
    assert!(world.apply_days(3).is_ok());
}

#[test]
fn open_ended_working_day_range_is_refused_quickly() {
    let world = World::with_settings(WorkflowSettings {
        day_counting: DayCounting::WorkingDays {
            holidays: BTreeSet::new(),
        },
        ..WorkflowSettings::default()
    });

    let started = Instant::now();
    let err = world
        .service
        .apply(&world.employee.actor(), world.request(date(3, 10), NaiveDate::MAX))
        .unwrap_err();
    assert!(err.to_string().contains("Maximum 15 consecutive days"), "{err}");
    assert!(started.elapsed().as_millis() < 500);
    assert_eq!(world.balance().pending, LeaveDays::ZERO);
}

#[test]
fn half_day_application_reserves_half_a_day() {
    let world = World::new();
    let mut request = world.request(date(3, 11), date(3, 11));
    request.is_half_day = true;
    request.half_day_session = Some(HalfDaySession::FirstHalf);

    let applied = world.service.apply(&world.employee.actor(), request.clone()).unwrap();
    assert_eq!(applied.total_days, LeaveDays::HALF);
    assert_eq!(world.balance().pending, LeaveDays::HALF);

    request.to_date = date(3, 12);
    let err = world.service.apply(&world.employee.actor(), request).unwrap_err();
    assert!(matches!(err, LeaveError::Validation(_)));
}

#[test]
fn own_data_grant_blocks_applying_for_a_report() {
    let world = World::new();
    let err = world
        .service
        .apply(&world.manager.actor(), world.request(date(3, 10), date(3, 11)))
        .unwrap_err();
    assert!(matches!(err, LeaveError::NotAuthorized { .. }));
}

#[test]
fn team_lead_applies_and_goes_straight_to_hr_when_unmanaged() {
    let world = World::new();
    world.open_balance(world.manager.id, 5);
    let mut request = world.request(date(3, 10), date(3, 11));
    request.employee_id = world.manager.id;

    let applied = world.service.apply(&world.manager.actor(), request).unwrap();

    assert_eq!(applied.approvers_count, 1);
    let done = world
        .service
        .approve(&world.hr.actor(), decide(applied.application_id, "ok"))
        .unwrap();
    assert!(done.workflow_complete);
}

#[test]
fn missing_leave_type_is_not_found() {
    let world = World::new();
    let mut request = world.request(date(3, 10), date(3, 11));
    request.leave_type_id = hrm_leave::model::LeaveTypeId::new();
    let err = world.service.apply(&world.employee.actor(), request).unwrap_err();
    assert!(matches!(err, LeaveError::NotFound { .. }));
}

#[test]
fn listing_is_paginated_and_scoped() {
    let world = World::new();
    for _ in 0..3 {
        world.apply_days(1).unwrap();
    }

    let page = world
        .service
        .list_applications(
            &world.employee.actor(),
            ListQuery {
                employee_id: Some(world.employee.id),
                per_page: Some(2),
                ..ListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 2);

    let err = world
        .service
        .list_applications(&world.employee.actor(), ListQuery::default())
        .unwrap_err();
    assert!(matches!(err, LeaveError::NotAuthorized { .. }));

    let everything = world
        .service
        .list_applications(
            &world.hr.actor(),
            ListQuery {
                status: Some(LeaveStatus::Pending),
                per_page: Some(500),
                ..ListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(everything.per_page, 100);
    assert_eq!(everything.total, 3);
}

#[test]
fn pages_past_the_end_are_empty() {
    let world = World::new();
    world.apply_days(1).unwrap();

    let page = world
        .service
        .list_applications(
            &world.hr.actor(),
            ListQuery {
                page: Some(u64::MAX),
                per_page: Some(100),
                ..ListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(page.page, u64::MAX);
    assert_eq!(page.total, 1);
    assert!(page.data.is_empty());
}

#[test]
fn balances_and_leave_types_are_readable() {
    let world = World::new();
    world.apply_days(2).unwrap();

    let balances = world
        .service
        .get_balances(&world.employee.actor(), world.employee.id, common::YEAR)
        .unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].pending, LeaveDays::whole(2));
    assert_eq!(balances[0].available, LeaveDays::whole(8));

    let types = world.service.leave_types(&world.employee.actor()).unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].code, "AL");
}

#[test]
fn leave_types_need_read_access() {
    let world = World::new();
    world.store.put_role(RoleDefinition {
        tenant_id: Some(world.tenant),
        code: RoleCode::Employee,
        name: "Contractor".to_string(),
        level: 1,
        permissions: vec![],
    });

    let err = world.service.leave_types(&world.employee.actor()).unwrap_err();
    assert!(matches!(err, LeaveError::NotAuthorized { .. }), "{err:?}");
    assert_eq!(world.service.leave_types(&world.hr.actor()).unwrap().len(), 1);
}

#[test]
fn every_transition_is_audited() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();
    world
        .service
        .reject(&world.hr.actor(), decide(applied.application_id, "no"))
        .unwrap();

    let actions: Vec<_> = world.audit.entries().into_iter().map(|e| e.action).collect();
    assert_eq!(actions, vec!["LEAVE_APPLIED", "LEAVE_REJECTED"]);
}

#[test]
fn failing_notifications_do_not_undo_transitions() {
    let world = World::new();
    world.notifier.set_failing(true);

    let applied = world.apply_days(2).unwrap();

    assert_eq!(applied.status, LeaveStatus::Pending);
    assert_eq!(world.balance().pending, LeaveDays::whole(2));
    assert!(world.notifier.sent().is_empty());
}

#[test]
fn overdue_approvals_are_reminded() {
    let world = World::new();
    let applied = world.apply_days(2).unwrap();

    assert!(world.service.pending_reminders(world.clock.now()).is_empty());

    world.clock.advance(Duration::hours(30));
    let reminders = world.service.pending_reminders(world.clock.now());
    assert_eq!(reminders.len(), 2);
    assert!(reminders.iter().all(|r| r.application_id == applied.application_id));
    assert_eq!(reminders[0].days_pending, 1);

    assert_eq!(world.service.send_reminders(), 2);
    assert_eq!(world.notifier.count(EventKind::Reminder), 2);
}

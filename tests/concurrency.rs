mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::World;
use hrm_leave::LeaveError;
use hrm_leave::leave::Decide;
use hrm_leave::model::LeaveDays;

#[test]
fn racing_applications_never_overdraw_a_balance() {
    let world = Arc::new(World::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let world = world.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                world.apply_days(3)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 3);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LeaveError::InsufficientBalance { .. })));

    let balance = world.balance();
    assert_eq!(balance.pending, LeaveDays::whole(9));
    assert_eq!(balance.available_balance, LeaveDays::whole(1));
    assert!(balance.is_consistent());
}

#[test]
fn concurrent_approvers_resolve_to_one_winner_per_version() {
    let world = Arc::new(World::new());
    let applied = world.apply_days(2).unwrap();
    let barrier = Arc::new(Barrier::new(2));

    let approvers = [world.manager.actor(), world.hr.actor()];
    let handles: Vec<_> = approvers
        .into_iter()
        .map(|actor| {
            let world = world.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                world.service.approve(
                    &actor,
                    Decide {
                        application_id: applied.application_id,
                        comments: None,
                        expected_version: Some(0),
                    },
                )
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LeaveError::Conflict { .. })));

    let balance = world.balance();
    assert_eq!(balance.pending, LeaveDays::whole(2));
    assert_eq!(balance.used, LeaveDays::ZERO);
}

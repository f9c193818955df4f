use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{LeaveError, LeaveResult};
use crate::model::{
    BalanceKey, Employee, EmployeeId, LeaveBalance, LeaveDays, LeaveType, Reservation,
    ReservationState, TenantId,
};
use crate::store::BalanceStore;

/// Owns every mutation of leave balances.
///
/// Each operation runs inside the store's per-key lock, so a check and the
/// write that depends on it can't be split by another request on the same
/// key. After every mutation
/// `available = allocated + carried_forward - used - pending - encashed - lapsed`.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn BalanceStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn BalanceStore>) -> Self {
        Self { store }
    }

    pub fn balance(&self, key: &BalanceKey) -> LeaveResult<LeaveBalance> {
        self.store
            .get(key)
            .ok_or_else(|| LeaveError::not_found("leave balance", key))
    }

    pub fn balances(&self, tenant: TenantId, employee: EmployeeId, year: i32) -> Vec<LeaveBalance> {
        self.store.for_employee(tenant, employee, year)
    }

    /// Holds `days` against the balance: `pending += days`, `available -= days`.
    pub fn reserve(&self, key: BalanceKey, days: LeaveDays) -> LeaveResult<Reservation> {
        ensure_positive(days)?;
        self.store.update(&key, &mut |row| {
            if row.available_balance < days {
                return Err(LeaveError::InsufficientBalance {
                    requested: days,
                    available: row.available_balance,
                });
            }
            row.pending += days;
            row.available_balance -= days;
            Ok(())
        })?;
        debug!(%key, %days, "reserved");
        Ok(Reservation {
            key,
            days,
            state: ReservationState::Held,
        })
    }

    /// Turns a held reservation into used days. Repeating it is a no-op.
    pub fn commit(&self, reservation: &mut Reservation) -> LeaveResult<()> {
        ensure_positive(reservation.days)?;
        match reservation.state {
            ReservationState::Committed => return Ok(()),
            ReservationState::Held => {}
            other => return Err(wrong_state(other, "commit")),
        }
        let days = reservation.days;
        self.store.update(&reservation.key, &mut |row| {
            ensure_covers(row.pending, days, "pending")?;
            row.pending -= days;
            row.used += days;
            Ok(())
        })?;
        reservation.state = ReservationState::Committed;
        debug!(key = %reservation.key, %days, "committed");
        Ok(())
    }

    /// Gives held days back. Repeating it is a no-op.
    pub fn release(&self, reservation: &mut Reservation) -> LeaveResult<()> {
        ensure_positive(reservation.days)?;
        match reservation.state {
            ReservationState::Released => return Ok(()),
            ReservationState::Held => {}
            other => return Err(wrong_state(other, "release")),
        }
        let days = reservation.days;
        self.store.update(&reservation.key, &mut |row| {
            ensure_covers(row.pending, days, "pending")?;
            row.pending -= days;
            row.available_balance += days;
            Ok(())
        })?;
        reservation.state = ReservationState::Released;
        debug!(key = %reservation.key, %days, "released");
        Ok(())
    }

    /// Gives committed days back after an approved leave is cancelled.
    pub fn revert_used(&self, reservation: &mut Reservation) -> LeaveResult<()> {
        ensure_positive(reservation.days)?;
        match reservation.state {
            ReservationState::Reverted => return Ok(()),
            ReservationState::Committed => {}
            other => return Err(wrong_state(other, "revert")),
        }
        let days = reservation.days;
        self.store.update(&reservation.key, &mut |row| {
            ensure_covers(row.used, days, "used")?;
            row.used -= days;
            row.available_balance += days;
            Ok(())
        })?;
        reservation.state = ReservationState::Reverted;
        debug!(key = %reservation.key, %days, "reverted");
        Ok(())
    }

    /// Pays out available days of an encashable leave type.
    pub fn encash(&self, key: &BalanceKey, leave_type: &LeaveType, days: LeaveDays) -> LeaveResult<LeaveBalance> {
        ensure_positive(days)?;
        if !leave_type.is_encashable {
            return Err(LeaveError::validation(format!(
                "{} cannot be encashed",
                leave_type.name
            )));
        }
        self.store.update(key, &mut |row| {
            if row.available_balance < days {
                return Err(LeaveError::InsufficientBalance {
                    requested: days,
                    available: row.available_balance,
                });
            }
            row.encashed += days;
            row.available_balance -= days;
            Ok(())
        })
    }

    /// Writes days off. Unlike a reservation this may leave the available
    /// balance negative.
    pub fn lapse(&self, key: &BalanceKey, days: LeaveDays) -> LeaveResult<LeaveBalance> {
        ensure_positive(days)?;
        self.store.update(key, &mut |row| {
            row.lapsed += days;
            row.available_balance -= days;
            Ok(())
        })
    }

    /// Opens `year` rows for every active employee and every active leave
    /// type that applies to them, carrying forward up to the leave type's
    /// limit from the previous year. Existing rows are left alone; returns
    /// how many rows were opened.
    pub fn rollover(&self, year: i32, employees: &[Employee], leave_types: &[LeaveType]) -> usize {
        let mut opened = 0;
        for employee in employees.iter().filter(|e| e.is_active()) {
            let applicable = leave_types.iter().filter(|lt| {
                lt.is_active && lt.visible_to(employee.tenant_id) && lt.applicable_gender.admits(employee.gender)
            });
            for leave_type in applicable {
                let key = BalanceKey {
                    tenant_id: employee.tenant_id,
                    employee_id: employee.id,
                    leave_type_id: leave_type.id,
                    year,
                };
                let previous = BalanceKey { year: year - 1, ..key };
                let carried = self
                    .store
                    .get(&previous)
                    .map(|prev| prev.available_balance.min(leave_type.max_carry_forward))
                    .unwrap_or(LeaveDays::ZERO)
                    .max(LeaveDays::ZERO);

                if self
                    .store
                    .insert_if_absent(LeaveBalance::open(key, leave_type.annual_allocation, carried))
                {
                    opened += 1;
                }
            }
        }
        info!(year, employees = employees.len(), opened, "leave balance rollover complete");
        opened
    }
}

fn ensure_positive(days: LeaveDays) -> LeaveResult<()> {
    if days.is_positive() {
        Ok(())
    } else {
        Err(LeaveError::InvalidAmount(days))
    }
}

fn ensure_covers(counter: LeaveDays, days: LeaveDays, name: &str) -> LeaveResult<()> {
    if counter < days {
        return Err(LeaveError::validation(format!(
            "{name} is {counter}, cannot remove {days}"
        )));
    }
    Ok(())
}

fn wrong_state(state: ReservationState, operation: &str) -> LeaveError {
    LeaveError::validation(format!("cannot {operation} a reservation that is {state}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ApplicableGender, EmployeeStatus, Gender, LeaveTypeId, RoleCode,
    };
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    fn setup(available: i64) -> (Ledger, Arc<MemoryStore>, BalanceKey) {
        let store = Arc::new(MemoryStore::new());
        let key = BalanceKey {
            tenant_id: TenantId::new(),
            employee_id: EmployeeId::new(),
            leave_type_id: LeaveTypeId::new(),
            year: 2026,
        };
        store.put_balance(LeaveBalance::open(key, LeaveDays::whole(available), LeaveDays::ZERO));
        (Ledger::new(store.clone()), store, key)
    }

    fn leave_type(encashable: bool) -> LeaveType {
        LeaveType {
            id: LeaveTypeId::new(),
            tenant_id: None,
            name: "Annual".to_string(),
            code: "AL".to_string(),
            annual_allocation: LeaveDays::whole(12),
            max_consecutive_days: None,
            min_days_notice: 0,
            max_carry_forward: LeaveDays::whole(5),
            applicable_gender: ApplicableGender::All,
            is_paid: true,
            is_encashable: encashable,
            is_active: true,
        }
    }

    fn employee(tenant: TenantId) -> Employee {
        Employee {
            id: EmployeeId::new(),
            tenant_id: tenant,
            employee_code: "EMP-001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: RoleCode::Employee,
            department_id: None,
            reporting_manager: None,
            gender: Some(Gender::Female),
            status: EmployeeStatus::Active,
            additional_permissions: vec![],
        }
    }

    #[test]
    fn reserve_moves_days_to_pending() {
        let (ledger, _, key) = setup(10);
        let reservation = ledger.reserve(key, LeaveDays::whole(3)).unwrap();
        assert_eq!(reservation.state, ReservationState::Held);

        let row = ledger.balance(&key).unwrap();
        assert_eq!(row.pending, LeaveDays::whole(3));
        assert_eq!(row.available_balance, LeaveDays::whole(7));
        assert!(row.is_consistent());
    }

    #[test]
    fn reserve_beyond_available_leaves_row_untouched() {
        let (ledger, _, key) = setup(10);
        let before = ledger.balance(&key).unwrap();
        let err = ledger.reserve(key, LeaveDays::whole(12)).unwrap_err();
        assert_eq!(
            err,
            LeaveError::InsufficientBalance {
                requested: LeaveDays::whole(12),
                available: LeaveDays::whole(10),
            }
        );
        assert_eq!(ledger.balance(&key).unwrap(), before);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let (ledger, _, key) = setup(10);
        assert_eq!(
            ledger.reserve(key, LeaveDays::ZERO).unwrap_err(),
            LeaveError::InvalidAmount(LeaveDays::ZERO)
        );
        assert!(matches!(
            ledger.lapse(&key, -LeaveDays::whole(1)),
            Err(LeaveError::InvalidAmount(_))
        ));
    }

    #[test]
    fn missing_row_is_not_found() {
        let (ledger, _, key) = setup(10);
        let other = BalanceKey { year: 2030, ..key };
        assert!(matches!(
            ledger.reserve(other, LeaveDays::whole(1)),
            Err(LeaveError::NotFound { .. })
        ));
    }

    #[test]
    fn commit_is_idempotent() {
        let (ledger, _, key) = setup(10);
        let mut reservation = ledger.reserve(key, LeaveDays::whole(3)).unwrap();
        ledger.commit(&mut reservation).unwrap();
        ledger.commit(&mut reservation).unwrap();

        let row = ledger.balance(&key).unwrap();
        assert_eq!(row.used, LeaveDays::whole(3));
        assert_eq!(row.pending, LeaveDays::ZERO);
        assert_eq!(row.available_balance, LeaveDays::whole(7));
    }

    #[test]
    fn release_returns_held_days() {
        let (ledger, _, key) = setup(10);
        let mut reservation = ledger.reserve(key, LeaveDays::HALF).unwrap();
        ledger.release(&mut reservation).unwrap();

        let row = ledger.balance(&key).unwrap();
        assert_eq!(row.pending, LeaveDays::ZERO);
        assert_eq!(row.available_balance, LeaveDays::whole(10));
        assert!(ledger.commit(&mut reservation).is_err());
    }

    #[test]
    fn revert_used_returns_committed_days() {
        let (ledger, _, key) = setup(10);
        let mut reservation = ledger.reserve(key, LeaveDays::whole(2)).unwrap();
        assert!(ledger.revert_used(&mut reservation).is_err());
        ledger.commit(&mut reservation).unwrap();
        ledger.revert_used(&mut reservation).unwrap();

        let row = ledger.balance(&key).unwrap();
        assert_eq!(row.used, LeaveDays::ZERO);
        assert_eq!(row.available_balance, LeaveDays::whole(10));
        assert!(row.is_consistent());
    }

    #[test]
    fn encash_requires_encashable_type() {
        let (ledger, _, key) = setup(10);
        assert!(matches!(
            ledger.encash(&key, &leave_type(false), LeaveDays::whole(2)),
            Err(LeaveError::Validation(_))
        ));
        let row = ledger.encash(&key, &leave_type(true), LeaveDays::whole(2)).unwrap();
        assert_eq!(row.encashed, LeaveDays::whole(2));
        assert_eq!(row.available_balance, LeaveDays::whole(8));
    }

    #[test]
    fn lapse_may_overdraw() {
        let (ledger, _, key) = setup(2);
        let row = ledger.lapse(&key, LeaveDays::whole(3)).unwrap();
        assert_eq!(row.available_balance, -LeaveDays::whole(1));
        assert!(row.is_consistent());
    }

    #[test]
    fn rollover_carries_forward_up_to_limit() {
        let store = Arc::new(MemoryStore::new());
        let ledger = Ledger::new(store.clone());
        let tenant = TenantId::new();
        let person = employee(tenant);
        let annual = leave_type(false);

        let last_year = BalanceKey {
            tenant_id: tenant,
            employee_id: person.id,
            leave_type_id: annual.id,
            year: 2025,
        };
        store.put_balance(LeaveBalance::open(last_year, LeaveDays::whole(12), LeaveDays::ZERO));

        let opened = ledger.rollover(2026, &[person.clone()], &[annual.clone()]);
        assert_eq!(opened, 1);

        let row = ledger.balance(&BalanceKey { year: 2026, ..last_year }).unwrap();
        assert_eq!(row.carried_forward, LeaveDays::whole(5));
        assert_eq!(row.opening_balance, LeaveDays::whole(5));
        assert_eq!(row.available_balance, LeaveDays::whole(17));

        assert_eq!(ledger.rollover(2026, &[person], &[annual]), 0);
    }

    #[test]
    fn rollover_skips_inapplicable_types_and_inactive_staff() {
        let store = Arc::new(MemoryStore::new());
        let ledger = Ledger::new(store);
        let tenant = TenantId::new();

        let mut paternity = leave_type(false);
        paternity.applicable_gender = ApplicableGender::Male;
        let mut retired = leave_type(false);
        retired.is_active = false;
        let mut departed = employee(tenant);
        departed.status = EmployeeStatus::Terminated;

        assert_eq!(ledger.rollover(2026, &[employee(tenant), departed], &[paternity, retired]), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Reserve(i64),
        Commit(usize),
        Release(usize),
        Revert(usize),
        Lapse(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..6).prop_map(Op::Reserve),
            (0usize..8).prop_map(Op::Commit),
            (0usize..8).prop_map(Op::Release),
            (0usize..8).prop_map(Op::Revert),
            (1i64..3).prop_map(Op::Lapse),
        ]
    }

    proptest! {
        #[test]
        fn ledger_invariant_holds_for_any_sequence(ops in proptest::collection::vec(op(), 1..40)) {
            let (ledger, _, key) = setup(15);
            let mut held: Vec<Reservation> = Vec::new();
            for op in ops {
                let _ = match op {
                    Op::Reserve(days) => ledger.reserve(key, LeaveDays::whole(days)).map(|r| held.push(r)),
                    Op::Commit(i) if i < held.len() => ledger.commit(&mut held[i]),
                    Op::Release(i) if i < held.len() => ledger.release(&mut held[i]),
                    Op::Revert(i) if i < held.len() => ledger.revert_used(&mut held[i]),
                    Op::Lapse(days) => ledger.lapse(&key, LeaveDays::whole(days)).map(|_| ()),
                    _ => Ok(()),
                };
                let row = ledger.balance(&key).unwrap();
                prop_assert!(row.is_consistent());
                prop_assert!(!row.pending.is_negative());
                prop_assert!(!row.used.is_negative());
            }
        }
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use hrm_leave::LeaveResult;
use hrm_leave::config::WorkflowSettings;
use hrm_leave::leave::{ApplyLeave, ApplyOutcome, LeaveService};
use hrm_leave::model::{
    ApplicableGender, BalanceKey, DepartmentId, Employee, EmployeeId, EmployeeStatus, LeaveBalance,
    LeaveDays, LeaveType, LeaveTypeId, RoleCode, TenantId,
};
use hrm_leave::services::{FixedClock, MemoryAuditSink, MemoryDispatcher};
use hrm_leave::store::MemoryStore;

pub const YEAR: i32 = 2026;

/// A tenant with one employee, their team lead, an HR manager and a company
/// admin. The employee starts the year with 10 days of annual leave.
pub struct World {
    pub store: Arc<MemoryStore>,
    pub service: LeaveService,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<MemoryDispatcher>,
    pub audit: Arc<MemoryAuditSink>,
    pub tenant: TenantId,
    pub department: DepartmentId,
    pub employee: Employee,
    pub manager: Employee,
    pub hr: Employee,
    pub admin: Employee,
    pub annual: LeaveType,
}

impl World {
    pub fn new() -> Self {
        Self::with_settings(WorkflowSettings::default())
    }

    pub fn with_settings(settings: WorkflowSettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(monday_morning()));
        let notifier = Arc::new(MemoryDispatcher::new());
        let audit = Arc::new(MemoryAuditSink::new());

        let tenant = TenantId::new();
        let department = DepartmentId::new();
        let hr = person(tenant, "HR-01", RoleCode::HrManager, None, None);
        let admin = person(tenant, "AD-01", RoleCode::CompanyAdmin, None, None);
        let manager = person(tenant, "TL-01", RoleCode::TeamLead, Some(department), None);
        let employee = person(tenant, "EM-01", RoleCode::Employee, Some(department), Some(manager.id));
        for e in [&hr, &admin, &manager, &employee] {
            store.put_employee(e.clone());
        }

        let annual = annual_leave(tenant);
        store.put_leave_type(annual.clone());

        let service = LeaveService::in_memory(store.clone(), settings)
            .with_clock(clock.clone())
            .with_notifier(notifier.clone())
            .with_audit(audit.clone());

        let world = Self {
            store,
            service,
            clock,
            notifier,
            audit,
            tenant,
            department,
            employee,
            manager,
            hr,
            admin,
            annual,
        };
        world.open_balance(world.employee.id, 10);
        world
    }

    pub fn open_balance(&self, employee: EmployeeId, days: i64) {
        self.store
            .put_balance(LeaveBalance::open(self.key_for(employee), LeaveDays::whole(days), LeaveDays::ZERO));
    }

    pub fn key_for(&self, employee: EmployeeId) -> BalanceKey {
        BalanceKey {
            tenant_id: self.tenant,
            employee_id: employee,
            leave_type_id: self.annual.id,
            year: YEAR,
        }
    }

    pub fn balance(&self) -> LeaveBalance {
        self.service.ledger().balance(&self.key_for(self.employee.id)).unwrap()
    }

    pub fn request(&self, from: NaiveDate, to: NaiveDate) -> ApplyLeave {
        ApplyLeave {
            employee_id: self.employee.id,
            leave_type_id: self.annual.id,
            from_date: from,
            to_date: to,
            reason: "Family trip".to_string(),
            is_half_day: false,
            half_day_session: None,
            contact_number: None,
            address_during_leave: None,
        }
    }

    /// The employee applies for `days` calendar days starting 10 March.
    pub fn apply_days(&self, days: u32) -> LeaveResult<ApplyOutcome> {
        let from = date(3, 10);
        let to = from + chrono::Duration::days(i64::from(days) - 1);
        self.service.apply(&self.employee.actor(), self.request(from, to))
    }
}

pub fn person(
    tenant: TenantId,
    code: &str,
    role: RoleCode,
    department: Option<DepartmentId>,
    manager: Option<EmployeeId>,
) -> Employee {
    Employee {
        id: EmployeeId::new(),
        tenant_id: tenant,
        employee_code: code.to_string(),
        first_name: code.to_string(),
        last_name: "Example".to_string(),
        role,
        department_id: department,
        reporting_manager: manager,
        gender: None,
        status: EmployeeStatus::Active,
        additional_permissions: vec![],
    }
}

pub fn annual_leave(tenant: TenantId) -> LeaveType {
    LeaveType {
        id: LeaveTypeId::new(),
        tenant_id: Some(tenant),
        name: "Annual Leave".to_string(),
        code: "AL".to_string(),
        annual_allocation: LeaveDays::whole(10),
        max_consecutive_days: Some(15),
        min_days_notice: 0,
        max_carry_forward: LeaveDays::whole(5),
        applicable_gender: ApplicableGender::All,
        is_paid: true,
        is_encashable: true,
        is_active: true,
    }
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, month, day).unwrap()
}

/// 2026-03-02 09:00 UTC, a Monday.
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(YEAR, 3, 2, 9, 0, 0).unwrap()
}

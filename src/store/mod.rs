//! Repository contracts the workflow is written against, plus an in-process
//! implementation.

pub mod memory;
pub mod seed;

use crate::error::LeaveResult;
use crate::model::{
    ApplicationId, BalanceKey, Employee, EmployeeId, LeaveApplication, LeaveBalance, LeaveStatus,
    LeaveType, LeaveTypeId, Policy, RoleCode, RoleDefinition, TenantId,
};

pub use memory::MemoryStore;
pub use seed::DirectorySeed;

/// Applications are only ever inserted or replaced through `update`.
pub trait ApplicationStore: Send + Sync {
    fn insert(&self, application: LeaveApplication) -> LeaveResult<()>;

    fn get(&self, tenant: TenantId, id: ApplicationId) -> LeaveResult<LeaveApplication>;

    /// Matching applications, newest first.
    fn list(&self, filter: &ApplicationFilter) -> Vec<LeaveApplication>;

    /// Applies `change` to a copy of the stored application and writes it
    /// back with `version + 1`. Fails with `Conflict` if the stored version
    /// is not `expected_version`; if `change` fails nothing is written.
    fn update(
        &self,
        tenant: TenantId,
        id: ApplicationId,
        expected_version: u64,
        change: &mut dyn FnMut(&mut LeaveApplication) -> LeaveResult<()>,
    ) -> LeaveResult<LeaveApplication>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationFilter {
    /// None scans every tenant; only the reminder scan does that.
    pub tenant_id: Option<TenantId>,
    pub employee_id: Option<EmployeeId>,
    pub statuses: Vec<LeaveStatus>,
}

/// Balance rows. `update` must serialize callers per key.
pub trait BalanceStore: Send + Sync {
    /// Inserts the row unless one exists for its key; returns whether it did.
    fn insert_if_absent(&self, balance: LeaveBalance) -> bool;

    fn get(&self, key: &BalanceKey) -> Option<LeaveBalance>;

    fn for_employee(&self, tenant: TenantId, employee: EmployeeId, year: i32) -> Vec<LeaveBalance>;

    /// Runs `change` on a copy of the row while holding the key's lock and
    /// stores the copy only if `change` succeeds.
    fn update(
        &self,
        key: &BalanceKey,
        change: &mut dyn FnMut(&mut LeaveBalance) -> LeaveResult<()>,
    ) -> LeaveResult<LeaveBalance>;
}

/// Read-only organisational data: employees, leave types, roles, policies.
pub trait Directory: Send + Sync {
    fn employee(&self, tenant: TenantId, id: EmployeeId) -> Option<Employee>;

    fn employees(&self, tenant: TenantId) -> Vec<Employee>;

    fn active_with_role(&self, tenant: TenantId, role: RoleCode) -> Vec<Employee>;

    fn leave_type(&self, tenant: TenantId, id: LeaveTypeId) -> Option<LeaveType>;

    /// Tenant-scoped and global leave types.
    fn leave_types(&self, tenant: TenantId) -> Vec<LeaveType>;

    /// The tenant's own definition of `code` if it has one, else the
    /// system-wide one.
    fn role(&self, tenant: TenantId, code: RoleCode) -> Option<RoleDefinition>;

    fn policies(&self, tenant: TenantId) -> Vec<Policy>;
}

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;

use crate::error::{LeaveError, LeaveResult};
use crate::model::{
    ApplicationId, BalanceKey, Employee, EmployeeId, LeaveApplication, LeaveBalance, LeaveType,
    LeaveTypeId, Policy, RoleCode, RoleDefinition, TenantId,
};
use crate::store::{ApplicationFilter, ApplicationStore, BalanceStore, Directory};

/// Keeps everything in process memory. A `DashMap` entry guard is the
/// per-key lock: balance updates on one key run one at a time while other
/// keys proceed in parallel.
#[derive(Debug)]
pub struct MemoryStore {
    applications: DashMap<ApplicationId, LeaveApplication>,
    balances: DashMap<BalanceKey, LeaveBalance>,
    employees: DashMap<EmployeeId, Employee>,
    leave_types: DashMap<LeaveTypeId, LeaveType>,
    roles: RwLock<Vec<RoleDefinition>>,
    policies: RwLock<Vec<Policy>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store seeded with the default role catalog.
    pub fn new() -> Self {
        Self {
            applications: DashMap::new(),
            balances: DashMap::new(),
            employees: DashMap::new(),
            leave_types: DashMap::new(),
            roles: RwLock::new(RoleDefinition::defaults()),
            policies: RwLock::new(Vec::new()),
        }
    }

    pub fn put_employee(&self, employee: Employee) {
        self.employees.insert(employee.id, employee);
    }

    pub fn put_leave_type(&self, leave_type: LeaveType) {
        self.leave_types.insert(leave_type.id, leave_type);
    }

    /// Adds or replaces the role with the same tenant and code.
    pub fn put_role(&self, role: RoleDefinition) {
        let mut roles = self.roles.write();
        roles.retain(|r| !(r.tenant_id == role.tenant_id && r.code == role.code));
        roles.push(role);
    }

    /// Policies are evaluated in insertion order.
    pub fn put_policy(&self, policy: Policy) {
        let mut policies = self.policies.write();
        match policies.iter_mut().find(|p| p.id == policy.id) {
            Some(existing) => *existing = policy,
            None => policies.push(policy),
        }
    }

    pub fn put_balance(&self, balance: LeaveBalance) {
        self.balances.insert(balance.key, balance);
    }

    /// Tenants with at least one employee on record.
    pub fn tenants(&self) -> Vec<TenantId> {
        let mut tenants: Vec<TenantId> = self.employees.iter().map(|e| e.tenant_id).collect();
        tenants.sort();
        tenants.dedup();
        tenants
    }
}

impl ApplicationStore for MemoryStore {
    fn insert(&self, application: LeaveApplication) -> LeaveResult<()> {
        match self.applications.entry(application.id) {
            Entry::Occupied(existing) => Err(LeaveError::Conflict {
                expected: 0,
                actual: existing.get().version,
            }),
            Entry::Vacant(slot) => {
                slot.insert(application);
                Ok(())
            }
        }
    }

    fn get(&self, tenant: TenantId, id: ApplicationId) -> LeaveResult<LeaveApplication> {
        self.applications
            .get(&id)
            .filter(|app| app.tenant_id == tenant)
            .map(|app| app.clone())
            .ok_or_else(|| LeaveError::not_found("leave application", id))
    }

    fn list(&self, filter: &ApplicationFilter) -> Vec<LeaveApplication> {
        let mut found: Vec<LeaveApplication> = self
            .applications
            .iter()
            .filter(|app| filter.tenant_id.is_none_or(|t| app.tenant_id == t))
            .filter(|app| filter.employee_id.is_none_or(|e| app.employee_id == e))
            .filter(|app| filter.statuses.is_empty() || filter.statuses.contains(&app.status))
            .map(|app| app.clone())
            .collect();
        found.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(a.id.cmp(&b.id)));
        found
    }

    fn update(
        &self,
        tenant: TenantId,
        id: ApplicationId,
        expected_version: u64,
        change: &mut dyn FnMut(&mut LeaveApplication) -> LeaveResult<()>,
    ) -> LeaveResult<LeaveApplication> {
        let mut stored = self
            .applications
            .get_mut(&id)
            .filter(|app| app.tenant_id == tenant)
            .ok_or_else(|| LeaveError::not_found("leave application", id))?;

        if stored.version != expected_version {
            return Err(LeaveError::Conflict {
                expected: expected_version,
                actual: stored.version,
            });
        }

        let mut next = stored.clone();
        change(&mut next)?;
        next.version = stored.version + 1;
        *stored = next.clone();
        Ok(next)
    }
}

impl BalanceStore for MemoryStore {
    fn insert_if_absent(&self, balance: LeaveBalance) -> bool {
        match self.balances.entry(balance.key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(balance);
                true
            }
        }
    }

    fn get(&self, key: &BalanceKey) -> Option<LeaveBalance> {
        self.balances.get(key).map(|row| row.clone())
    }

    fn for_employee(&self, tenant: TenantId, employee: EmployeeId, year: i32) -> Vec<LeaveBalance> {
        let mut rows: Vec<LeaveBalance> = self
            .balances
            .iter()
            .filter(|row| {
                row.key.tenant_id == tenant && row.key.employee_id == employee && row.key.year == year
            })
            .map(|row| row.clone())
            .collect();
        rows.sort_by_key(|row| row.key.leave_type_id);
        rows
    }

    fn update(
        &self,
        key: &BalanceKey,
        change: &mut dyn FnMut(&mut LeaveBalance) -> LeaveResult<()>,
    ) -> LeaveResult<LeaveBalance> {
        let mut stored = self
            .balances
            .get_mut(key)
            .ok_or_else(|| LeaveError::not_found("leave balance", key))?;
        let mut next = stored.clone();
        change(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }
}

impl Directory for MemoryStore {
    fn employee(&self, tenant: TenantId, id: EmployeeId) -> Option<Employee> {
        self.employees
            .get(&id)
            .filter(|e| e.tenant_id == tenant)
            .map(|e| e.clone())
    }

    fn employees(&self, tenant: TenantId) -> Vec<Employee> {
        let mut found: Vec<Employee> = self
            .employees
            .iter()
            .filter(|e| e.tenant_id == tenant)
            .map(|e| e.clone())
            .collect();
        found.sort_by(|a, b| a.employee_code.cmp(&b.employee_code));
        found
    }

    fn active_with_role(&self, tenant: TenantId, role: RoleCode) -> Vec<Employee> {
        self.employees(tenant)
            .into_iter()
            .filter(|e| e.role == role && e.is_active())
            .collect()
    }

    fn leave_type(&self, tenant: TenantId, id: LeaveTypeId) -> Option<LeaveType> {
        self.leave_types
            .get(&id)
            .filter(|lt| lt.visible_to(tenant))
            .map(|lt| lt.clone())
    }

    fn leave_types(&self, tenant: TenantId) -> Vec<LeaveType> {
        let mut found: Vec<LeaveType> = self
            .leave_types
            .iter()
            .filter(|lt| lt.visible_to(tenant))
            .map(|lt| lt.clone())
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        found
    }

    fn role(&self, tenant: TenantId, code: RoleCode) -> Option<RoleDefinition> {
        let roles = self.roles.read();
        roles
            .iter()
            .find(|r| r.code == code && r.tenant_id == Some(tenant))
            .or_else(|| roles.iter().find(|r| r.code == code && r.tenant_id.is_none()))
            .cloned()
    }

    fn policies(&self, tenant: TenantId) -> Vec<Policy> {
        self.policies
            .read()
            .iter()
            .filter(|p| p.tenant_id == tenant)
            .cloned()
            .collect()
    }
}

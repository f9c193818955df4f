use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::model::{Employee, LeaveBalance, LeaveType, Policy, RoleDefinition};
use crate::store::MemoryStore;

/// Directory data loaded at startup: the org chart, leave catalog, tenant
/// role overrides, policies and any pre-existing balances.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DirectorySeed {
    pub employees: Vec<Employee>,
    pub leave_types: Vec<LeaveType>,
    pub roles: Vec<RoleDefinition>,
    pub policies: Vec<Policy>,
    pub balances: Vec<LeaveBalance>,
}

impl DirectorySeed {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).with_context(|| format!("reading seed file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }
}

impl MemoryStore {
    pub fn load(&self, seed: DirectorySeed) {
        info!(
            employees = seed.employees.len(),
            leave_types = seed.leave_types.len(),
            roles = seed.roles.len(),
            policies = seed.policies.len(),
            balances = seed.balances.len(),
            "loading directory seed"
        );
        seed.employees.into_iter().for_each(|e| self.put_employee(e));
        seed.leave_types.into_iter().for_each(|lt| self.put_leave_type(lt));
        seed.roles.into_iter().for_each(|r| self.put_role(r));
        seed.policies.into_iter().for_each(|p| self.put_policy(p));
        seed.balances.into_iter().for_each(|b| self.put_balance(b));
    }
}

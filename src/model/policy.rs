use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::model::days::LeaveDays;
use crate::model::employee::Actor;
use crate::model::ids::{DepartmentId, EmployeeId, PolicyId, TenantId};
use crate::model::role::{Module, RoleCode};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    Leave,
    Attendance,
    Payroll,
    Performance,
    General,
}

impl PolicyType {
    pub fn covers(self, module: Module) -> bool {
        match self {
            PolicyType::General => true,
            PolicyType::Leave => module == Module::Leave,
            PolicyType::Attendance => module == Module::Attendance,
            PolicyType::Payroll => module == Module::Payroll,
            PolicyType::Performance => module == Module::Performance,
        }
    }
}

/// The closed set of rule kinds a tenant may configure.
///
/// Kinds this build does not know deserialize to `Unsupported` and never
/// deny anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    MaxLeaveDays { limit: LeaveDays },
    /// Inclusive hour window in the tenant's local time.
    WorkingHours { start: u32, end: u32 },
    ApprovalHierarchy,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl PolicyRule {
    pub fn active(kind: RuleKind) -> Self {
        Self { kind, is_active: true }
    }
}

fn default_true() -> bool {
    true
}

/// Who a policy binds. Every non-empty list must contain the actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliesTo {
    #[serde(default)]
    pub roles: Vec<RoleCode>,
    #[serde(default)]
    pub departments: Vec<DepartmentId>,
    #[serde(default)]
    pub employees: Vec<EmployeeId>,
}

impl AppliesTo {
    pub fn matches(&self, actor: &Actor) -> bool {
        if !self.roles.is_empty() && !self.roles.contains(&actor.role) {
            return false;
        }
        if !self.departments.is_empty()
            && !actor
                .department_id
                .is_some_and(|dept| self.departments.contains(&dept))
        {
            return false;
        }
        if !self.employees.is_empty() && !self.employees.contains(&actor.id) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub rules: Vec<PolicyRule>,
    #[serde(default)]
    pub applies_to: AppliesTo,
    pub effective_from: DateTime<Utc>,
    pub effective_to: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Policy {
    pub fn in_effect(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.effective_from <= now
            && self.effective_to.is_none_or(|end| end >= now)
    }
}

//! Authorization for leave transitions: role grants first, tenant policies
//! second. Everything here is a pure function of its arguments.

pub mod permission;
pub mod rules;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{LeaveError, LeaveResult};
use crate::model::{DepartmentId, EmployeeId, LeaveDays, Permission};

pub use permission::PermissionEvaluator;
pub use rules::PolicyRuleEngine;

/// What the actor is trying to touch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceContext {
    pub owner_id: Option<EmployeeId>,
    pub owner_department: Option<DepartmentId>,
    /// The actor appears in the owner's reporting-manager chain.
    pub actor_manages_owner: bool,
    pub total_days: Option<LeaveDays>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvalContext {
    pub now: DateTime<Utc>,
    /// `now` in the tenant's local time, for hour-of-day rules.
    pub local_time: NaiveDateTime,
    pub resource: ResourceContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    NoGrant { permission: Permission },
    ConditionFailed { permission: Permission, condition: &'static str },
    Policy { policy: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> LeaveResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial.into()),
        }
    }
}

impl From<Denial> for LeaveError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NoGrant { permission } => LeaveError::NotAuthorized {
                permission,
                reason: "no grant".to_string(),
            },
            Denial::ConditionFailed { permission, condition } => LeaveError::NotAuthorized {
                permission,
                reason: format!("condition {condition} not met"),
            },
            Denial::Policy { policy, message } => LeaveError::PolicyViolation { policy, message },
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::days::LeaveDays;
use crate::model::ids::{EmployeeId, LeaveTypeId, TenantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub leave_type_id: LeaveTypeId,
    pub year: i32,
}

impl fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.tenant_id, self.employee_id, self.leave_type_id, self.year
        )
    }
}

/// Per employee, leave type and year counters.
///
/// `available_balance` is stored rather than derived so that readers see the
/// same figure the ledger checked against; every ledger mutation keeps it
/// equal to [`LeaveBalance::expected_available`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub key: BalanceKey,
    pub opening_balance: LeaveDays,
    pub allocated: LeaveDays,
    pub used: LeaveDays,
    pub pending: LeaveDays,
    pub encashed: LeaveDays,
    pub carried_forward: LeaveDays,
    pub lapsed: LeaveDays,
    pub available_balance: LeaveDays,
}

impl LeaveBalance {
    /// A fresh row with nothing used or pending.
    pub fn open(key: BalanceKey, allocated: LeaveDays, carried_forward: LeaveDays) -> Self {
        Self {
            key,
            opening_balance: carried_forward,
            allocated,
            used: LeaveDays::ZERO,
            pending: LeaveDays::ZERO,
            encashed: LeaveDays::ZERO,
            carried_forward,
            lapsed: LeaveDays::ZERO,
            available_balance: allocated + carried_forward,
        }
    }

    pub fn expected_available(&self) -> LeaveDays {
        self.allocated + self.carried_forward - self.used - self.pending - self.encashed - self.lapsed
    }

    pub fn is_consistent(&self) -> bool {
        self.available_balance == self.expected_available()
    }
}

/// Row shape returned by balance queries.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BalanceSummary {
    #[schema(value_type = String, format = "uuid")]
    pub leave_type_id: LeaveTypeId,
    pub year: i32,
    #[schema(value_type = String, example = "12")]
    pub allocated: LeaveDays,
    #[schema(value_type = String, example = "0")]
    pub carried_forward: LeaveDays,
    #[schema(value_type = String, example = "3")]
    pub used: LeaveDays,
    #[schema(value_type = String, example = "2")]
    pub pending: LeaveDays,
    #[schema(value_type = String, example = "7")]
    pub available: LeaveDays,
}

impl From<&LeaveBalance> for BalanceSummary {
    fn from(balance: &LeaveBalance) -> Self {
        Self {
            leave_type_id: balance.key.leave_type_id,
            year: balance.key.year,
            allocated: balance.allocated,
            carried_forward: balance.carried_forward,
            used: balance.used,
            pending: balance.pending,
            available: balance.available_balance,
        }
    }
}

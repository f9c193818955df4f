use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::days::LeaveDays;
use crate::model::employee::Gender;
use crate::model::ids::{LeaveTypeId, TenantId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicableGender {
    #[default]
    All,
    Male,
    Female,
}

impl ApplicableGender {
    /// Employees with no recorded gender are eligible for every leave type.
    pub fn admits(self, gender: Option<Gender>) -> bool {
        match (self, gender) {
            (ApplicableGender::All, _) | (_, None) => true,
            (ApplicableGender::Male, Some(g)) => g == Gender::Male,
            (ApplicableGender::Female, Some(g)) => g == Gender::Female,
        }
    }
}

/// A kind of leave and its allocation rules. Global when `tenant_id` is None.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveType {
    #[schema(value_type = String, format = "uuid")]
    pub id: LeaveTypeId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub tenant_id: Option<TenantId>,
    #[schema(example = "Annual Leave")]
    pub name: String,
    #[schema(example = "AL")]
    pub code: String,
    #[schema(value_type = String, example = "12")]
    pub annual_allocation: LeaveDays,
    /// Longest single application, in days. None means unlimited.
    #[schema(example = 10)]
    pub max_consecutive_days: Option<u32>,
    #[schema(example = 3)]
    pub min_days_notice: u32,
    #[schema(value_type = String, example = "5")]
    pub max_carry_forward: LeaveDays,
    pub applicable_gender: ApplicableGender,
    pub is_paid: bool,
    pub is_encashable: bool,
    pub is_active: bool,
}

impl LeaveType {
    pub fn visible_to(&self, tenant: TenantId) -> bool {
        self.tenant_id.is_none_or(|owner| owner == tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_filter_admits_unrecorded_gender() {
        assert!(ApplicableGender::Female.admits(None));
        assert!(ApplicableGender::Female.admits(Some(Gender::Female)));
        assert!(!ApplicableGender::Female.admits(Some(Gender::Male)));
        assert!(ApplicableGender::All.admits(Some(Gender::Other)));
    }
}

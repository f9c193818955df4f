use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::ids::{DepartmentId, EmployeeId, TenantId};
use crate::model::role::{DirectGrant, RoleCode};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Terminated,
}

/// The slice of an employee record the leave workflow reads. Owned by the
/// employee directory; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub tenant_id: TenantId,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub role: RoleCode,
    pub department_id: Option<DepartmentId>,
    pub reporting_manager: Option<EmployeeId>,
    pub gender: Option<Gender>,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub additional_permissions: Vec<DirectGrant>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            tenant_id: self.tenant_id,
            role: self.role,
            department_id: self.department_id,
            manager_id: self.reporting_manager,
            grants: self.additional_permissions.clone(),
        }
    }
}

/// The authorization subject for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: EmployeeId,
    pub tenant_id: TenantId,
    pub role: RoleCode,
    pub department_id: Option<DepartmentId>,
    pub manager_id: Option<EmployeeId>,
    #[serde(default)]
    pub grants: Vec<DirectGrant>,
}

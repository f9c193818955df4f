use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::ids::TenantId;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCode {
    SuperAdmin,
    CompanyAdmin,
    HrManager,
    TeamLead,
    Employee,
}

impl RoleCode {
    /// Roles allowed to act on another employee's application outside the
    /// approval chain (e.g. cancelling on their behalf).
    pub fn is_administrator(self) -> bool {
        matches!(self, RoleCode::SuperAdmin | RoleCode::CompanyAdmin)
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Module {
    Employee,
    Attendance,
    Leave,
    Payroll,
    Performance,
    Task,
    Admin,
    Reports,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Approve,
    Export,
    Import,
}

/// A `module.action` capability, e.g. `LEAVE.APPROVE`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub module: Module,
    pub action: Action,
}

impl Permission {
    pub const fn new(module: Module, action: Action) -> Self {
        Self { module, action }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.action)
    }
}

/// Restrictions attached to a grant. Every condition that is set must hold.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GrantConditions {
    #[serde(default)]
    pub own_data_only: bool,
    #[serde(default)]
    pub department_only: bool,
    #[serde(default)]
    pub reporting_hierarchy: bool,
}

impl GrantConditions {
    pub const NONE: Self = Self {
        own_data_only: false,
        department_only: false,
        reporting_hierarchy: false,
    };

    pub const OWN_DATA: Self = Self {
        own_data_only: true,
        department_only: false,
        reporting_hierarchy: false,
    };

    pub const REPORTING_HIERARCHY: Self = Self {
        own_data_only: false,
        department_only: false,
        reporting_hierarchy: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.own_data_only || self.department_only || self.reporting_hierarchy)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RolePermission {
    pub permission: Permission,
    pub granted: bool,
    #[serde(default)]
    pub conditions: GrantConditions,
}

impl RolePermission {
    pub fn grant(module: Module, action: Action, conditions: GrantConditions) -> Self {
        Self {
            permission: Permission::new(module, action),
            granted: true,
            conditions,
        }
    }
}

/// A role and the permissions it carries. System roles have no tenant;
/// a tenant may define its own role with the same code to override one.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub tenant_id: Option<TenantId>,
    pub code: RoleCode,
    pub name: String,
    pub level: u8,
    pub permissions: Vec<RolePermission>,
}

impl RoleDefinition {
    pub fn grants_for(&self, permission: Permission) -> impl Iterator<Item = &RolePermission> + '_ {
        self.permissions
            .iter()
            .filter(move |p| p.granted && p.permission == permission)
    }

    /// The built-in role catalog every tenant starts with.
    pub fn defaults() -> Vec<RoleDefinition> {
        use Action::*;

        let every_permission = Module::iter()
            .flat_map(|module| Action::iter().map(move |action| (module, action)))
            .map(|(module, action)| RolePermission::grant(module, action, GrantConditions::NONE))
            .collect();

        vec![
            RoleDefinition {
                tenant_id: None,
                code: RoleCode::Employee,
                name: "Employee".to_string(),
                level: 1,
                permissions: vec![
                    RolePermission::grant(Module::Leave, Create, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Leave, Read, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Leave, Update, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Attendance, Create, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Attendance, Read, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Payroll, Read, GrantConditions::OWN_DATA),
                ],
            },
            RoleDefinition {
                tenant_id: None,
                code: RoleCode::TeamLead,
                name: "Team Lead".to_string(),
                level: 2,
                permissions: vec![
                    RolePermission::grant(Module::Leave, Create, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Leave, Update, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Leave, Read, GrantConditions::NONE),
                    RolePermission::grant(Module::Leave, Approve, GrantConditions::REPORTING_HIERARCHY),
                    RolePermission::grant(Module::Attendance, Read, GrantConditions::NONE),
                    RolePermission::grant(Module::Attendance, Update, GrantConditions::NONE),
                    RolePermission::grant(Module::Employee, Read, GrantConditions::NONE),
                    RolePermission::grant(Module::Reports, Read, GrantConditions::NONE),
                ],
            },
            RoleDefinition {
                tenant_id: None,
                code: RoleCode::HrManager,
                name: "HR Manager".to_string(),
                level: 3,
                permissions: vec![
                    RolePermission::grant(Module::Leave, Create, GrantConditions::OWN_DATA),
                    RolePermission::grant(Module::Leave, Read, GrantConditions::NONE),
                    RolePermission::grant(Module::Leave, Update, GrantConditions::NONE),
                    RolePermission::grant(Module::Leave, Approve, GrantConditions::NONE),
                    RolePermission::grant(Module::Employee, Create, GrantConditions::NONE),
                    RolePermission::grant(Module::Employee, Read, GrantConditions::NONE),
                    RolePermission::grant(Module::Employee, Update, GrantConditions::NONE),
                    RolePermission::grant(Module::Payroll, Create, GrantConditions::NONE),
                    RolePermission::grant(Module::Payroll, Read, GrantConditions::NONE),
                    RolePermission::grant(Module::Reports, Read, GrantConditions::NONE),
                    RolePermission::grant(Module::Reports, Export, GrantConditions::NONE),
                ],
            },
            RoleDefinition {
                tenant_id: None,
                code: RoleCode::CompanyAdmin,
                name: "Company Admin".to_string(),
                level: 4,
                permissions: every_permission,
            },
        ]
    }
}

/// A permission assigned directly to one employee, on top of their role.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DirectGrant {
    pub permission: Permission,
    pub granted: bool,
    #[serde(default)]
    pub conditions: GrantConditions,
    pub expires_at: Option<DateTime<Utc>>,
}

impl DirectGrant {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.granted && self.expires_at.is_none_or(|expiry| expiry > now)
    }
}

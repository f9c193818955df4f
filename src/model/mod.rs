pub mod balance;
pub mod days;
pub mod employee;
pub mod ids;
pub mod leave_request;
pub mod leave_type;
pub mod policy;
pub mod role;

pub use balance::{BalanceKey, BalanceSummary, LeaveBalance};
pub use days::{DayCounting, HalfDaySession, LeaveDays};
pub use employee::{Actor, Employee, EmployeeStatus, Gender};
pub use ids::{ApplicationId, DepartmentId, EmployeeId, LeaveTypeId, PolicyId, TenantId};
pub use leave_request::{
    Approver, ApproverRole, ApproverStatus, LeaveApplication, LeaveStatus, Reservation,
    ReservationState, StatusChange, Workflow,
};
pub use leave_type::{ApplicableGender, LeaveType};
pub use policy::{AppliesTo, Policy, PolicyRule, PolicyType, RuleKind};
pub use role::{Action, DirectGrant, GrantConditions, Module, Permission, RoleCode, RoleDefinition, RolePermission};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::balance::BalanceKey;
use crate::model::days::{HalfDaySession, LeaveDays};
use crate::model::ids::{ApplicationId, EmployeeId, LeaveTypeId, TenantId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    ManagerApproved,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Still waiting on at least one approver.
    pub fn awaiting_approval(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::ManagerApproved)
    }

    pub fn is_terminal(self) -> bool {
        !self.awaiting_approval()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApproverRole {
    Manager,
    HrManager,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApproverStatus {
    Pending,
    Approved,
    Rejected,
}

/// One level of the approval chain.
///
/// `eligible` lists everyone who may act for the level; the first of them to
/// act is recorded in `acted_by`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Approver {
    pub level: u32,
    #[schema(value_type = String, format = "uuid")]
    pub approver_id: EmployeeId,
    #[schema(value_type = Vec<String>)]
    pub eligible: Vec<EmployeeId>,
    pub role: ApproverRole,
    pub status: ApproverStatus,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub acted_by: Option<EmployeeId>,
    pub comments: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub action_at: Option<DateTime<Utc>>,
    pub is_required: bool,
}

impl Approver {
    pub fn is_pending(&self) -> bool {
        self.status == ApproverStatus::Pending
    }

    pub fn can_act(&self, employee: EmployeeId) -> bool {
        self.is_pending() && self.eligible.contains(&employee)
    }

    pub(crate) fn record(&mut self, status: ApproverStatus, actor: EmployeeId, comments: Option<String>, at: DateTime<Utc>) {
        self.status = status;
        self.acted_by = Some(actor);
        self.comments = comments;
        self.action_at = Some(at);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Workflow {
    pub current_level: u32,
    pub total_levels: u32,
    pub approvers: Vec<Approver>,
}

impl Workflow {
    /// The lowest-level pending slot `employee` may act for.
    pub fn slot_for(&self, employee: EmployeeId) -> Option<usize> {
        self.approvers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.can_act(employee))
            .min_by_key(|(_, a)| a.level)
            .map(|(idx, _)| idx)
    }

    pub fn pending_required(&self) -> impl Iterator<Item = &Approver> + '_ {
        self.approvers.iter().filter(|a| a.is_required && a.is_pending())
    }

    pub fn next_pending(&self) -> Option<&Approver> {
        self.approvers
            .iter()
            .filter(|a| a.is_pending())
            .min_by_key(|a| a.level)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusChange {
    pub from_status: Option<LeaveStatus>,
    pub to_status: LeaveStatus,
    #[schema(value_type = String, format = "uuid")]
    pub changed_by: EmployeeId,
    #[schema(value_type = String, format = "date-time")]
    pub changed_at: DateTime<Utc>,
    pub comments: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationState {
    Held,
    Committed,
    Released,
    Reverted,
}

/// A hold on balance days taken by `apply`. Travels with the application so
/// the ledger can tell a repeated commit from a first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub key: BalanceKey,
    pub days: LeaveDays,
    pub state: ReservationState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveApplication {
    pub id: ApplicationId,
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub leave_type_id: LeaveTypeId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_days: LeaveDays,
    pub is_half_day: bool,
    pub half_day_session: Option<HalfDaySession>,
    pub reason: String,
    pub contact_number: Option<String>,
    pub address_during_leave: Option<String>,
    pub status: LeaveStatus,
    pub workflow: Workflow,
    pub status_history: Vec<StatusChange>,
    pub reservation: Reservation,
    pub applied_at: DateTime<Utc>,
    pub final_approved_by: Option<EmployeeId>,
    pub final_approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<EmployeeId>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub cancelled_by: Option<EmployeeId>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    /// Bumped by every stored update; used for optimistic concurrency.
    pub version: u64,
}

impl LeaveApplication {
    pub(crate) fn transition(
        &mut self,
        to: LeaveStatus,
        actor: EmployeeId,
        comments: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.status_history.push(StatusChange {
            from_status: Some(self.status),
            to_status: to,
            changed_by: actor,
            changed_at: at,
            comments,
        });
        self.status = to;
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::WorkflowSettings;
use crate::error::{LeaveError, LeaveResult};
use crate::leave::chain::ApprovalChainBuilder;
use crate::leave::ledger::Ledger;
use crate::model::{
    Action, Actor, ApplicationId, ApproverRole, ApproverStatus, BalanceKey, BalanceSummary,
    Employee, EmployeeId, HalfDaySession, LeaveApplication, LeaveDays, LeaveStatus, LeaveType,
    LeaveTypeId, Module, Permission, StatusChange,
};
use crate::policy::{Decision, EvalContext, PermissionEvaluator, ResourceContext};
use crate::services::{
    AuditEntry, AuditSink, Clock, EventKind, LeaveEvent, LogDispatcher, NotificationDispatcher,
    RetryingDispatcher, SystemClock, TracingAuditSink,
};
use crate::store::{ApplicationFilter, ApplicationStore, BalanceStore, Directory, MemoryStore};

pub const LEAVE_CREATE: Permission = Permission::new(Module::Leave, Action::Create);
pub const LEAVE_READ: Permission = Permission::new(Module::Leave, Action::Read);
pub const LEAVE_UPDATE: Permission = Permission::new(Module::Leave, Action::Update);
pub const LEAVE_APPROVE: Permission = Permission::new(Module::Leave, Action::Approve);

const RESOURCE_TYPE: &str = "LEAVE_APPLICATION";
const MAX_HIERARCHY_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyLeave {
    pub employee_id: EmployeeId,
    pub leave_type_id: LeaveTypeId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: String,
    pub is_half_day: bool,
    pub half_day_session: Option<HalfDaySession>,
    pub contact_number: Option<String>,
    pub address_during_leave: Option<String>,
}

/// An approver's decision on one application. `expected_version` is the
/// version the caller last saw; None means "whatever is current".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decide {
    pub application_id: ApplicationId,
    pub comments: Option<String>,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CancelLeave {
    pub application_id: ApplicationId,
    pub reason: Option<String>,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub employee_id: Option<EmployeeId>,
    pub status: Option<LeaveStatus>,
    /// 1-based.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyOutcome {
    pub application_id: ApplicationId,
    pub status: LeaveStatus,
    pub total_days: LeaveDays,
    pub approvers_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproveOutcome {
    pub new_status: LeaveStatus,
    pub workflow_complete: bool,
    pub next_approver_role: Option<ApproverRole>,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionOutcome {
    pub new_status: LeaveStatus,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: usize,
}

/// The leave state machine.
///
/// ```text
/// PENDING ──manager approves──▶ MANAGER_APPROVED ──last approval──▶ APPROVED
///    │                               │                                 │
///    └───────── reject ──────────────┴──▶ REJECTED                     │
///    └───────── cancel ──────────────┴──▶ CANCELLED ◀──── cancel ──────┘
/// ```
///
/// Every operation reads a snapshot, authorizes against it, then writes
/// through a version-checked update; ledger changes happen inside that
/// update so they are discarded together with it on failure.
pub struct LeaveService {
    applications: Arc<dyn ApplicationStore>,
    directory: Arc<dyn Directory>,
    ledger: Ledger,
    evaluator: PermissionEvaluator,
    chain: ApprovalChainBuilder,
    notifier: Arc<dyn NotificationDispatcher>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    settings: WorkflowSettings,
}

impl LeaveService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        balances: Arc<dyn BalanceStore>,
        directory: Arc<dyn Directory>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            applications,
            directory,
            ledger: Ledger::new(balances),
            evaluator: PermissionEvaluator::new(),
            chain: ApprovalChainBuilder,
            notifier: Arc::new(RetryingDispatcher::new(Arc::new(LogDispatcher))),
            audit: Arc::new(TracingAuditSink),
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn in_memory(store: Arc<MemoryStore>, settings: WorkflowSettings) -> Self {
        Self::new(store.clone(), store.clone(), store, settings)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationDispatcher>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Fills in the actor's direct grants from the directory; token claims
    /// only carry identity and role.
    pub fn hydrate_actor(&self, mut actor: Actor) -> Actor {
        if actor.grants.is_empty() {
            if let Some(employee) = self.directory.employee(actor.tenant_id, actor.id) {
                actor.grants = employee.additional_permissions;
            }
        }
        actor
    }

    #[instrument(skip_all, fields(actor = %actor.id, employee = %request.employee_id))]
    pub fn apply(&self, actor: &Actor, request: ApplyLeave) -> LeaveResult<ApplyOutcome> {
        let employee = self.employee(actor, request.employee_id)?;
        let leave_type = self
            .directory
            .leave_type(actor.tenant_id, request.leave_type_id)
            .ok_or_else(|| LeaveError::not_found("leave type", request.leave_type_id))?;

        let total_days = self.requested_days(&request)?;
        let resource = self.resource_for(actor, &employee, Some(total_days));
        self.authorize(actor, LEAVE_CREATE, resource)?;
        validate_request(&request, &leave_type, &employee, total_days, self.today())?;

        let workflow = self.chain.from_directory(self.directory.as_ref(), &employee)?;
        let key = BalanceKey {
            tenant_id: employee.tenant_id,
            employee_id: employee.id,
            leave_type_id: leave_type.id,
            year: request.from_date.year(),
        };
        let reservation = self.ledger.reserve(key, total_days)?;

        let now = self.clock.now();
        let application = LeaveApplication {
            id: ApplicationId::new(),
            tenant_id: employee.tenant_id,
            employee_id: employee.id,
            leave_type_id: leave_type.id,
            from_date: request.from_date,
            to_date: request.to_date,
            total_days,
            is_half_day: request.is_half_day,
            half_day_session: request.half_day_session,
            reason: request.reason,
            contact_number: request.contact_number,
            address_during_leave: request.address_during_leave,
            status: LeaveStatus::Pending,
            workflow,
            status_history: vec![StatusChange {
                from_status: None,
                to_status: LeaveStatus::Pending,
                changed_by: actor.id,
                changed_at: now,
                comments: Some("Leave application submitted".to_string()),
            }],
            reservation,
            applied_at: now,
            final_approved_by: None,
            final_approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            cancelled_by: None,
            cancelled_at: None,
            cancellation_reason: None,
            version: 0,
        };

        if let Err(err) = self.applications.insert(application.clone()) {
            let mut reservation = reservation;
            if let Err(release_err) = self.ledger.release(&mut reservation) {
                warn!(error = %release_err, "failed to release reservation after insert failure");
            }
            return Err(err);
        }

        info!(application = %application.id, days = %total_days, "leave application submitted");
        self.record(actor, "LEAVE_APPLIED", &application, json!({ "days": total_days, "leave_type": leave_type.code }));
        let approvers = pending_approvers(&application);
        self.notify(EventKind::Applied, &application, approvers);

        Ok(ApplyOutcome {
            application_id: application.id,
            status: application.status,
            total_days,
            approvers_count: application.workflow.approvers.len(),
        })
    }

    #[instrument(skip_all, fields(actor = %actor.id, application = %decision.application_id))]
    pub fn approve(&self, actor: &Actor, decision: Decide) -> LeaveResult<ApproveOutcome> {
        let snapshot = self.applications.get(actor.tenant_id, decision.application_id)?;
        let expected = expected_version(&snapshot, decision.expected_version)?;
        if !snapshot.status.awaiting_approval() {
            return Err(LeaveError::InvalidState {
                status: snapshot.status,
                operation: "approve",
            });
        }
        self.authorize(actor, LEAVE_APPROVE, self.resource_for_application(actor, &snapshot))?;
        if snapshot.workflow.slot_for(actor.id).is_none() {
            return Err(no_slot());
        }

        let now = self.clock.now();
        let comments = decision.comments;
        let updated = self.applications.update(snapshot.tenant_id, snapshot.id, expected, &mut |app| {
            let idx = app.workflow.slot_for(actor.id).ok_or_else(no_slot)?;
            let role = app.workflow.approvers[idx].role;
            app.workflow.approvers[idx].record(ApproverStatus::Approved, actor.id, comments.clone(), now);

            if app.workflow.pending_required().next().is_none() {
                self.ledger.commit(&mut app.reservation)?;
                app.final_approved_by = Some(actor.id);
                app.final_approved_at = Some(now);
                app.transition(LeaveStatus::Approved, actor.id, comments.clone(), now);
            } else {
                if let Some(next) = app.workflow.next_pending() {
                    app.workflow.current_level = next.level;
                }
                let status = if role == ApproverRole::Manager {
                    LeaveStatus::ManagerApproved
                } else {
                    app.status
                };
                app.transition(status, actor.id, comments.clone(), now);
            }
            Ok(())
        })?;

        let complete = updated.status == LeaveStatus::Approved;
        info!(status = %updated.status, complete, "leave approval recorded");
        self.record(actor, "LEAVE_APPROVED", &updated, json!({ "status": updated.status, "comments": comments }));
        if complete {
            self.notify(EventKind::Approved, &updated, vec![updated.employee_id]);
        } else if updated.status == LeaveStatus::ManagerApproved && snapshot.status == LeaveStatus::Pending {
            let next = updated
                .workflow
                .next_pending()
                .map(|a| a.eligible.clone())
                .unwrap_or_default();
            self.notify(EventKind::ManagerApproved, &updated, next);
        }

        Ok(ApproveOutcome {
            new_status: updated.status,
            workflow_complete: complete,
            next_approver_role: if complete {
                None
            } else {
                updated.workflow.next_pending().map(|a| a.role)
            },
            version: updated.version,
        })
    }

    /// Rejection by any pending approver ends the workflow.
    #[instrument(skip_all, fields(actor = %actor.id, application = %decision.application_id))]
    pub fn reject(&self, actor: &Actor, decision: Decide) -> LeaveResult<TransitionOutcome> {
        let snapshot = self.applications.get(actor.tenant_id, decision.application_id)?;
        let expected = expected_version(&snapshot, decision.expected_version)?;
        if !snapshot.status.awaiting_approval() {
            return Err(LeaveError::InvalidState {
                status: snapshot.status,
                operation: "reject",
            });
        }
        self.authorize(actor, LEAVE_APPROVE, self.resource_for_application(actor, &snapshot))?;
        if snapshot.workflow.slot_for(actor.id).is_none() {
            return Err(no_slot());
        }

        let now = self.clock.now();
        let comments = decision.comments;
        let updated = self.applications.update(snapshot.tenant_id, snapshot.id, expected, &mut |app| {
            let idx = app.workflow.slot_for(actor.id).ok_or_else(no_slot)?;
            app.workflow.approvers[idx].record(ApproverStatus::Rejected, actor.id, comments.clone(), now);
            self.ledger.release(&mut app.reservation)?;
            app.rejected_by = Some(actor.id);
            app.rejected_at = Some(now);
            app.rejection_reason = comments.clone();
            app.transition(LeaveStatus::Rejected, actor.id, comments.clone(), now);
            Ok(())
        })?;

        info!(days = %updated.total_days, "leave rejected");
        self.record(actor, "LEAVE_REJECTED", &updated, json!({ "comments": comments }));
        self.notify(EventKind::Rejected, &updated, vec![updated.employee_id]);

        Ok(TransitionOutcome {
            new_status: updated.status,
            version: updated.version,
        })
    }

    /// Withdraws a pending application or takes back an approved one.
    #[instrument(skip_all, fields(actor = %actor.id, application = %request.application_id))]
    pub fn cancel(&self, actor: &Actor, request: CancelLeave) -> LeaveResult<TransitionOutcome> {
        let snapshot = self.applications.get(actor.tenant_id, request.application_id)?;
        let expected = expected_version(&snapshot, request.expected_version)?;
        if matches!(snapshot.status, LeaveStatus::Rejected | LeaveStatus::Cancelled) {
            return Err(LeaveError::InvalidState {
                status: snapshot.status,
                operation: "cancel",
            });
        }
        self.authorize(actor, LEAVE_UPDATE, self.resource_for_application(actor, &snapshot))?;
        if actor.id != snapshot.employee_id && !actor.role.is_administrator() {
            return Err(LeaveError::NotAuthorized {
                permission: LEAVE_UPDATE,
                reason: "only the applicant or an administrator may cancel".to_string(),
            });
        }

        let now = self.clock.now();
        let reason = request.reason;
        let updated = self.applications.update(snapshot.tenant_id, snapshot.id, expected, &mut |app| {
            match app.status {
                LeaveStatus::Pending | LeaveStatus::ManagerApproved => self.ledger.release(&mut app.reservation)?,
                LeaveStatus::Approved => self.ledger.revert_used(&mut app.reservation)?,
                status => {
                    return Err(LeaveError::InvalidState {
                        status,
                        operation: "cancel",
                    });
                }
            }
            app.cancelled_by = Some(actor.id);
            app.cancelled_at = Some(now);
            app.cancellation_reason = reason.clone();
            app.transition(LeaveStatus::Cancelled, actor.id, reason.clone(), now);
            Ok(())
        })?;

        info!(from = %snapshot.status, days = %updated.total_days, "leave cancelled");
        self.record(actor, "LEAVE_CANCELLED", &updated, json!({ "from": snapshot.status, "reason": reason }));
        let mut recipients = pending_approvers(&snapshot);
        recipients.push(updated.employee_id);
        self.notify(EventKind::Cancelled, &updated, recipients);

        Ok(TransitionOutcome {
            new_status: updated.status,
            version: updated.version,
        })
    }

    pub fn get_application(&self, actor: &Actor, id: ApplicationId) -> LeaveResult<LeaveApplication> {
        let application = self.applications.get(actor.tenant_id, id)?;
        self.authorize(actor, LEAVE_READ, self.resource_for_application(actor, &application))?;
        Ok(application)
    }

    /// Lists the tenant's applications, newest first. Without an employee
    /// filter the actor needs unconditioned read access.
    pub fn list_applications(&self, actor: &Actor, query: ListQuery) -> LeaveResult<Page<LeaveApplication>> {
        let resource = match query.employee_id {
            Some(id) => match self.directory.employee(actor.tenant_id, id) {
                Some(employee) => self.resource_for(actor, &employee, None),
                None => ResourceContext {
                    owner_id: Some(id),
                    ..ResourceContext::default()
                },
            },
            None => ResourceContext::default(),
        };
        self.authorize(actor, LEAVE_READ, resource)?;

        let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
        let page = query.page.unwrap_or(1).max(1);
        let all = self.applications.list(&ApplicationFilter {
            tenant_id: Some(actor.tenant_id),
            employee_id: query.employee_id,
            statuses: query.status.into_iter().collect(),
        });
        let total = all.len();
        let offset = usize::try_from(page.saturating_sub(1).saturating_mul(per_page)).unwrap_or(usize::MAX);
        let data = all
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();
        Ok(Page {
            data,
            page,
            per_page,
            total,
        })
    }

    pub fn get_balances(&self, actor: &Actor, employee_id: EmployeeId, year: i32) -> LeaveResult<Vec<BalanceSummary>> {
        let employee = self.employee(actor, employee_id)?;
        self.authorize(actor, LEAVE_READ, self.resource_for(actor, &employee, None))?;
        Ok(self
            .ledger
            .balances(actor.tenant_id, employee_id, year)
            .iter()
            .map(BalanceSummary::from)
            .collect())
    }

    /// Active leave types the actor's tenant can apply for. The actor reads
    /// on their own behalf, so an own-data `LEAVE.READ` grant suffices.
    pub fn leave_types(&self, actor: &Actor) -> LeaveResult<Vec<LeaveType>> {
        let resource = ResourceContext {
            owner_id: Some(actor.id),
            owner_department: actor.department_id,
            ..ResourceContext::default()
        };
        self.authorize(actor, LEAVE_READ, resource)?;
        Ok(self
            .directory
            .leave_types(actor.tenant_id)
            .into_iter()
            .filter(|lt| lt.is_active)
            .collect())
    }

    pub(crate) fn applications(&self) -> &dyn ApplicationStore {
        self.applications.as_ref()
    }

    pub(crate) fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn notifier(&self) -> &dyn NotificationDispatcher {
        self.notifier.as_ref()
    }

    fn employee(&self, actor: &Actor, id: EmployeeId) -> LeaveResult<Employee> {
        self.directory
            .employee(actor.tenant_id, id)
            .ok_or_else(|| LeaveError::not_found("employee", id))
    }

    /// The current date in the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.local(self.clock.now()).date()
    }

    fn local(&self, at: DateTime<Utc>) -> chrono::NaiveDateTime {
        at.with_timezone(&self.settings.utc_offset).naive_local()
    }

    fn requested_days(&self, request: &ApplyLeave) -> LeaveResult<LeaveDays> {
        if request.to_date < request.from_date {
            return Err(LeaveError::validation("to_date cannot be before from_date"));
        }
        if request.is_half_day {
            if request.from_date != request.to_date {
                return Err(LeaveError::validation("a half-day leave must start and end on the same date"));
            }
            if request.half_day_session.is_none() {
                return Err(LeaveError::validation("half_day_session is required for a half-day leave"));
            }
            return Ok(LeaveDays::HALF);
        }
        let days = self.settings.day_counting.count(request.from_date, request.to_date);
        if !days.is_positive() {
            return Err(LeaveError::validation("the requested range contains no chargeable days"));
        }
        Ok(days)
    }

    fn authorize(&self, actor: &Actor, permission: Permission, resource: ResourceContext) -> LeaveResult<()> {
        let role = self.directory.role(actor.tenant_id, actor.role);
        let policies = self.directory.policies(actor.tenant_id);
        let now = self.clock.now();
        let ctx = EvalContext {
            now,
            local_time: self.local(now),
            resource,
        };
        let decision = self.evaluator.check(actor, role.as_ref(), &policies, permission, &ctx);
        if let Decision::Deny(denial) = &decision {
            warn!(actor = %actor.id, %permission, ?denial, "leave action denied");
        }
        decision.into_result()
    }

    fn resource_for(&self, actor: &Actor, owner: &Employee, total_days: Option<LeaveDays>) -> ResourceContext {
        ResourceContext {
            owner_id: Some(owner.id),
            owner_department: owner.department_id,
            actor_manages_owner: self.manages(actor.id, owner),
            total_days,
        }
    }

    fn resource_for_application(&self, actor: &Actor, application: &LeaveApplication) -> ResourceContext {
        match self.directory.employee(application.tenant_id, application.employee_id) {
            Some(owner) => self.resource_for(actor, &owner, Some(application.total_days)),
            None => ResourceContext {
                owner_id: Some(application.employee_id),
                total_days: Some(application.total_days),
                ..ResourceContext::default()
            },
        }
    }

    /// Walks the owner's reporting-manager links looking for `actor`.
    fn manages(&self, actor: EmployeeId, owner: &Employee) -> bool {
        let mut seen = HashSet::new();
        let mut next = owner.reporting_manager;
        while let Some(manager) = next {
            if manager == actor {
                return true;
            }
            if !seen.insert(manager) || seen.len() > MAX_HIERARCHY_DEPTH {
                return false;
            }
            next = self
                .directory
                .employee(owner.tenant_id, manager)
                .and_then(|m| m.reporting_manager);
        }
        false
    }

    fn record(&self, actor: &Actor, action: &str, application: &LeaveApplication, details: serde_json::Value) {
        let entry = AuditEntry {
            tenant_id: application.tenant_id,
            actor_id: actor.id,
            action: action.to_string(),
            resource_type: RESOURCE_TYPE,
            resource_id: application.id.to_string(),
            details,
            timestamp: self.clock.now(),
        };
        if let Err(err) = self.audit.record(entry) {
            warn!(error = %err, application = %application.id, "audit record failed");
        }
    }

    pub(crate) fn notify(
        &self,
        kind: EventKind,
        application: &LeaveApplication,
        recipients: Vec<EmployeeId>,
    ) {
        let leave_type = self
            .directory
            .leave_type(application.tenant_id, application.leave_type_id)
            .map(|lt| lt.name)
            .unwrap_or_default();
        let event = LeaveEvent {
            kind,
            tenant_id: application.tenant_id,
            application_id: application.id,
            recipients,
            template_data: json!({
                "employee_id": application.employee_id,
                "leave_type": leave_type,
                "from_date": application.from_date,
                "to_date": application.to_date,
                "total_days": application.total_days,
                "status": application.status,
            }),
        };
        if let Err(err) = self.notifier.send(&event) {
            warn!(%kind, application = %application.id, error = %err, "notification failed");
        }
    }
}

fn expected_version(snapshot: &LeaveApplication, seen: Option<u64>) -> LeaveResult<u64> {
    match seen {
        Some(version) if version != snapshot.version => Err(LeaveError::Conflict {
            expected: version,
            actual: snapshot.version,
        }),
        Some(version) => Ok(version),
        None => Ok(snapshot.version),
    }
}

fn no_slot() -> LeaveError {
    LeaveError::NotAuthorized {
        permission: LEAVE_APPROVE,
        reason: "no pending approval slot for this approver".to_string(),
    }
}

fn pending_approvers(application: &LeaveApplication) -> Vec<EmployeeId> {
    let mut ids: Vec<EmployeeId> = application
        .workflow
        .approvers
        .iter()
        .filter(|a| a.is_pending())
        .flat_map(|a| a.eligible.iter().copied())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

fn validate_request(
    request: &ApplyLeave,
    leave_type: &LeaveType,
    employee: &Employee,
    total_days: LeaveDays,
    today: NaiveDate,
) -> LeaveResult<()> {
    if request.reason.trim().is_empty() {
        return Err(LeaveError::validation("reason is required"));
    }
    if request.from_date < today {
        return Err(LeaveError::validation("Cannot apply leave for past dates"));
    }
    if !leave_type.is_active {
        return Err(LeaveError::validation(format!("{} is not active", leave_type.name)));
    }
    if !leave_type.applicable_gender.admits(employee.gender) {
        return Err(LeaveError::validation(format!(
            "{} is not applicable to this employee",
            leave_type.name
        )));
    }
    let notice = (request.from_date - today).num_days();
    if notice < i64::from(leave_type.min_days_notice) {
        return Err(LeaveError::validation(format!(
            "Minimum {} days notice required for {}",
            leave_type.min_days_notice, leave_type.name
        )));
    }
    if let Some(max) = leave_type.max_consecutive_days {
        if total_days.ceil_days() > i64::from(max) {
            return Err(LeaveError::validation(format!(
                "Maximum {} consecutive days allowed for {}",
                max, leave_type.name
            )));
        }
    }
    Ok(())
}

use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthUser;
use crate::leave::{ApplyLeave, CancelLeave, Decide, ListQuery};
use crate::model::{
    ApplicationId, ApproverRole, BalanceSummary, EmployeeId, HalfDaySession, LeaveApplication,
    LeaveStatus, LeaveType, LeaveTypeId,
};
use crate::services::IdentityProvider;
use crate::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    /// Defaults to the caller's own employee record
    #[schema(value_type = Option<String>, format = "uuid")]
    pub employee_id: Option<EmployeeId>,
    #[schema(value_type = String, format = "uuid")]
    pub leave_type_id: LeaveTypeId,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "Family event")]
    pub reason: String,
    #[serde(default)]
    pub is_half_day: bool,
    pub half_day_session: Option<HalfDaySession>,
    pub contact_number: Option<String>,
    pub address_during_leave: Option<String>,
}

#[derive(Deserialize, Default, ToSchema)]
pub struct DecisionPayload {
    #[schema(example = "Enjoy your time off")]
    pub comments: Option<String>,
    /// Version the caller last saw; a stale value yields 409
    #[schema(example = 0)]
    pub expected_version: Option<u64>,
}

#[derive(Deserialize, Default, ToSchema)]
pub struct CancelPayload {
    #[schema(example = "Plans changed")]
    pub reason: Option<String>,
    #[schema(example = 2)]
    pub expected_version: Option<u64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub employee_id: Option<EmployeeId>,
    /// Filter by leave status
    pub status: Option<LeaveStatus>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number (max 100)
    pub per_page: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct BalanceQuery {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// Defaults to the caller
    #[param(value_type = Option<String>)]
    pub employee_id: Option<EmployeeId>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ApplicationId,
    #[schema(value_type = String, format = "uuid")]
    pub employee_id: EmployeeId,
    #[schema(value_type = String, format = "uuid")]
    pub leave_type_id: LeaveTypeId,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "3", value_type = String)]
    pub total_days: String,
    pub is_half_day: bool,
    pub status: LeaveStatus,
    #[schema(example = 1)]
    pub current_level: u32,
    #[schema(example = 2)]
    pub total_levels: u32,
    pub version: u64,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub applied_at: DateTime<Utc>,
}

impl From<&LeaveApplication> for LeaveResponse {
    fn from(app: &LeaveApplication) -> Self {
        Self {
            id: app.id,
            employee_id: app.employee_id,
            leave_type_id: app.leave_type_id,
            from_date: app.from_date,
            to_date: app.to_date,
            total_days: app.total_days.to_string(),
            is_half_day: app.is_half_day,
            status: app.status,
            current_level: app.workflow.current_level,
            total_levels: app.workflow.total_levels,
            version: app.version,
            applied_at: app.applied_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Serialize, ToSchema)]
pub struct ApplyResponse {
    #[schema(value_type = String, format = "uuid")]
    pub application_id: ApplicationId,
    pub status: LeaveStatus,
    #[schema(example = "3", value_type = String)]
    pub total_days: String,
    #[schema(example = 2)]
    pub approvers_count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct ApproveResponse {
    pub new_status: LeaveStatus,
    pub workflow_complete: bool,
    pub next_approver_role: Option<ApproverRole>,
    pub version: u64,
}

#[derive(Serialize, ToSchema)]
pub struct TransitionResponse {
    pub new_status: LeaveStatus,
    pub version: u64,
}

/* =========================
Apply for leave
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave application payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave application submitted", body = ApplyResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not permitted or policy violated"),
        (status = 404, description = "Employee or leave type not found"),
        (status = 422, description = "Insufficient leave balance")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let payload = payload.into_inner();

    let outcome = state.leave.apply(
        &actor,
        ApplyLeave {
            employee_id: payload.employee_id.unwrap_or(actor.id),
            leave_type_id: payload.leave_type_id,
            from_date: payload.from_date,
            to_date: payload.to_date,
            reason: payload.reason,
            is_half_day: payload.is_half_day,
            half_day_session: payload.half_day_session,
            contact_number: payload.contact_number,
            address_during_leave: payload.address_during_leave,
        },
    )?;

    Ok(HttpResponse::Created().json(ApplyResponse {
        application_id: outcome.application_id,
        status: outcome.status,
        total_days: outcome.total_days.to_string(),
        approvers_count: outcome.approvers_count,
    }))
}

/* =========================
Approve leave
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = String, Path, description = "ID of the leave application to approve")
    ),
    request_body(content = DecisionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Approval recorded", body = ApproveResponse),
        (status = 403, description = "Not an eligible approver"),
        (status = 404, description = "Leave application not found"),
        (status = 409, description = "Stale version or application no longer pending")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<ApplicationId>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let outcome = state.leave.approve(
        &actor,
        Decide {
            application_id: path.into_inner(),
            comments: payload.comments,
            expected_version: payload.expected_version,
        },
    )?;

    Ok(HttpResponse::Ok().json(ApproveResponse {
        new_status: outcome.new_status,
        workflow_complete: outcome.workflow_complete,
        next_approver_role: outcome.next_approver_role,
        version: outcome.version,
    }))
}

/* =========================
Reject leave
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = String, Path, description = "ID of the leave application to reject")
    ),
    request_body(content = DecisionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave rejected", body = TransitionResponse),
        (status = 403, description = "Not an eligible approver"),
        (status = 404, description = "Leave application not found"),
        (status = 409, description = "Stale version or application no longer pending")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<ApplicationId>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let outcome = state.leave.reject(
        &actor,
        Decide {
            application_id: path.into_inner(),
            comments: payload.comments,
            expected_version: payload.expected_version,
        },
    )?;

    Ok(HttpResponse::Ok().json(TransitionResponse {
        new_status: outcome.new_status,
        version: outcome.version,
    }))
}

/* =========================
Cancel leave
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/cancel",
    params(
        ("leave_id" = String, Path, description = "ID of the leave application to cancel")
    ),
    request_body(content = CancelPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave cancelled", body = TransitionResponse),
        (status = 403, description = "Only the applicant or an administrator may cancel"),
        (status = 404, description = "Leave application not found"),
        (status = 409, description = "Already rejected or cancelled")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<ApplicationId>,
    payload: Option<web::Json<CancelPayload>>,
) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let outcome = state.leave.cancel(
        &actor,
        CancelLeave {
            application_id: path.into_inner(),
            reason: payload.reason,
            expected_version: payload.expected_version,
        },
    )?;

    Ok(HttpResponse::Ok().json(TransitionResponse {
        new_status: outcome.new_status,
        version: outcome.version,
    }))
}

/// Full application including its approval workflow and status history
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave application to fetch")
    ),
    responses(
        (status = 200, description = "Leave application found", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<ApplicationId>,
) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let application = state.leave.get_application(&actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(application))
}

#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list, newest first", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let filter = query.into_inner();

    let page = state.leave.list_applications(
        &actor,
        ListQuery {
            employee_id: filter.employee_id,
            status: filter.status,
            page: filter.page,
            per_page: filter.per_page,
        },
    )?;
    info!(total = page.total, page = page.page, "leave list served");

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: page.data.iter().map(LeaveResponse::from).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/leave/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balances per leave type", body = [BalanceSummary]),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let year = query.year.unwrap_or_else(|| state.leave.today().year());
    let employee = query.employee_id.unwrap_or(actor.id);

    let balances = state.leave.get_balances(&actor, employee, year)?;
    Ok(HttpResponse::Ok().json(balances))
}

#[utoipa::path(
    get,
    path = "/api/leave/types",
    responses(
        (status = 200, description = "Active leave types for the caller's tenant", body = [LeaveType]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_types(auth: AuthUser, state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let actor = state.leave.hydrate_actor(auth.current_actor());
    let types = state.leave.leave_types(&actor)?;
    Ok(HttpResponse::Ok().json(types))
}

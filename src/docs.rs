use crate::api::leave_request::{
    ApplyResponse, ApproveResponse, CancelPayload, CreateLeave, DecisionPayload, LeaveFilter,
    LeaveListResponse, LeaveResponse, TransitionResponse,
};
use crate::model::{
    ApplicableGender, ApproverRole, ApproverStatus, BalanceSummary, HalfDaySession, LeaveStatus,
    LeaveType,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Leave API",
        version = "1.0.0",
        description = r#"
## Leave Management

Multi-tenant leave requests with a manager → HR approval chain.

### Key Features
- Apply for full or half-day leave against a yearly balance
- Multi-level approval, rejection and cancellation
- Balance and leave type lookups

### Security
Every endpoint needs a **JWT Bearer** access token. What the caller may do is
decided by the role permissions and tenant policies behind the token.

### Errors
Failures return `{"error": KIND, "message": text}`; a `409` means the
application changed underneath you and should be fetched again.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::leave_balance,
        crate::api::leave_request::leave_types,
    ),
    components(
        schemas(
            CreateLeave,
            DecisionPayload,
            CancelPayload,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            ApplyResponse,
            ApproveResponse,
            TransitionResponse,
            BalanceSummary,
            LeaveType,
            LeaveStatus,
            ApproverRole,
            ApproverStatus,
            ApplicableGender,
            HalfDaySession
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

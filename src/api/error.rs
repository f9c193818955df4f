use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::error::LeaveError;

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::Validation(_) | LeaveError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            LeaveError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LeaveError::NotAuthorized { .. } | LeaveError::PolicyViolation { .. } => StatusCode::FORBIDDEN,
            LeaveError::NotFound { .. } => StatusCode::NOT_FOUND,
            LeaveError::Conflict { .. } | LeaveError::InvalidState { .. } => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LeaveDays, LeaveStatus};

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (LeaveError::validation("bad"), StatusCode::BAD_REQUEST),
            (LeaveError::InvalidAmount(LeaveDays::ZERO), StatusCode::BAD_REQUEST),
            (
                LeaveError::InsufficientBalance {
                    requested: LeaveDays::whole(3),
                    available: LeaveDays::whole(1),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LeaveError::not_found("leave application", "x"), StatusCode::NOT_FOUND),
            (LeaveError::Conflict { expected: 1, actual: 2 }, StatusCode::CONFLICT),
            (
                LeaveError::InvalidState {
                    status: LeaveStatus::Rejected,
                    operation: "cancel",
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }
}

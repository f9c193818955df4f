use thiserror::Error;

use crate::model::{LeaveDays, LeaveStatus, Permission};

pub type LeaveResult<T> = Result<T, LeaveError>;

/// Every way a leave operation can fail. Returned before any state changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeaveError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("insufficient leave balance: available={available}, requested={requested}")]
    InsufficientBalance {
        requested: LeaveDays,
        available: LeaveDays,
    },

    #[error("not authorized: {permission} required ({reason})")]
    NotAuthorized { permission: Permission, reason: String },

    #[error("policy '{policy}' violated: {message}")]
    PolicyViolation { policy: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("version conflict: expected {expected}, found {actual}; refetch and retry")]
    Conflict { expected: u64, actual: u64 },

    #[error("cannot {operation} a leave application in status {status}")]
    InvalidState {
        status: LeaveStatus,
        operation: &'static str,
    },

    #[error("leave amount must be positive, got {0}")]
    InvalidAmount(LeaveDays),
}

impl LeaveError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LeaveError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        LeaveError::Validation(message.into())
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LeaveError::Validation(_) => "VALIDATION_ERROR",
            LeaveError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LeaveError::NotAuthorized { .. } => "NOT_AUTHORIZED",
            LeaveError::PolicyViolation { .. } => "POLICY_VIOLATION",
            LeaveError::NotFound { .. } => "NOT_FOUND",
            LeaveError::Conflict { .. } => "CONFLICT",
            LeaveError::InvalidState { .. } => "INVALID_STATE",
            LeaveError::InvalidAmount(_) => "INVALID_AMOUNT",
        }
    }
}

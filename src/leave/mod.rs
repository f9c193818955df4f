pub mod chain;
pub mod ledger;
pub mod reminders;
pub mod workflow;

pub use chain::ApprovalChainBuilder;
pub use ledger::Ledger;
pub use reminders::Reminder;
pub use workflow::{
    ApplyLeave, ApplyOutcome, ApproveOutcome, CancelLeave, Decide, LeaveService, ListQuery, Page,
    TransitionOutcome, LEAVE_APPROVE, LEAVE_CREATE, LEAVE_READ, LEAVE_UPDATE,
};

//! Collaborators the workflow talks to but does not own.

pub mod audit;
pub mod clock;
pub mod identity;
pub mod notify;

pub use audit::{AuditEntry, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use identity::IdentityProvider;
pub use notify::{
    DispatchError, EventKind, LeaveEvent, LogDispatcher, MemoryDispatcher, NotificationDispatcher,
    RetryingDispatcher,
};

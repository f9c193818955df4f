use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use strum_macros::Display;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{ApplicationId, EmployeeId, TenantId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Applied,
    /// The manager level signed off; goes to the next level's approvers.
    ManagerApproved,
    Approved,
    Rejected,
    Cancelled,
    Reminder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveEvent {
    pub kind: EventKind,
    pub tenant_id: TenantId,
    pub application_id: ApplicationId,
    pub recipients: Vec<EmployeeId>,
    pub template_data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("notification delivery failed: {0}")]
pub struct DispatchError(pub String);

/// Best-effort delivery. A failure here never undoes a workflow transition.
pub trait NotificationDispatcher: Send + Sync {
    fn send(&self, event: &LeaveEvent) -> Result<(), DispatchError>;
}

/// Writes events to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn send(&self, event: &LeaveEvent) -> Result<(), DispatchError> {
        info!(
            kind = %event.kind,
            tenant = %event.tenant_id,
            application = %event.application_id,
            recipients = event.recipients.len(),
            "leave notification"
        );
        Ok(())
    }
}

/// Keeps every event it is handed; can be switched to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryDispatcher {
    sent: Mutex<Vec<LeaveEvent>>,
    failing: Mutex<bool>,
}

impl MemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn sent(&self) -> Vec<LeaveEvent> {
        self.sent.lock().clone()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.sent.lock().iter().filter(|e| e.kind == kind).count()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn send(&self, event: &LeaveEvent) -> Result<(), DispatchError> {
        if *self.failing.lock() {
            return Err(DispatchError("dispatcher unavailable".to_string()));
        }
        self.sent.lock().push(event.clone());
        Ok(())
    }
}

/// Wraps a dispatcher and parks events whose delivery failed so they can be
/// retried later with [`RetryingDispatcher::retry_pending`].
///
/// The queue holds at most `capacity` events; when it is full the oldest one
/// is dropped. An event is dropped after `max_attempts` failed deliveries.
pub struct RetryingDispatcher {
    inner: Arc<dyn NotificationDispatcher>,
    queue: Mutex<VecDeque<Parked>>,
    capacity: usize,
    max_attempts: u32,
}

struct Parked {
    event: LeaveEvent,
    attempts: u32,
}

impl RetryingDispatcher {
    pub const DEFAULT_CAPACITY: usize = 1_000;
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    pub fn new(inner: Arc<dyn NotificationDispatcher>) -> Self {
        Self::with_limits(inner, Self::DEFAULT_CAPACITY, Self::DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_limits(inner: Arc<dyn NotificationDispatcher>, capacity: usize, max_attempts: u32) -> Self {
        Self {
            inner,
            queue: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    /// Attempts every parked event once; returns how many were delivered.
    /// Events that fail again go back on the queue until they run out of
    /// attempts.
    pub fn retry_pending(&self) -> usize {
        let parked: Vec<Parked> = self.queue.lock().drain(..).collect();
        let mut delivered = 0;
        for mut entry in parked {
            match self.inner.send(&entry.event) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    entry.attempts += 1;
                    if entry.attempts >= self.max_attempts {
                        warn!(
                            kind = %entry.event.kind,
                            application = %entry.event.application_id,
                            attempts = entry.attempts,
                            error = %err,
                            "notification dropped after repeated failures"
                        );
                    } else {
                        warn!(kind = %entry.event.kind, application = %entry.event.application_id, error = %err, "retry failed");
                        self.park(entry);
                    }
                }
            }
        }
        delivered
    }

    fn park(&self, entry: Parked) {
        let mut queue = self.queue.lock();
        if queue.len() >= self.capacity {
            if let Some(oldest) = queue.pop_front() {
                warn!(
                    kind = %oldest.event.kind,
                    application = %oldest.event.application_id,
                    capacity = self.capacity,
                    "retry queue full, oldest notification dropped"
                );
            }
        }
        queue.push_back(entry);
    }
}

impl NotificationDispatcher for RetryingDispatcher {
    fn send(&self, event: &LeaveEvent) -> Result<(), DispatchError> {
        if let Err(err) = self.inner.send(event) {
            warn!(kind = %event.kind, application = %event.application_id, error = %err, "notification queued for retry");
            self.park(Parked {
                event: event.clone(),
                attempts: 1,
            });
        }
        Ok(())
    }
}

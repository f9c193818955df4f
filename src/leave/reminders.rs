use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::leave::workflow::LeaveService;
use crate::model::{ApplicationId, ApproverRole, EmployeeId, LeaveStatus, TenantId};
use crate::services::EventKind;
use crate::store::ApplicationFilter;

/// A pending approval slot on an application older than the reminder window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reminder {
    pub tenant_id: TenantId,
    pub application_id: ApplicationId,
    pub level: u32,
    pub role: ApproverRole,
    pub recipients: Vec<EmployeeId>,
    pub days_pending: i64,
}

impl LeaveService {
    /// Scans every tenant. Reads only; a slot resolved concurrently may still
    /// show up here.
    pub fn pending_reminders(&self, now: DateTime<Utc>) -> Vec<Reminder> {
        let threshold = self.settings().reminder_after;
        let open = self.applications().list(&ApplicationFilter {
            tenant_id: None,
            employee_id: None,
            statuses: vec![LeaveStatus::Pending, LeaveStatus::ManagerApproved],
        });

        let mut reminders = Vec::new();
        for app in open.iter().filter(|app| now - app.applied_at >= threshold) {
            let days_pending = (now - app.applied_at).num_days();
            for slot in app.workflow.approvers.iter().filter(|a| a.is_pending()) {
                reminders.push(Reminder {
                    tenant_id: app.tenant_id,
                    application_id: app.id,
                    level: slot.level,
                    role: slot.role,
                    recipients: slot.eligible.clone(),
                    days_pending,
                });
            }
        }
        reminders
    }

    /// Sends one REMINDER event per overdue slot and returns how many.
    pub fn send_reminders(&self) -> usize {
        let reminders = self.pending_reminders(self.clock().now());
        let mut sent = 0;
        for reminder in reminders {
            let Ok(app) = self.applications().get(reminder.tenant_id, reminder.application_id) else {
                debug!(application = %reminder.application_id, "application vanished before reminder");
                continue;
            };
            self.notify(EventKind::Reminder, &app, reminder.recipients);
            sent += 1;
        }
        info!(sent, "approval reminders dispatched");
        sent
    }
}

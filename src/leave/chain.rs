use crate::error::{LeaveError, LeaveResult};
use crate::model::{Approver, ApproverRole, ApproverStatus, Employee, EmployeeId, RoleCode, Workflow};
use crate::store::Directory;

/// Builds the approver list for one application. The result is stored on
/// the application and never recomputed, so later org-chart changes do not
/// reach applications already in flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalChainBuilder;

impl ApprovalChainBuilder {
    pub fn from_directory(&self, directory: &dyn Directory, applicant: &Employee) -> LeaveResult<Workflow> {
        let manager = applicant
            .reporting_manager
            .and_then(|id| directory.employee(applicant.tenant_id, id));
        let hr_managers = directory.active_with_role(applicant.tenant_id, RoleCode::HrManager);
        self.build(applicant, manager.as_ref(), &hr_managers)
    }

    /// Level 1 is the direct manager when there is an active one; the HR
    /// level always follows. Any active HR manager other than the applicant
    /// may act for the HR level.
    pub fn build(
        &self,
        applicant: &Employee,
        manager: Option<&Employee>,
        hr_managers: &[Employee],
    ) -> LeaveResult<Workflow> {
        let mut approvers = Vec::with_capacity(2);

        if let Some(manager) = manager.filter(|m| {
            m.is_active() && m.id != applicant.id && m.tenant_id == applicant.tenant_id
        }) {
            approvers.push(slot(1, ApproverRole::Manager, vec![manager.id]));
        }

        let hr: Vec<_> = hr_managers
            .iter()
            .filter(|e| {
                e.is_active()
                    && e.role == RoleCode::HrManager
                    && e.id != applicant.id
                    && e.tenant_id == applicant.tenant_id
            })
            .map(|e| e.id)
            .collect();
        if hr.is_empty() {
            return Err(LeaveError::not_found("HR manager for tenant", applicant.tenant_id));
        }
        approvers.push(slot(approvers.len() as u32 + 1, ApproverRole::HrManager, hr));

        Ok(Workflow {
            current_level: 1,
            total_levels: approvers.len() as u32,
            approvers,
        })
    }
}

fn slot(level: u32, role: ApproverRole, eligible: Vec<EmployeeId>) -> Approver {
    Approver {
        level,
        approver_id: eligible[0],
        eligible,
        role,
        status: ApproverStatus::Pending,
        acted_by: None,
        comments: None,
        action_at: None,
        is_required: true,
    }
}

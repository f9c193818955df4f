use chrono::Timelike;
use tracing::debug;

use crate::model::{Action, Actor, Permission, Policy, PolicyRule, RuleKind, TenantId};
use crate::policy::{Decision, Denial, EvalContext};

/// Interprets tenant policies. Rules are data, dispatched over a fixed set
/// of kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyRuleEngine;

impl PolicyRuleEngine {
    /// Policies are visited in the order given; within a policy, rules are
    /// visited in order and the first failing active rule decides.
    pub fn evaluate(
        &self,
        policies: &[Policy],
        tenant: TenantId,
        permission: Permission,
        actor: &Actor,
        ctx: &EvalContext,
    ) -> Decision {
        let applicable = policies.iter().filter(|policy| {
            policy.tenant_id == tenant
                && policy.policy_type.covers(permission.module)
                && policy.in_effect(ctx.now)
                && policy.applies_to.matches(actor)
        });

        for policy in applicable {
            for rule in policy.rules.iter().filter(|r| r.is_active) {
                if let Err(message) = check_rule(rule, permission, ctx) {
                    debug!(policy = %policy.name, %permission, %message, "policy rule failed");
                    return Decision::Deny(Denial::Policy {
                        policy: policy.name.clone(),
                        message,
                    });
                }
            }
        }

        Decision::Allow
    }
}

fn check_rule(rule: &PolicyRule, permission: Permission, ctx: &EvalContext) -> Result<(), String> {
    match &rule.kind {
        RuleKind::MaxLeaveDays { limit } => match ctx.resource.total_days {
            Some(days) if days > *limit => Err(format!("Maximum {limit} days allowed")),
            _ => Ok(()),
        },
        RuleKind::WorkingHours { start, end } => {
            let hour = ctx.local_time.hour();
            if hour < *start || hour > *end {
                Err(format!("Action only allowed during {start:02}:00-{end:02}:00"))
            } else {
                Ok(())
            }
        }
        RuleKind::ApprovalHierarchy => {
            if permission.action == Action::Approve && !ctx.resource.actor_manages_owner {
                Err("Approver is not in the employee's management chain".to_string())
            } else {
                Ok(())
            }
        }
        RuleKind::Unsupported => Ok(()),
    }
}

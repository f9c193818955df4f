use tracing::debug;

use crate::model::{Actor, GrantConditions, Permission, Policy, RoleCode, RoleDefinition};
use crate::policy::{Decision, Denial, EvalContext, PolicyRuleEngine, ResourceContext};

/// Decides whether an actor may perform `module.action` on a resource.
///
/// Resolution order:
/// 1. `SUPER_ADMIN` is always allowed.
/// 2. The actor needs a live grant for the permission, from its role or
///    granted directly.
/// 3. At least one such grant must have all of its conditions satisfied.
/// 4. Tenant policies for the module must not deny.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionEvaluator {
    rules: PolicyRuleEngine,
}

impl PermissionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(
        &self,
        actor: &Actor,
        role: Option<&RoleDefinition>,
        policies: &[Policy],
        permission: Permission,
        ctx: &EvalContext,
    ) -> Decision {
        if actor.role == RoleCode::SuperAdmin {
            return Decision::Allow;
        }

        let mut conditions: Vec<GrantConditions> = role
            .filter(|r| r.code == actor.role)
            .map(|r| r.grants_for(permission).map(|g| g.conditions).collect())
            .unwrap_or_default();
        conditions.extend(
            actor
                .grants
                .iter()
                .filter(|g| g.permission == permission && g.is_live(ctx.now))
                .map(|g| g.conditions),
        );

        if conditions.is_empty() {
            debug!(actor = %actor.id, %permission, "no grant");
            return Decision::Deny(Denial::NoGrant { permission });
        }

        let mut first_failure = None;
        let satisfied = conditions.iter().any(|c| match violated_condition(c, actor, &ctx.resource) {
            None => true,
            Some(condition) => {
                first_failure.get_or_insert(condition);
                false
            }
        });
        if !satisfied {
            let condition = first_failure.unwrap_or("unknown");
            debug!(actor = %actor.id, %permission, condition, "grant condition failed");
            return Decision::Deny(Denial::ConditionFailed { permission, condition });
        }

        self.rules
            .evaluate(policies, actor.tenant_id, permission, actor, ctx)
    }
}

fn violated_condition(
    conditions: &GrantConditions,
    actor: &Actor,
    resource: &ResourceContext,
) -> Option<&'static str> {
    if conditions.own_data_only && resource.owner_id != Some(actor.id) {
        return Some("own_data_only");
    }
    if conditions.department_only {
        let same = matches!(
            (actor.department_id, resource.owner_department),
            (Some(mine), Some(theirs)) if mine == theirs
        );
        if !same {
            return Some("department_only");
        }
    }
    if conditions.reporting_hierarchy && !resource.actor_manages_owner {
        return Some("reporting_hierarchy");
    }
    None
}

use crate::{AssumeRolePolicy, Context, Decision, Error, Workload};
use std::{fmt, sync::Arc};
use tracing::{debug, instrument, trace};

/// Requires that every configured policy allows a request.
///
/// Policies are evaluated in the order they were added. Evaluation stops at the first policy
/// that denies the request or fails with an error, and later policies are not invoked.
///
/// An empty set of policies allows every request: the composite is a conjunction, and a
/// conjunction of no terms holds. Callers that build policies from configuration should make
/// sure at least one policy is configured.
#[derive(Clone, Default)]
pub struct Policies {
    policies: Vec<Arc<dyn AssumeRolePolicy>>,
}

// === impl Policies ===

impl Policies {
    pub fn new(policies: impl IntoIterator<Item = Arc<dyn AssumeRolePolicy>>) -> Self {
        Self {
            policies: policies.into_iter().collect(),
        }
    }

    pub fn push(&mut self, policy: impl AssumeRolePolicy + 'static) {
        self.policies.push(Arc::new(policy));
    }

    pub fn with(mut self, policy: impl AssumeRolePolicy + 'static) -> Self {
        self.push(policy);
        self
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl fmt::Debug for Policies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.policies.iter().map(|p| p.name()))
            .finish()
    }
}

#[async_trait::async_trait]
impl AssumeRolePolicy for Policies {
    fn name(&self) -> &'static str {
        "all"
    }

    #[instrument(level = "debug", skip_all, fields(policy = self.name(), %role))]
    async fn is_allowed(
        &self,
        cx: &Context,
        role: &str,
        workload: &dyn Workload,
    ) -> Result<Decision, Error> {
        for policy in self.policies.iter() {
            cx.check()?;

            let decision = policy.is_allowed(cx, role, workload).await?;
            if let Decision::Denied(reason) = &decision {
                debug!(policy = policy.name(), %role, %reason, "Denied");
                return Ok(decision);
            }
            trace!(policy = policy.name(), %role, "Allowed");
        }

        Ok(Decision::Allowed)
    }
}

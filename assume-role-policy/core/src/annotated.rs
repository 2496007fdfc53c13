use crate::{
    AssumeRolePolicy, Context, Decision, Error, Forbidden, ResolveIdentity, Workload,
};
use std::sync::Arc;
use tracing::{instrument, trace};

/// Permits a workload to request only the role it is annotated with.
///
/// Both the annotated and the requested role are resolved to canonical identities before they
/// are compared, so a short name and its fully-qualified ARN are interchangeable.
#[derive(Clone)]
pub struct AnnotatedRolePolicy {
    resolver: Arc<dyn ResolveIdentity>,
}

// === impl AnnotatedRolePolicy ===

impl AnnotatedRolePolicy {
    pub fn new(resolver: Arc<dyn ResolveIdentity>) -> Self {
        Self { resolver }
    }
}

impl std::fmt::Debug for AnnotatedRolePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotatedRolePolicy").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl AssumeRolePolicy for AnnotatedRolePolicy {
    fn name(&self) -> &'static str {
        "annotated-role"
    }

    #[instrument(level = "debug", skip_all, fields(policy = self.name(), %role))]
    async fn is_allowed(
        &self,
        cx: &Context,
        role: &str,
        workload: &dyn Workload,
    ) -> Result<Decision, Error> {
        cx.check()?;

        // An unannotated workload fails to resolve rather than being denied.
        let annotated = self
            .resolver
            .resolve(workload.role_annotation().unwrap_or_default())?;
        let requested = self.resolver.resolve(role)?;
        trace!(annotated = %annotated, requested = %requested);

        if annotated == requested {
            return Ok(Decision::Allowed);
        }

        Ok(Forbidden::NotAnnotated {
            requested: role.to_string(),
            annotated: annotated.name().to_string(),
        }
        .into())
    }
}

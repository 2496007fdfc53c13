use crate::EvaluationMetrics;
use anyhow::Result;
use assume_role_policy_core::{
    AnnotatedRolePolicy, ArnResolver, Context, NamespaceFinder, NamespacePermittedPolicy,
    Policies, ResolveIdentity,
};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

/// Configures the standard set of assume-role policies.
#[derive(Clone, Debug, clap::Args)]
pub struct PolicyArgs {
    /// Base ARN used to qualify short role names, e.g. `arn:aws:iam::111111111111:role/`.
    #[clap(long, env = "ASSUME_ROLE_POLICY_BASE_ARN")]
    pub role_base_arn: String,

    /// Requires namespace permission expressions to match entire role ARNs.
    ///
    /// When unset, an expression permits any role ARN that merely contains a match.
    #[clap(long, env = "ASSUME_ROLE_POLICY_REGEXP_STRICT")]
    pub namespace_regexp_strict: bool,

    /// Limits how long a single evaluation may take.
    #[clap(long, default_value = "5000")]
    pub evaluation_timeout_ms: u64,
}

// === impl PolicyArgs ===

impl PolicyArgs {
    /// Builds the annotated-role policy followed by the namespace-permitted policy.
    pub fn build(
        &self,
        namespaces: Arc<dyn NamespaceFinder>,
        metrics: &EvaluationMetrics,
    ) -> Result<Policies> {
        let resolver: Arc<dyn ResolveIdentity> =
            Arc::new(ArnResolver::new(self.role_base_arn.clone())?);

        let annotated = AnnotatedRolePolicy::new(resolver.clone());
        let permitted =
            NamespacePermittedPolicy::new(self.namespace_regexp_strict, namespaces, resolver);

        Ok(Policies::default()
            .with(metrics.instrument(annotated))
            .with(metrics.instrument(permitted)))
    }

    pub fn evaluation_timeout(&self) -> Duration {
        Duration::from_millis(self.evaluation_timeout_ms)
    }

    /// Creates a context for a single evaluation, bounded by the configured timeout.
    pub fn context(&self, token: CancellationToken) -> Context {
        Context::new(token).with_timeout(self.evaluation_timeout())
    }
}

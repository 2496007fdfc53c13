use assume_role_policy_core::{AssumeRolePolicy, Context, Decision, Error, Workload};
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

/// Counts policy decisions.
#[derive(Clone, Debug, Default)]
pub struct EvaluationMetrics {
    decisions: Family<DecisionLabels, Counter>,
}

/// Records the outcome of every evaluation of the wrapped policy.
#[derive(Clone, Debug)]
pub struct Instrumented<P> {
    inner: P,
    decisions: Family<DecisionLabels, Counter>,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct DecisionLabels {
    policy: &'static str,
    result: &'static str,
}

// === impl EvaluationMetrics ===

impl EvaluationMetrics {
    pub fn register(reg: &mut Registry) -> Self {
        let decisions = Family::<DecisionLabels, Counter>::default();
        reg.register(
            "decisions",
            "Total number of assume-role policy evaluations by policy and result",
            decisions.clone(),
        );
        Self { decisions }
    }

    pub fn instrument<P: AssumeRolePolicy>(&self, inner: P) -> Instrumented<P> {
        Instrumented {
            inner,
            decisions: self.decisions.clone(),
        }
    }
}

// === impl Instrumented ===

impl<P> Instrumented<P> {
    pub fn into_inner(self) -> P {
        self.inner
    }
}

#[async_trait::async_trait]
impl<P: AssumeRolePolicy> AssumeRolePolicy for Instrumented<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn is_allowed(
        &self,
        cx: &Context,
        role: &str,
        workload: &dyn Workload,
    ) -> Result<Decision, Error> {
        let res = self.inner.is_allowed(cx, role, workload).await;
        let result = match &res {
            Ok(Decision::Allowed) => "allowed",
            Ok(Decision::Denied(_)) => "denied",
            Err(e) if e.is_cancelled() => "cancelled",
            Err(_) => "error",
        };
        self.decisions
            .get_or_create(&DecisionLabels {
                policy: self.inner.name(),
                result,
            })
            .inc();
        res
    }
}

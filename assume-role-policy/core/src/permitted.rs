use crate::{
    AssumeRolePolicy, Context, Decision, Error, Forbidden, NamespaceFinder, ResolveIdentity,
    Workload, PERMITTED_ANNOTATION,
};
use regex::Regex;
use std::{borrow::Cow, sync::Arc};
use tracing::{instrument, trace};

/// Permits a role only when its ARN matches the expression in the workload namespace's
/// `iam.amazonaws.com/permitted` annotation.
///
/// A namespace without the annotation permits nothing.
///
/// In strict mode the expression must match the entire ARN. Otherwise it only has to match some
/// substring of the ARN, so an expression like `app` also permits `app-admin`. Non-strict matching
/// is retained for compatibility with existing namespace annotations.
#[derive(Clone)]
pub struct NamespacePermittedPolicy {
    namespaces: Arc<dyn NamespaceFinder>,
    resolver: Arc<dyn ResolveIdentity>,
    strict: bool,
}

/// Stands in for a missing expression in denial explanations.
const EMPTY_EXPRESSION: &str = "(empty)";

// === impl NamespacePermittedPolicy ===

impl NamespacePermittedPolicy {
    pub fn new(
        strict: bool,
        namespaces: Arc<dyn NamespaceFinder>,
        resolver: Arc<dyn ResolveIdentity>,
    ) -> Self {
        Self {
            namespaces,
            resolver,
            strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl std::fmt::Debug for NamespacePermittedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespacePermittedPolicy")
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl AssumeRolePolicy for NamespacePermittedPolicy {
    fn name(&self) -> &'static str {
        "namespace-permitted"
    }

    #[instrument(level = "debug", skip_all, fields(policy = self.name(), %role))]
    async fn is_allowed(
        &self,
        cx: &Context,
        role: &str,
        workload: &dyn Workload,
    ) -> Result<Decision, Error> {
        let requested = self.resolver.resolve(role)?;

        let ns_name = workload.namespace().ok_or(Error::NoNamespace)?;
        let ns = cx
            .run(self.namespaces.find_namespace(cx, ns_name))
            .await??;

        let expression = match ns.annotation(PERMITTED_ANNOTATION) {
            Some(expression) if !expression.is_empty() => expression,
            _ => {
                return Ok(Forbidden::NamespaceExpression {
                    expression: EMPTY_EXPRESSION.to_string(),
                    role: role.to_string(),
                }
                .into())
            }
        };

        let re = compile(expression, self.strict)?;
        trace!(ns = %ns_name, %re, arn = %requested.arn());
        if !re.is_match(requested.arn()) {
            return Ok(Forbidden::NamespaceExpression {
                expression: expression.to_string(),
                role: requested.arn().to_string(),
            }
            .into());
        }

        Ok(Decision::Allowed)
    }
}

fn compile(expression: &str, strict: bool) -> Result<Regex, Error> {
    let pattern = if strict {
        // Grouped so that alternations are anchored as a whole.
        Cow::Owned(format!("^(?:{expression})$"))
    } else {
        Cow::Borrowed(expression)
    };

    Regex::new(&pattern).map_err(|source| Error::InvalidExpression {
        expression: expression.to_string(),
        source,
    })
}

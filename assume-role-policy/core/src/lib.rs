//! Assume-role policy evaluation.
//!
//! Decides whether a workload may assume an IAM role. Every check implements
//! [`AssumeRolePolicy`] and returns either a [`Decision`] or an [`Error`]:
//!
//! - A `Decision` is the result of a completed evaluation. `Decision::Denied` carries an
//!   explanation suitable for operators.
//! - An `Error` means the policy could not be evaluated at all (an unresolvable role, a failed
//!   namespace lookup, a malformed namespace expression or a cancelled request). Errors are never
//!   reported as denials.
//!
//! Checks are combined with [`Policies`], which requires every configured policy to allow a
//! request and stops at the first denial or error.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod annotated;
mod composite;
mod context;
mod decision;
mod error;
pub mod identity;
mod permitted;
mod workload;


pub use self::{
    annotated::AnnotatedRolePolicy,
    composite::Policies,
    context::Context,
    decision::{Decision, Forbidden},
    error::Error,
    identity::{ArnResolver, Identity, ResolveError, ResolveIdentity},
    permitted::NamespacePermittedPolicy,
    workload::{Namespace, NamespaceFinder, Workload},
};

/// Pod annotation naming the role the pod may assume.
pub const ROLE_ANNOTATION: &str = "iam.amazonaws.com/role";

/// Namespace annotation holding the expression that permitted role ARNs must match.
pub const PERMITTED_ANNOTATION: &str = "iam.amazonaws.com/permitted";

/// Evaluates whether a workload may assume a role.
///
/// Implementations hold only read-only configuration, so a single policy may be evaluated
/// concurrently for any number of requests.
#[async_trait::async_trait]
pub trait AssumeRolePolicy: Send + Sync {
    /// A short, static name used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn is_allowed(
        &self,
        cx: &Context,
        role: &str,
        workload: &dyn Workload,
    ) -> Result<Decision, Error>;
}

#[async_trait::async_trait]
impl<P: AssumeRolePolicy + ?Sized> AssumeRolePolicy for std::sync::Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn is_allowed(
        &self,
        cx: &Context,
        role: &str,
        workload: &dyn Workload,
    ) -> Result<Decision, Error> {
        (**self).is_allowed(cx, role, workload).await
    }
}

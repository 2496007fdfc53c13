use crate::identity::ResolveError;

/// Indicates that a policy could not be evaluated.
///
/// This is distinct from [`crate::Decision::Denied`]: an error means no decision was reached.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("workload does not have a namespace")]
    NoNamespace,

    #[error("failed to find namespace {namespace}")]
    Lookup {
        namespace: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid namespace policy expression '{expression}'")]
    InvalidExpression {
        expression: String,
        #[source]
        source: regex::Error,
    },

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("evaluation deadline exceeded")]
    DeadlineExceeded,
}

// === impl Error ===

impl Error {
    pub fn lookup(namespace: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Lookup {
            namespace: namespace.into(),
            source: source.into(),
        }
    }

    /// Indicates whether the error was caused by the evaluation's context ending.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

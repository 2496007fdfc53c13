use std::fmt;

/// The outcome of a completed policy evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Forbidden),
}

/// Explains why a request was denied.
///
/// Each variant names the rule that failed and the values it compared, so its `Display` output is
/// never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Forbidden {
    /// The requested role differs from the role the workload is annotated with.
    NotAnnotated { requested: String, annotated: String },

    /// The namespace's permission expression does not match the requested role.
    NamespaceExpression { expression: String, role: String },
}

// === impl Decision ===

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn reason(&self) -> Option<&Forbidden> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(reason),
        }
    }

    /// Returns an empty string for an allowed request; otherwise describes the denial.
    pub fn explanation(&self) -> String {
        self.reason().map(ToString::to_string).unwrap_or_default()
    }
}

impl From<Forbidden> for Decision {
    fn from(reason: Forbidden) -> Self {
        Self::Denied(reason)
    }
}

// === impl Forbidden ===

impl fmt::Display for Forbidden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnnotated {
                requested,
                annotated,
            } => write!(
                f,
                "requested '{requested}' but annotated with '{annotated}', forbidden"
            ),
            Self::NamespaceExpression { expression, role } => write!(
                f,
                "namespace policy expression '{expression}' forbids role '{role}'"
            ),
        }
    }
}

use crate::{Context, Error};
use std::collections::BTreeMap;

/// Exposes the attributes of a requesting workload that policies read.
pub trait Workload: Send + Sync {
    fn namespace(&self) -> Option<&str>;

    /// The role the workload is annotated with, if any.
    fn role_annotation(&self) -> Option<&str>;
}

/// A namespace's name and annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Namespace {
    name: String,
    annotations: BTreeMap<String, String>,
}

/// Finds the namespace that owns a workload.
///
/// Implementations must honor the evaluation's [`Context`]; a missing namespace is an error.
#[async_trait::async_trait]
pub trait NamespaceFinder: Send + Sync {
    async fn find_namespace(&self, cx: &Context, name: &str) -> Result<Namespace, Error>;
}

// === impl Namespace ===

impl Namespace {
    pub fn new(name: impl Into<String>, annotations: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            annotations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

//! Kubernetes adapters for assume-role policies.
//!
//! - [`PodWorkload`] reads a `Pod`'s namespace and `iam.amazonaws.com/role` annotation.
//! - [`ApiNamespaces`] looks up namespaces through the Kubernetes API on every evaluation.
//! - [`NamespaceCache`] serves namespaces from memory, kept current by a namespace watch.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod cache;
mod namespace;
mod pod;

pub use self::{
    cache::NamespaceCache,
    namespace::{to_namespace, ApiNamespaces},
    pod::PodWorkload,
};
pub use k8s_openapi::api::core::v1::{Namespace, Pod};
pub use kube::{api::ObjectMeta, Client, ResourceExt};

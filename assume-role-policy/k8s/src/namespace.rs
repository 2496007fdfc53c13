use assume_role_policy_core::{self as policy, Context, Error, NamespaceFinder};
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::Api, Client, ResourceExt};
use tracing::debug;

/// Looks up namespaces through the Kubernetes API.
#[derive(Clone)]
pub struct ApiNamespaces {
    api: Api<Namespace>,
}

/// Copies the parts of a `Namespace` that policies read.
pub fn to_namespace(ns: &Namespace) -> policy::Namespace {
    policy::Namespace::new(ns.name_any(), ns.annotations().clone())
}

// === impl ApiNamespaces ===

impl ApiNamespaces {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

impl std::fmt::Debug for ApiNamespaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiNamespaces").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl NamespaceFinder for ApiNamespaces {
    async fn find_namespace(&self, cx: &Context, name: &str) -> Result<policy::Namespace, Error> {
        debug!(ns = %name, "Fetching namespace");
        let ns = cx
            .run(self.api.get(name))
            .await?
            .map_err(|error| Error::lookup(name, error))?;
        Ok(to_namespace(&ns))
    }
}

use assume_role_policy_core::{Workload, ROLE_ANNOTATION};
use k8s_openapi::api::core::v1::Pod;

/// Exposes a `Pod` to policies.
#[derive(Clone, Copy, Debug)]
pub struct PodWorkload<'p>(&'p Pod);

// === impl PodWorkload ===

impl<'p> PodWorkload<'p> {
    pub fn new(pod: &'p Pod) -> Self {
        Self(pod)
    }

    pub fn pod(&self) -> &'p Pod {
        self.0
    }
}

impl<'p> From<&'p Pod> for PodWorkload<'p> {
    fn from(pod: &'p Pod) -> Self {
        Self(pod)
    }
}

impl Workload for PodWorkload<'_> {
    fn namespace(&self) -> Option<&str> {
        self.0
            .metadata
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
    }

    fn role_annotation(&self) -> Option<&str> {
        self.0
            .metadata
            .annotations
            .as_ref()?
            .get(ROLE_ANNOTATION)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ObjectMeta;
    use maplit::btreemap;

    fn mk_pod(ns: Option<&str>, role: Option<&str>) -> Pod {
        Pod {
            metadata: ObjectMeta {
                namespace: ns.map(Into::into),
                name: Some("pod-0".to_string()),
                annotations: role.map(|role| {
                    btreemap! {
                        ROLE_ANNOTATION.to_string() => role.to_string(),
                        "unrelated".to_string() => "value".to_string(),
                    }
                }),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn reads_namespace_and_role() {
        let pod = mk_pod(Some("ns-0"), Some("readonly"));
        let workload = PodWorkload::from(&pod);
        assert_eq!(workload.namespace(), Some("ns-0"));
        assert_eq!(workload.role_annotation(), Some("readonly"));
    }

    #[test]
    fn missing_attributes() {
        let pod = mk_pod(None, None);
        let workload = PodWorkload::new(&pod);
        assert_eq!(workload.namespace(), None);
        assert_eq!(workload.role_annotation(), None);

        let pod = mk_pod(Some(""), None);
        assert_eq!(PodWorkload::new(&pod).namespace(), None);
    }
}

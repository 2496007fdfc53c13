use crate::namespace::to_namespace;
use ahash::AHashMap as HashMap;
use anyhow::anyhow;
use assume_role_policy_core::{self as policy, Context, Error, NamespaceFinder};
use futures::prelude::*;
use k8s_openapi::api::core::v1::Namespace;
use kube::{runtime::watcher, ResourceExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::time;
use tracing::{debug, info};

/// Serves namespace lookups from memory.
///
/// The cache is populated by [`NamespaceCache::sync`] from a namespace watch. Clones share the
/// same underlying map.
#[derive(Clone, Debug, Default)]
pub struct NamespaceCache(Arc<RwLock<HashMap<String, policy::Namespace>>>);

// === impl NamespaceCache ===

impl NamespaceCache {
    pub fn apply(&self, ns: &Namespace) {
        let ns = to_namespace(ns);
        debug!(ns = %ns.name(), "Applying namespace");
        self.0.write().insert(ns.name().to_string(), ns);
    }

    pub fn delete(&self, ns: &Namespace) {
        let name = ns.name_any();
        debug!(ns = %name, "Deleting namespace");
        self.0.write().remove(&name);
    }

    /// Replaces the cache's contents with `namespaces`.
    pub fn reset(&self, namespaces: Vec<Namespace>) {
        let index = namespaces
            .iter()
            .map(|ns| {
                let ns = to_namespace(ns);
                (ns.name().to_string(), ns)
            })
            .collect::<HashMap<_, _>>();
        info!(namespaces = index.len(), "Resetting namespaces");
        *self.0.write() = index;
    }

    pub fn get(&self, name: &str) -> Option<policy::Namespace> {
        self.0.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Applies watch events to the cache until the stream ends.
    ///
    /// Namespaces listed during a watch's (re)initialization replace the cache's contents once
    /// the listing completes. Watch errors are logged and followed by a brief pause.
    pub async fn sync<S>(self, events: S)
    where
        S: Stream<Item = watcher::Result<watcher::Event<Namespace>>>,
    {
        let mut events = std::pin::pin!(events);

        let mut init = None;
        while let Some(event) = events.next().await {
            match event {
                Ok(watcher::Event::Apply(ns)) => self.apply(&ns),
                Ok(watcher::Event::Delete(ns)) => self.delete(&ns),
                Ok(watcher::Event::Init) => init = Some(Vec::new()),
                Ok(watcher::Event::InitApply(ns)) => init.get_or_insert_with(Vec::new).push(ns),
                Ok(watcher::Event::InitDone) => self.reset(init.take().unwrap_or_default()),
                Err(error) => {
                    info!(%error, "Namespace watch failed");
                    time::sleep(time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl NamespaceFinder for NamespaceCache {
    async fn find_namespace(&self, cx: &Context, name: &str) -> Result<policy::Namespace, Error> {
        cx.check()?;
        self.get(name)
            .ok_or_else(|| Error::lookup(name, anyhow!("namespace {name} not found")))
    }
}

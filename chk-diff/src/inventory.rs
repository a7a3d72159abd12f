use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::allowlist::AllowedComponents;
use crate::image::ContainerImage;
use crate::kubernetes::{ResourceKind, WorkloadLister};
use crate::{Error, Result};

/// Whether the namespace takes part in resource identity across clusters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentityScope {
    /// Resources match across clusters by name alone, regardless of the
    /// namespace they were found in.
    #[default]
    Name,
    /// Namespace-qualified identity, for runs comparing several namespaces
    /// at once.
    NamespacedName,
}

impl IdentityScope {
    pub fn id(&self, name: &str, namespace: &str) -> ResourceId {
        ResourceId {
            name: name.to_string(),
            namespace: match self {
                Self::Name => None,
                Self::NamespacedName => Some(namespace.to_string()),
            },
        }
    }
}

/// Identifier a resource is matched under across clusters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ResourceId {
    pub name: String,
    pub namespace: Option<String>,
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}/{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One workload object found during collection.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceEntry {
    pub name: String,
    pub namespace: String,
    /// Container name to parsed image. Container names are unique within a
    /// resource, so a map loses nothing.
    pub containers: BTreeMap<String, ContainerImage>,
}

impl ResourceEntry {
    /// Sorted normalized image names, duplicates preserved.
    pub fn image_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .containers
            .values()
            .map(|image| image.normalized.clone())
            .collect();
        names.sort();
        names
    }
}

/// The resource/container/image facts for one (cluster, kind) pair.
///
/// Built fresh by one collection pass and never mutated afterwards.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResourceInventory {
    pub resources: BTreeMap<ResourceId, ResourceEntry>,
}

/// Outcome of one cluster's collection pass.
#[derive(Clone, Debug)]
pub enum ClusterCollection {
    Collected(ResourceInventory),
    /// Collection failed; the reason is carried into the report instead of
    /// aborting the run.
    Unavailable(String),
}

/// Per-cluster collections in caller input order. The first entry is the
/// baseline the diff evaluator compares against.
#[derive(Debug, Default)]
pub struct ClusterSet {
    pub clusters: Vec<(String, ClusterCollection)>,
}

impl ClusterSet {
    /// Union of resource identifiers over all available clusters, so a
    /// resource missing from some cluster still shows up in the report.
    pub fn comparison_set(&self) -> BTreeSet<ResourceId> {
        let mut set = BTreeSet::new();
        for (_, collection) in &self.clusters {
            if let ClusterCollection::Collected(inventory) = collection {
                set.extend(inventory.resources.keys().cloned());
            }
        }
        set
    }
}

/// Builds one cluster's inventory for `kind` across `namespaces`.
///
/// When an allowlist is active, resources outside it are excluded entirely
/// rather than flagged, which shrinks the comparison set for every cluster
/// in the same way.
pub async fn collect<L: WorkloadLister>(
    lister: &L,
    namespaces: &[String],
    kind: ResourceKind,
    allowed: Option<&AllowedComponents>,
    scope: IdentityScope,
) -> Result<ResourceInventory> {
    let mut resources = BTreeMap::new();
    for namespace in namespaces {
        for workload in lister.list_workloads(kind, namespace).await? {
            if let Some(allowed) = allowed
                && !allowed.contains(&workload.name)
            {
                continue;
            }
            let id = scope.id(&workload.name, &workload.namespace);
            let containers = workload
                .containers
                .iter()
                .map(|c| (c.name.clone(), ContainerImage::parse(&c.image)))
                .collect();
            resources.insert(
                id,
                ResourceEntry {
                    name: workload.name,
                    namespace: workload.namespace,
                    containers,
                },
            );
        }
    }
    debug!(%kind, count = resources.len(), "collected inventory");
    Ok(ResourceInventory { resources })
}

/// Collects every cluster concurrently and merges the results in input
/// order once all collections have finished.
///
/// Each collection owns its inventory until handoff here; a failure, a
/// timeout or a cancellation marks that cluster unavailable instead of
/// aborting the run.
pub async fn aggregate<L: WorkloadLister + Sync>(
    clusters: &[(String, L)],
    namespaces: &[String],
    kind: ResourceKind,
    allowed: Option<&AllowedComponents>,
    scope: IdentityScope,
    timeout: Duration,
    cancel: &CancellationToken,
) -> ClusterSet {
    let collections = join_all(clusters.iter().map(|(name, lister)| {
        let cancel = cancel.clone();
        async move {
            info!(cluster = %name, %kind, "collecting workloads");
            let collected = tokio::select! {
                _ = cancel.cancelled() => Err(Error::Cancelled),
                res = tokio::time::timeout(timeout, collect(lister, namespaces, kind, allowed, scope)) => {
                    res.map_err(|_| Error::CollectTimeout(timeout)).and_then(|r| r)
                }
            };
            match collected {
                Ok(inventory) => (name.clone(), ClusterCollection::Collected(inventory)),
                Err(e) => {
                    warn!(cluster = %name, %e, "collection failed, marking cluster unavailable");
                    (name.clone(), ClusterCollection::Unavailable(e.to_string()))
                }
            }
        }
    }))
    .await;

    ClusterSet {
        clusters: collections,
    }
}

use std::fmt::Display;

use serde::Serialize;

use crate::inventory::{ClusterCollection, ClusterSet, ResourceId};
use crate::kubernetes::ResourceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Present in every cluster with an identical sorted image sequence.
    Match,
    /// Absent from at least one available cluster, or the image sequence
    /// differs from the baseline.
    Mismatch,
    /// At least one cluster was unavailable and no definite mismatch was
    /// found among the clusters that answered.
    Unknown,
}

impl Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
            Self::Unknown => "unknown",
        };
        write!(f, "{status}")
    }
}

/// One cluster's image list for a resource.
#[derive(Clone, Debug, Serialize)]
pub struct ClusterImages {
    pub cluster: String,
    /// Sorted normalized image names; empty when the resource is absent
    /// from this cluster, `None` when the cluster was unavailable.
    pub images: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DiffResult {
    pub id: ResourceId,
    pub kind: ResourceKind,
    /// Namespace the resource was first seen in. Informational unless
    /// identity is namespace-qualified.
    pub namespace: String,
    pub per_cluster: Vec<ClusterImages>,
    pub status: DiffStatus,
}

/// Compares every resource in the comparison set against the baseline
/// cluster, the first available one in input order.
///
/// Single pass, no shared state: the outcome for one resource is a value
/// computed from the cluster set alone.
pub fn evaluate(set: &ClusterSet, kind: ResourceKind) -> Vec<DiffResult> {
    set.comparison_set()
        .into_iter()
        .map(|id| evaluate_resource(set, kind, id))
        .collect()
}

fn evaluate_resource(set: &ClusterSet, kind: ResourceKind, id: ResourceId) -> DiffResult {
    let mut baseline: Option<Vec<String>> = None;
    let mut mismatched = false;
    let mut unknown = false;
    let mut namespace = id.namespace.clone();
    let mut per_cluster = Vec::with_capacity(set.clusters.len());

    for (cluster, collection) in &set.clusters {
        match collection {
            ClusterCollection::Unavailable(_) => {
                unknown = true;
                per_cluster.push(ClusterImages {
                    cluster: cluster.clone(),
                    images: None,
                });
            }
            ClusterCollection::Collected(inventory) => {
                let images = match inventory.resources.get(&id) {
                    Some(entry) => {
                        if namespace.is_none() {
                            namespace = Some(entry.namespace.clone());
                        }
                        entry.image_names()
                    }
                    // absence from an available cluster is always a mismatch
                    None => {
                        mismatched = true;
                        Vec::new()
                    }
                };
                // the baseline is the first cluster that answered, so a
                // disagreement between available clusters is caught even
                // when the first cluster is down
                match &baseline {
                    None => baseline = Some(images.clone()),
                    Some(baseline) if *baseline != images => mismatched = true,
                    Some(_) => {}
                }
                per_cluster.push(ClusterImages {
                    cluster: cluster.clone(),
                    images: Some(images),
                });
            }
        }
    }

    // a definite mismatch among the clusters that answered outweighs an
    // unavailable cluster
    let status = if mismatched {
        DiffStatus::Mismatch
    } else if unknown {
        DiffStatus::Unknown
    } else {
        DiffStatus::Match
    };

    DiffResult {
        id,
        kind,
        namespace: namespace.unwrap_or_default(),
        per_cluster,
        status,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{DiffStatus, evaluate};
    use crate::image::ContainerImage;
    use crate::inventory::{
        ClusterCollection, ClusterSet, IdentityScope, ResourceEntry, ResourceId, ResourceInventory,
    };
    use crate::kubernetes::ResourceKind;

    fn entry(name: &str, namespace: &str, containers: &[(&str, &str)]) -> (ResourceId, ResourceEntry) {
        let containers: BTreeMap<String, ContainerImage> = containers
            .iter()
            .map(|(container, image)| (container.to_string(), ContainerImage::parse(image)))
            .collect();
        (
            IdentityScope::Name.id(name, namespace),
            ResourceEntry {
                name: name.to_string(),
                namespace: namespace.to_string(),
                containers,
            },
        )
    }

    fn collected(entries: Vec<(ResourceId, ResourceEntry)>) -> ClusterCollection {
        ClusterCollection::Collected(ResourceInventory {
            resources: entries.into_iter().collect(),
        })
    }

    fn cluster_set(clusters: Vec<(&str, ClusterCollection)>) -> ClusterSet {
        ClusterSet {
            clusters: clusters
                .into_iter()
                .map(|(name, collection)| (name.to_string(), collection))
                .collect(),
        }
    }

    #[test]
    fn identical_images_match() {
        let set = cluster_set(vec![
            (
                "a",
                collected(vec![entry(
                    "api",
                    "kube-system",
                    &[("main", "registry.internal.net/ns/api:1.2")],
                )]),
            ),
            (
                "b",
                collected(vec![entry(
                    "api",
                    "kube-system",
                    &[("main", "registry.internal.net/ns/api:1.2")],
                )]),
            ),
        ]);

        let results = evaluate(&set, ResourceKind::Deployment);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, DiffStatus::Match);
        assert_eq!(results[0].namespace, "kube-system");
        assert_eq!(
            results[0].per_cluster[0].images,
            Some(vec!["ns/api:1.2".to_string()])
        );
    }

    #[test]
    fn resource_missing_from_one_cluster_mismatches() {
        let set = cluster_set(vec![
            (
                "a",
                collected(vec![entry("cache", "default", &[("redis", "redis:7")])]),
            ),
            ("b", collected(vec![])),
        ]);

        let results = evaluate(&set, ResourceKind::Deployment);
        // the union keeps the resource visible even though cluster b lacks it
        assert_eq!(results[0].id.to_string(), "cache");
        assert_eq!(results[0].status, DiffStatus::Mismatch);
        assert_eq!(results[0].per_cluster[1].images, Some(Vec::new()));
    }

    #[test]
    fn differing_versions_mismatch() {
        let set = cluster_set(vec![
            ("a", collected(vec![entry("worker", "default", &[("main", "app:1.0")])])),
            ("b", collected(vec![entry("worker", "default", &[("main", "app:1.1")])])),
        ]);

        let results = evaluate(&set, ResourceKind::Deployment);
        assert_eq!(results[0].status, DiffStatus::Mismatch);
        assert_eq!(
            results[0].per_cluster[0].images,
            Some(vec!["app:1.0".to_string()])
        );
        assert_eq!(
            results[0].per_cluster[1].images,
            Some(vec!["app:1.1".to_string()])
        );
    }

    #[test]
    fn container_declaration_order_is_irrelevant() {
        let set = cluster_set(vec![
            (
                "a",
                collected(vec![entry(
                    "stack",
                    "default",
                    &[("first", "b:1"), ("second", "a:1")],
                )]),
            ),
            (
                "b",
                collected(vec![entry(
                    "stack",
                    "default",
                    &[("first", "a:1"), ("second", "b:1")],
                )]),
            ),
        ]);

        assert_eq!(
            evaluate(&set, ResourceKind::Deployment)[0].status,
            DiffStatus::Match
        );
    }

    #[test]
    fn duplicate_images_must_match_count_for_count() {
        let set = cluster_set(vec![
            (
                "a",
                collected(vec![entry(
                    "app",
                    "default",
                    &[("one", "app:1.0"), ("two", "app:1.0")],
                )]),
            ),
            (
                "b",
                collected(vec![entry("app", "default", &[("one", "app:1.0")])]),
            ),
        ]);

        assert_eq!(
            evaluate(&set, ResourceKind::Deployment)[0].status,
            DiffStatus::Mismatch
        );
    }

    #[test]
    fn resource_only_in_second_cluster_mismatches() {
        let set = cluster_set(vec![
            ("a", collected(vec![])),
            (
                "b",
                collected(vec![entry("late", "default", &[("main", "app:1.0")])]),
            ),
        ]);

        assert_eq!(
            evaluate(&set, ResourceKind::Deployment)[0].status,
            DiffStatus::Mismatch
        );
    }

    #[test]
    fn unavailable_cluster_yields_unknown() {
        let set = cluster_set(vec![
            (
                "a",
                collected(vec![entry("api", "default", &[("main", "app:1.0")])]),
            ),
            ("b", ClusterCollection::Unavailable("timed out".to_string())),
        ]);

        let results = evaluate(&set, ResourceKind::Deployment);
        assert_eq!(results[0].status, DiffStatus::Unknown);
        assert!(results[0].per_cluster[1].images.is_none());
    }

    #[test]
    fn disagreeing_clusters_behind_unavailable_baseline_mismatch() {
        let set = cluster_set(vec![
            ("a", ClusterCollection::Unavailable("unreachable".to_string())),
            (
                "b",
                collected(vec![entry("api", "default", &[("main", "app:1.0")])]),
            ),
            (
                "c",
                collected(vec![entry("api", "default", &[("main", "app:1.1")])]),
            ),
        ]);

        // the baseline falls to the first available cluster, so b and c
        // are still compared against each other
        assert_eq!(
            evaluate(&set, ResourceKind::Deployment)[0].status,
            DiffStatus::Mismatch
        );
    }

    #[test]
    fn agreeing_clusters_behind_unavailable_baseline_stay_unknown() {
        let set = cluster_set(vec![
            ("a", ClusterCollection::Unavailable("unreachable".to_string())),
            (
                "b",
                collected(vec![entry("api", "default", &[("main", "app:1.0")])]),
            ),
            (
                "c",
                collected(vec![entry("api", "default", &[("main", "app:1.0")])]),
            ),
        ]);

        assert_eq!(
            evaluate(&set, ResourceKind::Deployment)[0].status,
            DiffStatus::Unknown
        );
    }

    #[test]
    fn definite_mismatch_outweighs_unavailable_cluster() {
        let set = cluster_set(vec![
            (
                "a",
                collected(vec![entry("api", "default", &[("main", "app:1.0")])]),
            ),
            ("b", collected(vec![])),
            ("c", ClusterCollection::Unavailable("unreachable".to_string())),
        ]);

        assert_eq!(
            evaluate(&set, ResourceKind::Deployment)[0].status,
            DiffStatus::Mismatch
        );
    }
}

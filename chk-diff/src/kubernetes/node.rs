use std::collections::BTreeSet;
use std::time::Duration;

use futures::future::join_all;
use k8s_openapi::api::core::v1::Node;
use kube::api::ListParams;
use kube::{Api, ResourceExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::kubernetes::Cluster;
use crate::labels::ClusterLabels;
use crate::{Error, Result};

/// Label keys of the nodes matching `selector` in one cluster.
pub async fn list_label_keys(
    cluster: &Cluster,
    selector: Option<&str>,
) -> Result<BTreeSet<String>> {
    let api: Api<Node> = Api::all(cluster.client());
    let mut lp = ListParams::default();
    if let Some(selector) = selector {
        lp = lp.labels(selector);
    }

    let mut keys = BTreeSet::new();
    for node in api.list(&lp).await? {
        keys.extend(node.labels().keys().cloned());
    }
    Ok(keys)
}

/// Collects node label keys from every cluster concurrently, with the same
/// timeout and cancellation discipline as the workload aggregation.
pub async fn aggregate_node_labels(
    clusters: &[Cluster],
    selector: Option<&str>,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Vec<ClusterLabels> {
    join_all(clusters.iter().map(|cluster| {
        let cancel = cancel.clone();
        async move {
            info!(cluster = %cluster.name, "collecting node labels");
            let collected = tokio::select! {
                _ = cancel.cancelled() => Err(Error::Cancelled),
                res = tokio::time::timeout(timeout, list_label_keys(cluster, selector)) => {
                    res.map_err(|_| Error::CollectTimeout(timeout)).and_then(|r| r)
                }
            };
            match collected {
                Ok(labels) => ClusterLabels {
                    cluster: cluster.name.clone(),
                    labels: Some(labels),
                },
                Err(e) => {
                    warn!(cluster = %cluster.name, %e, "node label collection failed");
                    ClusterLabels {
                        cluster: cluster.name.clone(),
                        labels: None,
                    }
                }
            }
        }
    }))
    .await
}

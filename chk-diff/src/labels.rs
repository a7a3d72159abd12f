use std::collections::BTreeSet;

use serde::Serialize;

use crate::diff::DiffStatus;

/// Node label keys collected from one cluster.
#[derive(Clone, Debug)]
pub struct ClusterLabels {
    pub cluster: String,
    /// `None` when the cluster was unavailable.
    pub labels: Option<BTreeSet<String>>,
}

/// One cluster's answer for a label.
#[derive(Clone, Debug, Serialize)]
pub struct ClusterPresence {
    pub cluster: String,
    /// `None` when the cluster was unavailable.
    pub present: Option<bool>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LabelDiff {
    pub label: String,
    /// Presence per cluster in input order.
    pub presence: Vec<ClusterPresence>,
    pub status: DiffStatus,
}

/// Unions the label keys over all clusters and reports per label whether
/// every available cluster carries it. Same union-then-compare pattern as
/// the workload image diff.
pub fn evaluate_labels(clusters: &[ClusterLabels]) -> Vec<LabelDiff> {
    let mut union = BTreeSet::new();
    for cluster in clusters {
        if let Some(labels) = &cluster.labels {
            union.extend(labels.iter().cloned());
        }
    }

    union
        .into_iter()
        .map(|label| {
            let mut mismatched = false;
            let mut unknown = false;
            let presence = clusters
                .iter()
                .map(|cluster| {
                    let present = match &cluster.labels {
                        Some(labels) => {
                            let present = labels.contains(&label);
                            if !present {
                                mismatched = true;
                            }
                            Some(present)
                        }
                        None => {
                            unknown = true;
                            None
                        }
                    };
                    ClusterPresence {
                        cluster: cluster.cluster.clone(),
                        present,
                    }
                })
                .collect();
            let status = if mismatched {
                DiffStatus::Mismatch
            } else if unknown {
                DiffStatus::Unknown
            } else {
                DiffStatus::Match
            };
            LabelDiff {
                label,
                presence,
                status,
            }
        })
        .collect()
}

use std::fmt::Display;
use std::str::FromStr;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Container, Pod, PodTemplateSpec};
use kube::api::ListParams;
use kube::{Api, ResourceExt};
use serde::Serialize;

use crate::kubernetes::Cluster;
use crate::{Error, Result};

/// The workload kinds a comparison can run over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Deployment,
    DaemonSet,
    StatefulSet,
    Pod,
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deployment" | "deploy" => Ok(Self::Deployment),
            "daemonset" | "ds" => Ok(Self::DaemonSet),
            "statefulset" | "sts" => Ok(Self::StatefulSet),
            "pod" | "po" => Ok(Self::Pod),
            other => Err(Error::UnknownResourceKind(other.to_string())),
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Deployment => "deployment",
            Self::DaemonSet => "daemonset",
            Self::StatefulSet => "statefulset",
            Self::Pod => "pod",
        };
        write!(f, "{kind}")
    }
}

/// One workload object as returned by the cluster resource provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub name: String,
    pub namespace: String,
    pub containers: Vec<ContainerSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
}

/// Seam between the collection engine and the cluster API.
///
/// The kube-backed [`Cluster`] implements this for live clusters; tests use
/// in-memory fakes.
pub trait WorkloadLister {
    fn list_workloads(
        &self,
        kind: ResourceKind,
        namespace: &str,
    ) -> impl Future<Output = Result<Vec<WorkloadSpec>>> + Send;
}

impl WorkloadLister for Cluster {
    async fn list_workloads(&self, kind: ResourceKind, namespace: &str) -> Result<Vec<WorkloadSpec>> {
        let client = self.client();
        let lp = ListParams::default();
        let workloads = match kind {
            ResourceKind::Deployment => {
                let api: Api<Deployment> = Api::namespaced(client, namespace);
                api.list(&lp)
                    .await?
                    .into_iter()
                    .map(|d| WorkloadSpec {
                        name: d.name_any(),
                        namespace: d.namespace().unwrap_or_else(|| namespace.to_string()),
                        containers: template_containers(d.spec.map(|s| s.template)),
                    })
                    .collect()
            }
            ResourceKind::DaemonSet => {
                let api: Api<DaemonSet> = Api::namespaced(client, namespace);
                api.list(&lp)
                    .await?
                    .into_iter()
                    .map(|d| WorkloadSpec {
                        name: d.name_any(),
                        namespace: d.namespace().unwrap_or_else(|| namespace.to_string()),
                        containers: template_containers(d.spec.map(|s| s.template)),
                    })
                    .collect()
            }
            ResourceKind::StatefulSet => {
                let api: Api<StatefulSet> = Api::namespaced(client, namespace);
                api.list(&lp)
                    .await?
                    .into_iter()
                    .map(|s| WorkloadSpec {
                        name: s.name_any(),
                        namespace: s.namespace().unwrap_or_else(|| namespace.to_string()),
                        containers: template_containers(s.spec.map(|s| s.template)),
                    })
                    .collect()
            }
            ResourceKind::Pod => {
                let api: Api<Pod> = Api::namespaced(client, namespace);
                api.list(&lp)
                    .await?
                    .into_iter()
                    .map(|p| WorkloadSpec {
                        name: p.name_any(),
                        namespace: p.namespace().unwrap_or_else(|| namespace.to_string()),
                        containers: container_specs(
                            p.spec.map(|s| s.containers).unwrap_or_default(),
                        ),
                    })
                    .collect()
            }
        };
        Ok(workloads)
    }
}

/// Containers of the pod template carried by the controller kinds.
fn template_containers(template: Option<PodTemplateSpec>) -> Vec<ContainerSpec> {
    container_specs(
        template
            .and_then(|t| t.spec)
            .map(|s| s.containers)
            .unwrap_or_default(),
    )
}

fn container_specs(containers: Vec<Container>) -> Vec<ContainerSpec> {
    containers
        .into_iter()
        .map(|c| ContainerSpec {
            name: c.name,
            image: c.image.unwrap_or_default(),
        })
        .collect()
}

pub mod cluster;
pub mod node;
pub mod workload;

pub use cluster::Cluster;
pub use workload::{ContainerSpec, ResourceKind, WorkloadLister, WorkloadSpec};

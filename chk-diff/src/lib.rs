pub mod allowlist;
pub mod diff;
pub mod image;
pub mod inventory;
pub mod kubernetes;
pub mod labels;

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("kube error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("failed to create config from kubeconfig: {0}")]
    KubeConfig(#[from] kube::config::KubeconfigError),

    #[error("no kubeconfig context matches cluster {0}")]
    UnknownCluster(String),

    #[error("unsupported resource kind: {0}")]
    UnknownResourceKind(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse components config: {0}")]
    YamlConversion(#[from] serde_yaml::Error),

    #[error("collection timed out after {0:?}")]
    CollectTimeout(Duration),

    #[error("collection cancelled")]
    Cancelled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

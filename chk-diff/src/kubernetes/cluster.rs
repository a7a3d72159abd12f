use std::path::Path;

use kube::config::{KubeConfigOptions, Kubeconfig};

use crate::{Error, Result};

/// Handle for one cluster taking part in a comparison.
///
/// Resolution and client construction happen up front so that a typo in a
/// cluster name fails before any collection starts; everything after this
/// point is a recoverable per-cluster failure.
#[derive(Clone)]
pub struct Cluster {
    /// Name the caller asked for, used as the column key in reports.
    pub name: String,
    /// The kubeconfig context the name resolved to.
    pub context: String,
    client: kube::Client,
}

impl Cluster {
    /// Resolves `name` against the kubeconfig contexts and builds a client
    /// for the matching context.
    pub async fn try_new(name: &str, kubeconfig: &Kubeconfig) -> Result<Self> {
        let context = resolve_context(name, kubeconfig)?;
        let config = kube::Config::from_custom_kubeconfig(
            kubeconfig.clone(),
            &KubeConfigOptions {
                context: Some(context.clone()),
                ..Default::default()
            },
        )
        .await?;
        let client = kube::Client::try_from(config)?;

        Ok(Self {
            name: name.to_string(),
            context,
            client,
        })
    }

    pub fn client(&self) -> kube::Client {
        self.client.clone()
    }
}

/// Reads the kubeconfig from `path`, falling back to the default search
/// path (`KUBECONFIG` or `~/.kube/config`) when no path is given.
pub fn load_kubeconfig(path: Option<&Path>) -> Result<Kubeconfig> {
    let kubeconfig = match path {
        Some(path) => Kubeconfig::read_from(path)?,
        None => Kubeconfig::read()?,
    };
    Ok(kubeconfig)
}

/// The first context whose name starts with the requested cluster name.
fn resolve_context(name: &str, kubeconfig: &Kubeconfig) -> Result<String> {
    kubeconfig
        .contexts
        .iter()
        .find(|c| c.name.starts_with(name))
        .map(|c| c.name.clone())
        .ok_or_else(|| Error::UnknownCluster(name.to_string()))
}

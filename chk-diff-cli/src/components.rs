use std::path::Path;
use std::time::Duration;

use chk_diff::allowlist::AllowedComponents;
use chk_diff::diff::{self, DiffResult};
use chk_diff::inventory::{self, IdentityScope};
use chk_diff::kubernetes::{Cluster, cluster};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{ComponentArgs, OutputFormat};
use crate::render;

pub(crate) async fn run(
    kubeconfig: Option<&Path>,
    args: ComponentArgs,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let kubeconfig = cluster::load_kubeconfig(kubeconfig)?;

    // resolution failures abort before any collection starts
    let mut clusters = Vec::with_capacity(args.clusters.len());
    for name in &args.clusters {
        let cluster = Cluster::try_new(name, &kubeconfig).await?;
        debug!(cluster = %cluster.name, context = %cluster.context, "resolved cluster");
        clusters.push((cluster.name.clone(), cluster));
    }

    let allowed = match &args.components_file {
        Some(path) => Some(AllowedComponents::try_new(path).await?),
        None => None,
    };
    let scope = if args.by_namespace {
        IdentityScope::NamespacedName
    } else {
        IdentityScope::Name
    };
    let timeout = Duration::from_secs(args.timeout);

    let mut results: Vec<DiffResult> = Vec::new();
    for kind in &args.resources {
        let set = inventory::aggregate(
            &clusters,
            &args.namespaces,
            *kind,
            allowed.as_ref(),
            scope,
            timeout,
            &cancel,
        )
        .await;
        results.extend(diff::evaluate(&set, *kind));
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Table => println!(
            "{}",
            render::components_table(&args.clusters, &results, args.table_width)
        ),
    }
    Ok(())
}

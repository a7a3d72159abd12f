use std::path::Path;
use std::time::Duration;

use chk_diff::kubernetes::{Cluster, cluster, node};
use chk_diff::labels::evaluate_labels;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{LabelArgs, OutputFormat};
use crate::render;

pub(crate) async fn run(
    kubeconfig: Option<&Path>,
    args: LabelArgs,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let kubeconfig = cluster::load_kubeconfig(kubeconfig)?;

    let mut clusters = Vec::with_capacity(args.clusters.len());
    for name in &args.clusters {
        let cluster = Cluster::try_new(name, &kubeconfig).await?;
        debug!(cluster = %cluster.name, context = %cluster.context, "resolved cluster");
        clusters.push(cluster);
    }

    let collected = node::aggregate_node_labels(
        &clusters,
        args.selector.as_deref(),
        Duration::from_secs(args.timeout),
        &cancel,
    )
    .await;
    let results = evaluate_labels(&collected);

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Table => println!("{}", render::labels_table(&args.clusters, &results)),
    }
    Ok(())
}

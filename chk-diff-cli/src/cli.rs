use std::path::PathBuf;

use chk_diff::kubernetes::ResourceKind;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(version, about = "Diffs workload images and node labels across clusters", long_about = None)]
pub struct Cli {
    /// Path to the kubeconfig file, defaults to the usual search path
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand, Debug)]
pub enum Commands {
    /// Compare workload container images between clusters
    Components(ComponentArgs),

    /// Compare node label keys between clusters
    Labels(LabelArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ComponentArgs {
    /// Clusters to compare; the first is the baseline ( eg. -c test1,test2 )
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub clusters: Vec<String>,

    /// Resource kinds to check ( eg. -r deploy,sts )
    #[arg(short, long, value_delimiter = ',', default_value = "deployment")]
    pub resources: Vec<ResourceKind>,

    /// Namespaces to check ( eg. -n caas-system,kube-system )
    #[arg(short, long, value_delimiter = ',', default_value = "default")]
    pub namespaces: Vec<String>,

    /// YAML file listing the allowed system components; everything else is
    /// excluded from the comparison
    #[arg(long)]
    pub components_file: Option<PathBuf>,

    /// Qualify resource identity with the namespace
    #[arg(long)]
    pub by_namespace: bool,

    /// Per-cluster collection timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Maximum word length to show in a single cell
    #[arg(long, default_value_t = 30)]
    pub table_width: usize,

    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct LabelArgs {
    /// Clusters to compare ( eg. -c test1,test2 )
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub clusters: Vec<String>,

    /// Node label selector ( eg. -l node-role.kubernetes.io/master= )
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// Per-cluster collection timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

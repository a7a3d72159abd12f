mod cli;
mod components;
mod labels;
mod render;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        kubeconfig,
        command,
    } = Cli::parse();
    setup_subscriber();

    let cancel = tokio_util::sync::CancellationToken::new();
    let run = async {
        match command {
            cli::Commands::Components(args) => {
                components::run(kubeconfig.as_deref(), args, cancel.child_token()).await
            }
            cli::Commands::Labels(args) => {
                labels::run(kubeconfig.as_deref(), args, cancel.child_token()).await
            }
        }
    };
    tokio::pin!(run);

    tokio::select! {
        res = &mut run => res?,
        _ = shutdown_signal() => {
            // cancel pending collections and still emit whatever was
            // computed, with the affected clusters reported unavailable
            cancel.cancel();
            run.await?;
        }
    }
    Ok(())
}

fn setup_subscriber() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chk_diff=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };
    tokio::select! {
        _ = ctrl_c => {
          info!("captured ctrl_c signal");
        },
        _ = terminate => {},
    }
}

use anyhow::Result;
use clap::Parser;
use paxkv::{ActivityLog, Cluster, ClusterConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "paxkv")]
#[command(about = "Replicated in-memory key-value store")]
struct Args {
    /// Host every peer binds to.
    host: String,

    /// The five peer ports, in cluster order.
    #[arg(num_args = 5, required = true, value_name = "PORT")]
    ports: Vec<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paxkv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let log = ActivityLog::new("serverLog.txt");

    let config = ClusterConfig::new(args.host, args.ports);
    let mut cluster = Cluster::new(config, log.clone())?;
    cluster.start().await?;

    cluster.elect_leaders().await;
    log.activity("Leaders elected");

    let injector = cluster.spawn_failure_injector();

    info!("cluster running, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    injector.abort();
    cluster.shutdown();
    Ok(())
}

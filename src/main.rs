use anyhow::{Context, Result};
use clap::Parser;
use shardgate::{RouterConfig, RouterServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shardgate")]
#[command(about = "Path-based tenant router for a sharded search cluster")]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bind: Option<SocketAddr>,
    #[arg(long)]
    path_prefix: Option<String>,
    #[arg(long)]
    schema_dir: Option<PathBuf>,
    #[arg(long)]
    topology_file: Option<PathBuf>,
    #[arg(long)]
    shards: Option<u32>,
    #[arg(long)]
    replicas: Option<u32>,
    #[arg(long = "host")]
    hosts: Vec<String>,
    #[arg(long = "core")]
    cores: Vec<String>,
    #[arg(long)]
    default_core: Option<String>,
    #[arg(long = "reserved")]
    reserved: Vec<String>,
    #[arg(long)]
    max_body_bytes: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<RouterConfig> {
        let mut config = match &self.config {
            Some(path) => RouterConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RouterConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(prefix) = self.path_prefix {
            config.path_prefix = prefix;
        }
        if let Some(dir) = self.schema_dir {
            config.schema_dir = Some(dir);
        }
        if let Some(path) = self.topology_file {
            config.topology_file = Some(path);
        }
        if let Some(shards) = self.shards {
            config.topology.shard_count = shards;
        }
        if let Some(replicas) = self.replicas {
            config.topology.replicas_per_shard = replicas;
        }
        if !self.hosts.is_empty() {
            config.topology.hosts = self.hosts;
        }
        config.cores.extend(self.cores);
        if let Some(core) = self.default_core {
            config.default_core = Some(core);
        }
        config.reserved_segments.extend(self.reserved);
        if let Some(max) = self.max_body_bytes {
            config.max_body_bytes = max;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    tracing::info!("Starting router on {}", config.bind);
    if !config.cores.is_empty() {
        tracing::info!("Serving cores: {:?}", config.cores);
    }

    let server = RouterServer::from_config(config)
        .await
        .context("building router")?;
    server.run().await.context("serving HTTP")?;
    Ok(())
}

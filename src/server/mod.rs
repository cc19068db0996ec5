use crate::cluster::{
    FileTopologyProvider, InMemoryCoreRegistry, DiagnosticCore, ShardTopologyProvider,
    StaticTopologyProvider,
};
use crate::config::RouterConfig;
use crate::core::{Result, RouterError};
use crate::dispatch::{Dispatcher, dispatch};
use crate::execution::{ExecutionState, execute};
use crate::schema::{FileSchemaStore, InMemorySchemaStore, SchemaStore};
use axum::Router;
use axum::middleware;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Assembles the handler chain: tracing, then tenant dispatch, then execution.
pub fn build_router(dispatcher: Dispatcher, execution: ExecutionState) -> Router {
    Router::new()
        .fallback(execute)
        .with_state(execution)
        .layer(middleware::from_fn_with_state(dispatcher, dispatch))
        .layer(TraceLayer::new_for_http())
}

pub struct RouterServer {
    config: RouterConfig,
    router: Router,
}

impl RouterServer {
    /// Builds collaborators from configuration.
    pub async fn from_config(config: RouterConfig) -> Result<Self> {
        let dispatch_config = config.dispatch_config()?;

        let topology: Arc<dyn ShardTopologyProvider> = match &config.topology_file {
            Some(path) => Arc::new(FileTopologyProvider::new(path)),
            None => Arc::new(StaticTopologyProvider::new(config.topology.clone())),
        };

        let schemas: Arc<dyn SchemaStore> = match &config.schema_dir {
            Some(dir) => Arc::new(FileSchemaStore::new(dir)?),
            None => Arc::new(InMemorySchemaStore::new()),
        };

        let mut registry = InMemoryCoreRegistry::new();
        if let Some(default_core) = &config.default_core {
            registry = registry.with_default_core(default_core.as_str());
        }
        for core in &config.cores {
            registry
                .register(core.as_str(), Arc::new(DiagnosticCore::new(core.as_str())))
                .await?;
        }

        let dispatcher = Dispatcher::new(dispatch_config, topology, schemas);
        let execution = ExecutionState::new(Arc::new(registry));
        Ok(Self {
            router: build_router(dispatcher, execution),
            config,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind).await.map_err(|e| {
            RouterError::Config(format!("Failed to bind {}: {}", self.config.bind, e))
        })?;
        tracing::info!(
            addr = %self.config.bind,
            prefix = %self.config.path_prefix,
            cores = self.config.cores.len(),
            "HTTP router listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("HTTP router stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

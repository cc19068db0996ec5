// ============================================================================
// shardgate Library
// ============================================================================

//! Path-based tenant router for a sharded multi-index search cluster.
//!
//! Each index ("core") is addressed by a name in the URL path. The router
//! classifies every request, serves the `/ping` topology check and the
//! `/schema` read/write endpoints itself, and hands every other request to the
//! execution stage with the tenant attached.
//!
//! ```no_run
//! use shardgate::{RouterConfig, RouterServer};
//!
//! # async fn run() -> shardgate::Result<()> {
//! let config = RouterConfig::default().core("books").default_core("books");
//! RouterServer::from_config(config).await?.run().await
//! # }
//! ```

pub mod cluster;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod execution;
pub mod routing;
pub mod schema;
pub mod server;
pub mod web;

pub use crate::core::{Result, RouterError, ShardTopology, TenantId};
pub use cluster::{
    CoreHandler, CoreRegistry, DiagnosticCore, FileTopologyProvider, InMemoryCoreRegistry,
    ShardTopologyProvider, StaticTopologyProvider,
};
pub use config::{DispatchConfig, RouterConfig};
pub use dispatch::{DispatchContext, Dispatcher, RouteClass, TENANT_INDEX_KEY, classify};
pub use execution::{CoreRequest, ExecutionState, QueryResponse};
pub use routing::{RouteTable, resolve_tenant};
pub use schema::{FileSchemaStore, InMemorySchemaStore, SchemaStore};
pub use server::{RouterServer, build_router};

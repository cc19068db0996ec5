//! Tenant-routing middleware stage.
//!
//! Every request is classified by path prefix, in this order:
//!
//! 1. `/ping`: answered here with the cluster shard topology.
//! 2. `/schema` with GET, PUT or POST: answered here from the schema store.
//! 3. anything else: a [`DispatchContext`] carrying the tenant is attached and
//!    the request continues to the next stage.
//!
//! Classification works on the percent-decoded path, so `/schema/my%20index`
//! addresses the tenant `my index`.
//!
//! Failures on the two administrative branches become a bare status code and
//! never reach later stages.

pub mod context;

use crate::cluster::ShardTopologyProvider;
use crate::config::DispatchConfig;
use crate::core::{Result, RouterError, TenantId};
use crate::routing::{decode_path, resolve_tenant, strip_path_prefix, tenant_segment};
use crate::schema::SchemaStore;
use crate::web::{bare_status, xml_response};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::{Method, StatusCode};
use std::sync::Arc;

pub use context::{DispatchContext, HANDLER_PATH_KEY, TENANT_INDEX_KEY};

pub const PING_PREFIX: &str = "/ping";
pub const SCHEMA_PREFIX: &str = "/schema";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteClass {
    Ping { tenant: TenantId },
    SchemaRead { tenant: TenantId },
    SchemaWrite { tenant: TenantId },
    Normal {
        tenant: Option<TenantId>,
        handler_path: String,
    },
}

/// Decides how a request is handled. Pure; performs no I/O.
///
/// Methods other than GET, PUT and POST under `/schema` are classified as
/// normal requests.
pub fn classify(method: &Method, path: &str, config: &DispatchConfig) -> RouteClass {
    if path.starts_with(PING_PREFIX) {
        return RouteClass::Ping {
            tenant: resolve_tenant(path, PING_PREFIX),
        };
    }

    if path.starts_with(SCHEMA_PREFIX) {
        let tenant = resolve_tenant(path, SCHEMA_PREFIX);
        if *method == Method::GET {
            return RouteClass::SchemaRead { tenant };
        }
        if *method == Method::POST || *method == Method::PUT {
            return RouteClass::SchemaWrite { tenant };
        }
    }

    let stripped = strip_path_prefix(path, &config.path_prefix);
    match tenant_segment(stripped) {
        Some((tenant, handler_path)) => match config.route_table.admit(tenant) {
            Some(tenant) => RouteClass::Normal {
                tenant: Some(tenant),
                handler_path: handler_path.to_string(),
            },
            None => RouteClass::Normal {
                tenant: None,
                handler_path: stripped.to_string(),
            },
        },
        None => RouteClass::Normal {
            tenant: None,
            handler_path: stripped.to_string(),
        },
    }
}

/// Shared state of the dispatch stage.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<DispatchConfig>,
    topology: Arc<dyn ShardTopologyProvider>,
    schemas: Arc<dyn SchemaStore>,
}

impl Dispatcher {
    pub fn new(
        config: DispatchConfig,
        topology: Arc<dyn ShardTopologyProvider>,
        schemas: Arc<dyn SchemaStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            topology,
            schemas,
        }
    }

    async fn ping(&self, tenant: &TenantId) -> Response {
        match self.topology.topology().await {
            Ok(topology) => xml_response(topology.to_xml()),
            Err(err) => {
                tracing::warn!(tenant = %tenant, error = %err, "shard topology unavailable");
                bare_status(StatusCode::NOT_FOUND)
            }
        }
    }

    async fn read_schema(&self, tenant: &TenantId) -> Response {
        match self.schemas.read(tenant).await {
            Ok(schema) => xml_response(schema),
            Err(err) => {
                tracing::warn!(tenant = %tenant, error = %err, "schema read failed");
                bare_status(StatusCode::NOT_FOUND)
            }
        }
    }

    async fn store_schema(&self, tenant: &TenantId, body: Body) -> Result<()> {
        let text = read_body_text(body, self.config.max_body_bytes).await?;
        self.schemas.write(tenant, &text).await
    }

    async fn write_schema(&self, tenant: &TenantId, body: Body) -> Response {
        match self.store_schema(tenant, body).await {
            Ok(()) => {
                tracing::info!(tenant = %tenant, "schema replaced");
                bare_status(StatusCode::OK)
            }
            Err(err) => {
                tracing::warn!(tenant = %tenant, error = %err, "schema write failed");
                bare_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Buffers the whole body, up to `limit` bytes, and decodes it once.
pub async fn read_body_text(body: Body, limit: usize) -> Result<String> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| RouterError::Body(e.to_string()))?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Middleware entry point; install with `axum::middleware::from_fn_with_state`.
pub async fn dispatch(
    State(dispatcher): State<Dispatcher>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = decode_path(req.uri().path());
    let class = classify(req.method(), &path, &dispatcher.config);
    tracing::debug!(path = %path, route = ?class, "classified request");

    match class {
        RouteClass::Ping { tenant } => dispatcher.ping(&tenant).await,
        RouteClass::SchemaRead { tenant } => dispatcher.read_schema(&tenant).await,
        RouteClass::SchemaWrite { tenant } => {
            dispatcher.write_schema(&tenant, req.into_body()).await
        }
        RouteClass::Normal {
            tenant,
            handler_path,
        } => {
            let mut context = DispatchContext::new();
            if let Some(tenant) = tenant {
                context.set_tenant(tenant);
            }
            context.set_handler_path(handler_path);
            req.extensions_mut().insert(context);
            next.run(req).await
        }
    }
}

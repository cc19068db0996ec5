//! Cluster-side collaborators: shard topology and the core registry.

pub mod registry;
pub mod topology;

pub use registry::{CoreHandler, CoreRegistry, DiagnosticCore, InMemoryCoreRegistry};
pub use topology::{FileTopologyProvider, ShardTopologyProvider, StaticTopologyProvider};

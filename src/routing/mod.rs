//! Path parsing and tenant routing rules.

pub mod path;
pub mod table;

pub use path::{decode_path, resolve_tenant, strip_path_prefix, tenant_segment};
pub use table::RouteTable;

pub mod error;
pub mod types;

pub use error::{RouterError, Result};
pub use types::{ShardTopology, TenantId, escape_xml};

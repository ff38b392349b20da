//! Endpoints the router sends calls to, and the replica pools built from them.

pub mod endpoint;
pub mod error;
pub mod pool;
pub mod query;
pub mod query_cache;

pub use endpoint::{Endpoint, Param};
pub use error::{Error, ErrorKind};
pub use pool::{Pool, PoolSet};
pub use query::{CacheKey, Query};
pub use query_cache::{with_cache, Cache, QueryCache};

//! Pools of read replicas.

pub mod error;
pub mod pool;
pub mod pools;

pub use error::Error;
pub use pool::Pool;
pub use pools::PoolSet;

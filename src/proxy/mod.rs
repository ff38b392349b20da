//! Leader/replica routing.

pub mod connection_proxy;
pub mod error;
pub mod guard;
pub mod methods;
pub mod policy;
pub mod query_cache;
pub mod replay;
pub mod router;
pub mod state;
pub mod transaction;

pub use connection_proxy::ConnectionProxy;
pub use error::Error;
pub use guard::{LeaderGuard, PoolGuard};
pub use methods::{Methods, Safety};
pub use policy::Policy;
pub use query_cache::SELECT_ALL;
pub use replay::ReplayPolicy;
pub use router::Router;
pub use state::State;
pub use transaction::Transaction;

#[cfg(test)]
mod test;

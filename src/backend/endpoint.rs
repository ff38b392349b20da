//! Database endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Error, QueryCache};

/// Query parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Param {
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// A database the router can send calls to: the leader or one replica.
///
/// Implementations own the physical connections. Each call checks a connection
/// out of the implementation's own pool and returns it when done, except between
/// [`Endpoint::begin`] and [`Endpoint::commit`]/[`Endpoint::rollback`], where
/// the same connection must serve every call.
#[async_trait]
pub trait Endpoint: Send + Sync + 'static {
    /// What a call returns, e.g. a set of rows.
    type Output: Clone + Send + Sync + 'static;

    /// Name used in logs and introspection.
    fn name(&self) -> &str;

    /// Execute a method with parameters.
    async fn execute(&self, method: &str, params: &[Param]) -> Result<Self::Output, Error>;

    /// Start a transaction.
    async fn begin(&self) -> Result<(), Error>;

    /// Commit the current transaction.
    async fn commit(&self) -> Result<(), Error>;

    /// Rollback the current transaction.
    async fn rollback(&self) -> Result<(), Error>;

    /// Check the connection is alive, reconnecting if it isn't.
    async fn verify(&self) -> Result<(), Error>;

    /// Drop and re-establish the connection.
    async fn reconnect(&self) -> Result<(), Error>;

    /// Query cache attached to this endpoint, if any.
    fn query_cache(&self) -> Option<Arc<dyn QueryCache<Self::Output>>> {
        None
    }
}

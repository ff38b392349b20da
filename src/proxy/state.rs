//! Session routing state.

use std::fmt;
use std::sync::Arc;

use crate::backend::{Endpoint, Pool};

/// Where a session's calls go right now.
pub struct State<E> {
    /// Endpoint serving safe methods.
    pub(super) current: Arc<E>,
    /// Pool replicas are taken from.
    pub(super) pool: Arc<Pool<E>>,
    /// Nested leader scopes. Zero means replica mode.
    pub(super) depth: usize,
}

impl<E> State<E> {
    /// Replica mode on this pool's current replica.
    pub(super) fn replica(pool: Arc<Pool<E>>) -> Self {
        Self {
            current: pool.current(),
            pool,
            depth: 0,
        }
    }

    /// Leader mode, one scope deep.
    pub(super) fn leader(leader: Arc<E>, pool: Arc<Pool<E>>) -> Self {
        Self {
            current: leader,
            pool,
            depth: 1,
        }
    }
}

impl<E: Endpoint> fmt::Display for State<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "current: {}, pool: {}, depth: {}",
            self.current.name(),
            self.pool,
            self.depth
        )
    }
}

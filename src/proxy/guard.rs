//! Routing scope guards.
//!
//! Each guard changes where the session's calls go and puts
//! things back when dropped, including on early return or panic.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::backend::{Endpoint, Pool};

use super::ConnectionProxy;

/// Leader scope, see [`ConnectionProxy::with_leader`].
pub struct LeaderGuard<'a, E: Endpoint> {
    proxy: &'a mut ConnectionProxy<E>,
    saved: Arc<E>,
}

impl<'a, E: Endpoint> LeaderGuard<'a, E> {
    pub(super) fn new(proxy: &'a mut ConnectionProxy<E>) -> Self {
        let saved = proxy.enter_leader();
        Self { proxy, saved }
    }
}

impl<E: Endpoint> std::fmt::Debug for LeaderGuard<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderGuard")
            .field("depth", &self.proxy.depth())
            .field("saved", &self.saved.name())
            .finish()
    }
}

impl<E: Endpoint> Deref for LeaderGuard<'_, E> {
    type Target = ConnectionProxy<E>;

    fn deref(&self) -> &Self::Target {
        self.proxy
    }
}

impl<E: Endpoint> DerefMut for LeaderGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.proxy
    }
}

impl<E: Endpoint> Drop for LeaderGuard<'_, E> {
    fn drop(&mut self) {
        self.proxy.leave_leader(self.saved.clone());
    }
}

/// Pool scope, see [`ConnectionProxy::with_pool`].
pub struct PoolGuard<'a, E: Endpoint> {
    proxy: &'a mut ConnectionProxy<E>,
    current: Arc<E>,
    pool: Arc<Pool<E>>,
}

impl<'a, E: Endpoint> PoolGuard<'a, E> {
    pub(super) fn new(proxy: &'a mut ConnectionProxy<E>, name: &str) -> Self {
        let (current, pool) = proxy.enter_pool(name);
        Self {
            proxy,
            current,
            pool,
        }
    }
}

impl<E: Endpoint> std::fmt::Debug for PoolGuard<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolGuard")
            .field("pool", &self.proxy.current_pool_name())
            .field("saved_pool", &self.pool.name())
            .field("saved", &self.current.name())
            .finish()
    }
}

impl<E: Endpoint> Deref for PoolGuard<'_, E> {
    type Target = ConnectionProxy<E>;

    fn deref(&self) -> &Self::Target {
        self.proxy
    }
}

impl<E: Endpoint> DerefMut for PoolGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.proxy
    }
}

impl<E: Endpoint> Drop for PoolGuard<'_, E> {
    fn drop(&mut self) {
        self.proxy.leave_pool(self.current.clone(), self.pool.clone());
    }
}

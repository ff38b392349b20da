//! Shared router, hands out one proxy per session.

use std::sync::Arc;

use tracing::info;

use crate::backend::{Endpoint, PoolSet};
use crate::config::{self, Config};

use super::{ConnectionProxy, Error, Policy};

/// Leader, replica pools and routing policy, shared by all sessions.
pub struct Router<E: Endpoint> {
    leader: Arc<E>,
    pools: Arc<PoolSet<E>>,
    policy: Arc<Policy>,
}

impl<E: Endpoint> Clone for Router<E> {
    fn clone(&self) -> Self {
        Self {
            leader: self.leader.clone(),
            pools: self.pools.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<E: Endpoint> Router<E> {
    /// Create new router.
    pub fn new(leader: Arc<E>, pools: PoolSet<E>, policy: Policy) -> Self {
        info!(
            "proxy loaded with leader \"{}\" and pools: {}",
            leader.name(),
            pools.names().join(", ")
        );

        Self {
            leader,
            pools: Arc::new(pools),
            policy: Arc::new(policy),
        }
    }

    /// Create router from configuration.
    ///
    /// `resolve` finds the endpoint for each replica named in the config.
    pub fn from_config<F>(leader: Arc<E>, config: &Config, resolve: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<Arc<E>>,
    {
        let policy = Policy::new(config)?;
        let pools = PoolSet::from_config(&config.pools, &leader, resolve);

        Ok(Self::new(leader, pools, policy))
    }

    /// Create router from the current global configuration.
    pub fn from_current<F>(leader: Arc<E>, resolve: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<Arc<E>>,
    {
        Self::from_config(leader, &config::config(), resolve)
    }

    /// Proxy for a new session.
    pub fn session(&self) -> ConnectionProxy<E> {
        ConnectionProxy::new(self.leader.clone(), self.pools.clone(), self.policy.clone())
    }

    pub fn leader(&self) -> &Arc<E> {
        &self.leader
    }

    pub fn pools(&self) -> &Arc<PoolSet<E>> {
        &self.pools
    }

    pub fn policy(&self) -> &Arc<Policy> {
        &self.policy
    }
}

//! All replica pools, by name.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::backend::Endpoint;
use crate::config::PoolConfig;

use super::Pool;

/// Name of the pool used when none is asked for.
pub const DEFAULT_POOL: &str = "default";

/// Replica pools.
///
/// Never empty: without replicas, reads are served by
/// a single `default` pool containing only the leader.
pub struct PoolSet<E> {
    pools: Vec<Arc<Pool<E>>>,
    by_name: HashMap<String, usize>,
    default: usize,
}

impl<E: Endpoint> PoolSet<E> {
    /// Create pool set from already built pools.
    pub fn new(pools: Vec<Pool<E>>, leader: &Arc<E>) -> Self {
        let mut set = Self {
            pools: vec![],
            by_name: HashMap::new(),
            default: 0,
        };

        for pool in pools {
            if set.by_name.contains_key(pool.name()) {
                warn!("duplicate pool \"{}\", ignoring", pool.name());
                continue;
            }
            set.by_name.insert(pool.name().to_owned(), set.pools.len());
            set.pools.push(Arc::new(pool));
        }

        if set.pools.is_empty() {
            info!(
                "no replica pools configured, sending reads to leader \"{}\"",
                leader.name()
            );
            set.by_name.insert(DEFAULT_POOL.to_owned(), 0);
            set.pools.push(Arc::new(Pool::single(DEFAULT_POOL, leader.clone())));
        }

        set.default = set.by_name.get(DEFAULT_POOL).copied().unwrap_or(0);

        set
    }

    /// Create pool set from configuration.
    ///
    /// `resolve` finds the endpoint for a replica name. Replicas it can't
    /// find are skipped, and so are pools left without replicas.
    pub fn from_config<F>(configs: &[PoolConfig], leader: &Arc<E>, resolve: F) -> Self
    where
        F: Fn(&str) -> Option<Arc<E>>,
    {
        let mut pools = vec![];

        for config in configs {
            let replicas = config
                .replicas
                .iter()
                .filter_map(|name| {
                    let replica = resolve(name);
                    if replica.is_none() {
                        error!(
                            "replica \"{}\" in pool \"{}\" is not available, skipping",
                            name, config.name
                        );
                    }
                    replica
                })
                .collect::<Vec<_>>();

            match Pool::new(&config.name, replicas) {
                Ok(pool) => pools.push(pool),
                Err(err) => warn!("{}, skipping", err),
            }
        }

        Self::new(pools, leader)
    }

    /// Get pool by name, falling back to the default pool.
    pub fn resolve(&self, name: &str) -> &Arc<Pool<E>> {
        match self.get(name) {
            Some(pool) => pool,
            None => {
                debug!("pool \"{}\" doesn't exist, using default", name);
                self.default_pool()
            }
        }
    }

    /// Get pool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Pool<E>>> {
        self.by_name.get(name).map(|index| &self.pools[*index])
    }

    /// The `default` pool, or the first one if there isn't one named `default`.
    pub fn default_pool(&self) -> &Arc<Pool<E>> {
        &self.pools[self.default]
    }

    /// Pool names, in configuration order.
    pub fn names(&self) -> Vec<&str> {
        self.pools.iter().map(|pool| pool.name()).collect()
    }

    /// All pools.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Pool<E>>> {
        self.pools.iter()
    }

    /// Number of pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Reset all cursors to the first replica.
    pub fn reset(&self) {
        self.pools.iter().for_each(|pool| pool.reset());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::test::{endpoints, Mock};

    fn leader() -> Arc<Mock> {
        Arc::new(Mock::new("leader"))
    }

    #[test]
    fn test_default_pool() {
        let leader = leader();
        let pools = PoolSet::new(
            vec![
                Pool::new("secondary", endpoints(&["s1", "s2"])).unwrap(),
                Pool::new("default", endpoints(&["r1"])).unwrap(),
            ],
            &leader,
        );

        assert_eq!(pools.default_pool().name(), "default");
        assert_eq!(pools.resolve("secondary").name(), "secondary");
        assert_eq!(pools.resolve("nonexistent-xyz").name(), "default");
        assert_eq!(pools.names(), vec!["secondary", "default"]);
    }

    #[test]
    fn test_first_pool_is_default() {
        let leader = leader();
        let pools = PoolSet::new(
            vec![
                Pool::new("analytics", endpoints(&["a1"])).unwrap(),
                Pool::new("secondary", endpoints(&["s1"])).unwrap(),
            ],
            &leader,
        );

        assert_eq!(pools.default_pool().name(), "analytics");
        assert_eq!(pools.resolve("").name(), "analytics");
    }

    #[test]
    fn test_leader_only() {
        let leader = leader();
        let pools = PoolSet::<Mock>::new(vec![], &leader);

        assert_eq!(pools.len(), 1);
        let pool = pools.resolve("default");
        assert_eq!(pool.name(), "default");
        assert_eq!(pool.len(), 1);
        assert!(Arc::ptr_eq(&pool.current(), &leader));
    }

    #[test]
    fn test_duplicates() {
        let leader = leader();
        let pools = PoolSet::new(
            vec![
                Pool::new("default", endpoints(&["r1"])).unwrap(),
                Pool::new("default", endpoints(&["r2"])).unwrap(),
            ],
            &leader,
        );

        assert_eq!(pools.len(), 1);
        assert_eq!(pools.default_pool().current().name(), "r1");
    }

    #[test]
    fn test_from_config() {
        let leader = leader();
        let available = endpoints(&["db1", "db2", "db3"]);
        let configs = vec![
            PoolConfig {
                name: "default".into(),
                replicas: vec!["db1".into(), "missing".into(), "db2".into()],
            },
            PoolConfig {
                name: "broken".into(),
                replicas: vec!["missing".into()],
            },
            PoolConfig {
                name: "secondary".into(),
                replicas: vec!["db3".into()],
            },
        ];

        let pools = PoolSet::from_config(&configs, &leader, |name| {
            available.iter().find(|e| e.name() == name).cloned()
        });

        assert_eq!(pools.names(), vec!["default", "secondary"]);
        assert_eq!(
            pools.resolve("default").replica_names(),
            vec!["db1", "db2"]
        );
        assert_eq!(pools.resolve("broken").name(), "default");
    }
}

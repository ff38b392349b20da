//! Per-session connection proxy.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::backend::{self, Endpoint, Param, Pool, PoolSet};

use super::{Error, LeaderGuard, Methods, PoolGuard, Policy, Safety, State, Transaction};

/// Routes one session's calls to the leader or a replica.
///
/// Safe methods go to the current endpoint: the current replica of the current pool,
/// or the leader inside a [`LeaderGuard`] scope. Everything else goes to the leader.
/// A failed call on a replica is replayed once on the leader, unless the
/// replay policy says the error should surface instead.
///
/// Not shared between sessions, get one per session from [`super::Router::session`].
pub struct ConnectionProxy<E: Endpoint> {
    leader: Arc<E>,
    pools: Arc<PoolSet<E>>,
    policy: Arc<Policy>,
    state: State<E>,
    methods: Methods,
    reconnect: bool,
    rollback: bool,
}

impl<E: Endpoint> ConnectionProxy<E> {
    /// Create new proxy.
    pub fn new(leader: Arc<E>, pools: Arc<PoolSet<E>>, policy: Arc<Policy>) -> Self {
        let state = Self::initial(&leader, &pools, &policy);
        let methods = policy.methods.clone();

        Self {
            leader,
            pools,
            policy,
            state,
            methods,
            reconnect: false,
            rollback: false,
        }
    }

    fn initial(leader: &Arc<E>, pools: &PoolSet<E>, policy: &Policy) -> State<E> {
        let pool = pools.default_pool().clone();

        if policy.defaults_to_leader {
            State::leader(leader.clone(), pool)
        } else {
            State::replica(pool)
        }
    }

    /// Go back to the state the proxy was created in.
    ///
    /// A pending rollback of an abandoned transaction is kept.
    pub fn reset(&mut self) {
        self.state = Self::initial(&self.leader, &self.pools, &self.policy);
        self.methods = self.policy.methods.clone();
        self.reconnect = false;
    }

    /// Send everything to the leader until the guard is dropped.
    ///
    /// Scopes nest; the proxy leaves leader mode when the outermost one is dropped.
    pub fn with_leader(&mut self) -> Result<LeaderGuard<'_, E>, Error> {
        if self.policy.disable_leader {
            return Err(Error::LeaderDisabled);
        }

        Ok(LeaderGuard::new(self))
    }

    /// Read from the named pool until the guard is dropped.
    ///
    /// Unknown names use the default pool. Inside a leader scope this does nothing:
    /// the leader always wins.
    pub fn with_pool(&mut self, name: &str) -> PoolGuard<'_, E> {
        PoolGuard::new(self, name)
    }

    /// Start a transaction on the leader.
    pub async fn transaction(&mut self) -> Result<Transaction<'_, E>, Error> {
        let mut guard = self.with_leader()?;
        guard.begin().await?;

        Ok(Transaction::new(guard))
    }

    /// Move to the next replica in the current pool.
    pub fn next_replica(&mut self) {
        if self.within_leader() {
            return;
        }

        self.state.current = self.state.pool.advance();
    }

    /// Execute a method on the endpoint it's routed to.
    pub async fn dispatch(&mut self, method: &str, params: &[Param]) -> Result<E::Output, Error> {
        match self.methods.classify(method) {
            Safety::Safe => {
                let current = self.state.current.clone();
                self.route_to(current, method, params).await
            }

            Safety::Unsafe => {
                self.dirty_query_cache();
                self.send_to_leader(method, params).await
            }
        }
    }

    /// Endpoint serving safe methods.
    pub fn current(&self) -> &Arc<E> {
        &self.state.current
    }

    pub fn current_endpoint_name(&self) -> &str {
        self.state.current.name()
    }

    /// Pool replicas are taken from.
    pub fn current_pool(&self) -> &Arc<Pool<E>> {
        &self.state.pool
    }

    pub fn current_pool_name(&self) -> &str {
        self.state.pool.name()
    }

    /// How many leader scopes deep we are.
    pub fn depth(&self) -> usize {
        self.state.depth
    }

    /// Inside a leader scope.
    pub fn within_leader(&self) -> bool {
        self.state.depth > 0
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

    /// Method has been classified already.
    pub fn is_resolved(&self, method: &str) -> bool {
        self.methods.resolved(method)
    }

    /// Endpoint is the leader.
    pub fn is_leader(&self, endpoint: &Arc<E>) -> bool {
        Arc::ptr_eq(endpoint, &self.leader)
    }

    /// A leader reconnect will happen before the next leader call.
    pub fn reconnect_scheduled(&self) -> bool {
        self.reconnect
    }

    /// An abandoned transaction will be rolled back before the next leader call.
    pub fn rollback_scheduled(&self) -> bool {
        self.rollback
    }

    pub(super) fn schedule_rollback(&mut self) {
        self.rollback = true;
    }

    pub(super) fn enter_leader(&mut self) -> Arc<E> {
        let saved = std::mem::replace(&mut self.state.current, self.leader.clone());
        self.state.depth += 1;
        saved
    }

    pub(super) fn leave_leader(&mut self, saved: Arc<E>) {
        self.state.depth = self.state.depth.saturating_sub(1);

        if self.state.depth == 0 {
            self.state.current = saved;
        }
    }

    pub(super) fn enter_pool(&mut self, name: &str) -> (Arc<E>, Arc<Pool<E>>) {
        let saved = (self.state.current.clone(), self.state.pool.clone());

        if !self.within_leader() {
            let pool = self.pools.resolve(name).clone();
            self.state.current = pool.current();
            self.state.pool = pool;
        }

        saved
    }

    pub(super) fn leave_pool(&mut self, current: Arc<E>, pool: Arc<Pool<E>>) {
        self.state.current = current;
        self.state.pool = pool;
    }

    #[cfg(test)]
    pub(super) fn set_depth(&mut self, depth: usize) {
        self.state.depth = depth;
    }

    pub(super) async fn begin(&mut self) -> Result<(), Error> {
        self.prepare_leader().await?;

        let leader = self.leader.clone();
        match leader.begin().await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.leader_failed(err, "begin")),
        }
    }

    pub(super) async fn finish(&mut self, commit: bool) -> Result<(), Error> {
        let leader = self.leader.clone();
        let (result, method) = if commit {
            (leader.commit().await, "commit")
        } else {
            (leader.rollback().await, "rollback")
        };

        result.map_err(|err| self.leader_failed(err, method))
    }

    async fn route_to(
        &mut self,
        endpoint: Arc<E>,
        method: &str,
        params: &[Param],
    ) -> Result<E::Output, Error> {
        // Leader-only pools and leader scopes.
        if self.is_leader(&endpoint) {
            return self.send_to_leader(method, params).await;
        }

        let err = match endpoint.execute(method, params).await {
            Ok(output) => return Ok(output),
            Err(err) => err,
        };

        self.log_error(&err, method, &endpoint);

        if self.policy.replay.forbids(&err) {
            if self.policy.verify_replica {
                if let Err(verify) = endpoint.verify().await {
                    error!("replica \"{}\" failed verification: {}", endpoint.name(), verify);
                }
            }

            return Err(Error::replica(endpoint.name(), err));
        }

        if self.policy.disable_leader {
            warn!(
                "leader is disabled, can't replay \"{}\" from replica \"{}\"",
                method,
                endpoint.name()
            );
            return Err(Error::replica(endpoint.name(), err));
        }

        warn!(
            "replaying \"{}\" from replica \"{}\" on leader \"{}\"",
            method,
            endpoint.name(),
            self.leader.name()
        );

        self.send_to_leader(method, params).await
    }

    async fn send_to_leader(&mut self, method: &str, params: &[Param]) -> Result<E::Output, Error> {
        if self.policy.disable_leader {
            return Err(Error::LeaderDisabled);
        }

        self.prepare_leader().await?;

        let leader = self.leader.clone();
        match leader.execute(method, params).await {
            Ok(output) => Ok(output),
            Err(err) => Err(self.leader_failed(err, method)),
        }
    }

    /// Leader is out of any abandoned transaction and reconnected if it failed before.
    async fn prepare_leader(&mut self) -> Result<(), Error> {
        self.rollback_abandoned().await?;
        self.reconnect_leader().await
    }

    async fn rollback_abandoned(&mut self) -> Result<(), Error> {
        if !self.rollback {
            return Ok(());
        }

        self.rollback = false;

        let leader = self.leader.clone();
        match leader.rollback().await {
            Ok(()) => {
                info!("rolled back abandoned transaction on \"{}\"", leader.name());
                Ok(())
            }

            Err(err) => Err(self.leader_failed(err, "rollback")),
        }
    }

    async fn reconnect_leader(&mut self) -> Result<(), Error> {
        if !self.reconnect {
            return Ok(());
        }

        let leader = self.leader.clone();
        match leader.reconnect().await {
            Ok(()) => {
                info!("reconnected to leader \"{}\"", leader.name());
                self.reconnect = false;
                Ok(())
            }

            Err(err) => {
                self.log_error(&err, "reconnect", &leader);
                Err(Error::leader(leader.name(), err))
            }
        }
    }

    fn leader_failed(&mut self, err: backend::Error, method: &str) -> Error {
        let leader = self.leader.clone();
        self.log_error(&err, method, &leader);

        if self.policy.reconnect_leader {
            error!(
                "error accessing leader \"{}\", scheduling reconnect",
                leader.name()
            );
            self.reconnect = true;
        }

        Error::leader(leader.name(), err)
    }

    fn log_error(&self, err: &backend::Error, method: &str, endpoint: &Arc<E>) {
        error!(
            "{} during \"{}\" on \"{}\" [leader: {}, {}, reconnect: {}, rollback: {}]",
            err,
            method,
            endpoint.name(),
            self.leader.name(),
            self.state,
            self.reconnect,
            self.rollback,
        );
    }
}

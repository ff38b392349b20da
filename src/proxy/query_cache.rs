//! Query cache, anchored on the leader.
//!
//! Cache state always lives on the leader's cache, so a query cached while reading
//! from one replica is a hit when the session later reads from another, and
//! writes (which always go to the leader) invalidate everything.

use crate::backend::{with_cache, Endpoint, Query};

use super::{ConnectionProxy, Error};

/// Method used to fetch rows.
pub const SELECT_ALL: &str = "select_all";

impl<E: Endpoint> ConnectionProxy<E> {
    /// Fetch rows, using the leader's query cache if it's enabled.
    ///
    /// The query itself runs wherever `select_all` is routed. Locked queries are never cached.
    pub async fn select_all(&mut self, query: &Query) -> Result<E::Output, Error> {
        let params = query.params();

        let cache = match self.leader().query_cache() {
            Some(cache) if cache.enabled() && !query.locked => cache,
            _ => return self.dispatch(SELECT_ALL, &params).await,
        };

        with_cache(
            cache.as_ref(),
            query.cache_key(),
            self.dispatch(SELECT_ALL, &params),
        )
        .await
    }

    /// Leader's query cache is on.
    pub fn query_cache_enabled(&self) -> bool {
        self.leader()
            .query_cache()
            .map(|cache| cache.enabled())
            .unwrap_or(false)
    }

    pub fn enable_query_cache(&self) {
        if let Some(cache) = self.leader().query_cache() {
            cache.enable();
        }
    }

    pub fn disable_query_cache(&self) {
        if let Some(cache) = self.leader().query_cache() {
            cache.disable();
        }
    }

    pub fn clear_query_cache(&self) {
        if let Some(cache) = self.leader().query_cache() {
            cache.clear();
        }
    }

    /// Writes invalidate cached reads.
    pub(super) fn dirty_query_cache(&self) {
        if let Some(cache) = self.leader().query_cache() {
            if cache.enabled() {
                cache.clear();
            }
        }
    }
}

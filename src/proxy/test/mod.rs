//! Proxy tests.

use std::sync::Arc;

use crate::backend::test::{endpoints, Mock};
use crate::backend::{Pool, PoolSet};

use super::*;

mod failover;
mod router;

/// Leader with a query cache, `default` pool with r1 and r2,
/// `secondary` pool with s1, s2 and s3.
struct Setup {
    leader: Arc<Mock>,
    default: Vec<Arc<Mock>>,
    secondary: Vec<Arc<Mock>>,
    router: Router<Mock>,
}

impl Setup {
    fn new() -> Self {
        Self::with_policy(Policy::default())
    }

    fn with_policy(policy: Policy) -> Self {
        crate::logger();

        let leader = Arc::new(Mock::with_cache("leader"));
        let default = endpoints(&["r1", "r2"]);
        let secondary = endpoints(&["s1", "s2", "s3"]);

        let pools = PoolSet::new(
            vec![
                Pool::new("default", default.clone()).unwrap(),
                Pool::new("secondary", secondary.clone()).unwrap(),
            ],
            &leader,
        );

        Self {
            router: Router::new(leader.clone(), pools, policy),
            leader,
            default,
            secondary,
        }
    }

    fn proxy(&self) -> ConnectionProxy<Mock> {
        self.router.session()
    }

    /// Calls made to any replica.
    fn replica_calls(&self) -> usize {
        self.default
            .iter()
            .chain(self.secondary.iter())
            .map(|replica| replica.total())
            .sum()
    }
}

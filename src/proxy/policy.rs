//! Routing policy shared by all sessions.

use crate::config::{Config, Error};

use super::{Methods, ReplayPolicy};

/// [`Config`] compiled for routing.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Sessions start in leader mode.
    pub defaults_to_leader: bool,
    /// Leader can't be used.
    pub disable_leader: bool,
    /// Reconnect the leader after it errors.
    pub reconnect_leader: bool,
    /// Verify replicas after errors that aren't replayed.
    pub verify_replica: bool,
    /// Safe methods.
    pub methods: Methods,
    /// Errors not replayed on the leader.
    pub replay: ReplayPolicy,
}

impl Policy {
    /// Compile routing policy.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let replay = ReplayPolicy::new(&config.no_replay)?;
        Ok(Self::with_replay(config, replay))
    }

    /// Routing policy with already compiled replay rules.
    pub fn with_replay(config: &Config, replay: ReplayPolicy) -> Self {
        let general = &config.general;

        Self {
            defaults_to_leader: general.defaults_to_leader,
            disable_leader: general.disable_leader,
            reconnect_leader: general.reconnect_leader,
            verify_replica: general.verify_replica,
            methods: Methods::new(&general.safe_methods),
            replay,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::with_replay(&Config::default(), ReplayPolicy::timeouts())
    }
}

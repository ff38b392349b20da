//! Configuration.

pub mod error;

pub use error::Error;

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::ErrorKind;

static CONFIG: Lazy<ArcSwap<Config>> = Lazy::new(|| ArcSwap::from_pointee(Config::default()));

/// Current configuration.
pub fn config() -> Arc<Config> {
    CONFIG.load().clone()
}

/// Replace the current configuration.
pub fn set(config: Config) -> Arc<Config> {
    let config = Arc::new(config);
    CONFIG.store(config.clone());
    config
}

/// Load the configuration file from disk and make it current.
pub fn load(path: impl AsRef<Path>) -> Result<Arc<Config>, Error> {
    let config = Config::load(path)?;
    Ok(set(config))
}

/// replica_pools.toml
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Routing policy.
    #[serde(default)]
    pub general: General,
    /// Replica pools.
    #[serde(default)]
    pub pools: Vec<PoolConfig>,
    /// Errors that must not be replayed on the leader.
    #[serde(default = "Config::no_replay")]
    pub no_replay: Vec<NoReplay>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: General::default(),
            pools: vec![],
            no_replay: Self::no_replay(),
        }
    }
}

impl Config {
    /// Load configuration from disk or use defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let config = match read_to_string(path) {
            Ok(source) => {
                let config = Self::from_toml(&source)?;
                info!("loaded \"{}\"", path.display());
                config
            }

            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "\"{}\" doesn't exist, loading defaults instead",
                    path.display()
                );
                Self::default()
            }

            Err(err) => return Err(err.into()),
        };

        config.check();

        Ok(config)
    }

    /// Parse configuration from TOML.
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        toml::from_str(source).map_err(|err| Error::config(source, err))
    }

    /// Warn about settings that are legal but probably wrong.
    pub fn check(&self) {
        let mut names = HashSet::new();
        for pool in &self.pools {
            if !names.insert(pool.name.as_str()) {
                warn!("pool \"{}\" is configured more than once", pool.name);
            }

            if pool.replicas.is_empty() {
                warn!("pool \"{}\" has no replicas", pool.name);
            }
        }

        for rule in &self.no_replay {
            if rule.kinds.is_empty() && rule.messages.is_empty() {
                match rule.class {
                    Some(ref class) => warn!("no_replay matches every \"{}\" error", class),
                    None => warn!(
                        "no_replay matches every error, replicas will never fall back to the leader"
                    ),
                }
            }
        }

        if self.general.defaults_to_leader && self.general.disable_leader {
            warn!("defaults_to_leader is set but the leader is disabled");
        }
    }

    fn no_replay() -> Vec<NoReplay> {
        vec![NoReplay {
            class: None,
            kinds: vec![ErrorKind::Timeout],
            messages: vec![],
        }]
    }
}

/// Routing policy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct General {
    /// Sessions start inside a leader scope, so everything goes to the leader.
    /// `with_pool` doesn't switch to a replica in this mode.
    #[serde(default)]
    pub defaults_to_leader: bool,
    /// Refuse to use the leader at all.
    #[serde(default)]
    pub disable_leader: bool,
    /// Reconnect to the leader before the next call after it errors.
    #[serde(default = "General::reconnect_leader")]
    pub reconnect_leader: bool,
    /// Verify a replica's connection after an error that isn't replayed.
    #[serde(default = "General::verify_replica")]
    pub verify_replica: bool,
    /// Methods that can run on a replica.
    #[serde(default = "General::safe_methods")]
    pub safe_methods: Vec<String>,
}

impl Default for General {
    fn default() -> Self {
        Self {
            defaults_to_leader: false,
            disable_leader: false,
            reconnect_leader: Self::reconnect_leader(),
            verify_replica: Self::verify_replica(),
            safe_methods: Self::safe_methods(),
        }
    }
}

impl General {
    fn reconnect_leader() -> bool {
        true
    }

    fn verify_replica() -> bool {
        true
    }

    fn safe_methods() -> Vec<String> {
        [
            "active",
            "cacheable_query",
            "case_insensitive_comparison",
            "case_sensitive_comparison",
            "clear_cache",
            "column_name_for_operation",
            "combine_bind_parameters",
            "disconnect",
            "log",
            "lookup_cast_type_from_column",
            "prepared_statements",
            "quote",
            "quote_column_names",
            "quote_table_name",
            "quote_table_names",
            "raw_connection",
            "reconnect",
            "reset_runtime",
            "sanitize_limit",
            "schema_cache",
            "select",
            "select_all",
            "select_one",
            "select_prepared",
            "select_rows",
            "select_value",
            "select_values",
            "table_alias_for",
            "verify",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

/// Replica pool.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Pool name, e.g. `default`.
    pub name: String,
    /// Replica names, resolved to endpoints by the application.
    #[serde(default)]
    pub replicas: Vec<String>,
}

/// Replica errors that are raised instead of replayed on the leader.
///
/// Matches when `class` (if set) equals the error class and either the error kind
/// is in `kinds` or the message matches one of the `messages` regexes. Without
/// `kinds` and `messages`, every error of `class` matches.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct NoReplay {
    /// Driver error class.
    #[serde(default)]
    pub class: Option<String>,
    /// Error kinds, as classified by the driver.
    #[serde(default)]
    pub kinds: Vec<ErrorKind>,
    /// Regexes matched against the error message.
    #[serde(default)]
    pub messages: Vec<String>,
}

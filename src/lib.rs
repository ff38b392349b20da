//! Route database calls between a leader and pools of read replicas.
//!
//! Writes, transactions and anything inside a [`proxy::LeaderGuard`] scope go to the
//! leader. Safe (read-only) calls go to the current replica of the current pool,
//! which callers can move with [`proxy::ConnectionProxy::next_replica`] and
//! [`proxy::ConnectionProxy::with_pool`].

pub mod backend;
pub mod config;
pub mod proxy;

pub use backend::{Endpoint, Param, Query};
pub use proxy::{ConnectionProxy, Error, Router};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use std::io::IsTerminal;

/// Setup the logger, so `info!`, `debug!`
/// and other macros actually output something.
///
/// Using try_init and ignoring errors to allow
/// for use in tests (setting up multiple times).
pub fn logger() {
    let format = fmt::layer()
        .with_ansi(std::io::stderr().is_terminal())
        .with_file(false);
    #[cfg(not(debug_assertions))]
    let format = format.with_target(false);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .try_init();
}

//! Leader transaction.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::backend::Endpoint;

use super::{ConnectionProxy, Error, LeaderGuard};

/// Transaction on the leader, see [`ConnectionProxy::transaction`].
///
/// Every call made through it goes to the leader. Dropping it without
/// calling [`Transaction::commit`] rolls it back: the rollback runs on the
/// leader before anything else the session sends there.
pub struct Transaction<'a, E: Endpoint> {
    guard: LeaderGuard<'a, E>,
    finished: bool,
}

impl<'a, E: Endpoint> Transaction<'a, E> {
    pub(super) fn new(guard: LeaderGuard<'a, E>) -> Self {
        Self {
            guard,
            finished: false,
        }
    }

    /// Commit the transaction.
    pub async fn commit(mut self) -> Result<(), Error> {
        self.finished = true;
        self.guard.finish(true).await
    }

    /// Rollback the transaction.
    pub async fn rollback(mut self) -> Result<(), Error> {
        self.finished = true;
        self.guard.finish(false).await
    }
}

impl<E: Endpoint> Deref for Transaction<'_, E> {
    type Target = ConnectionProxy<E>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<E: Endpoint> DerefMut for Transaction<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<E: Endpoint> Drop for Transaction<'_, E> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        warn!(
            "transaction on \"{}\" dropped without commit, rollback scheduled",
            self.guard.leader().name()
        );

        self.guard.schedule_rollback();
    }
}

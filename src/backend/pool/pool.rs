//! Round-robin pool of replicas.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::Error;

/// Named set of replicas, cycled round robin.
///
/// The cursor is shared by every session using the pool.
pub struct Pool<E> {
    name: String,
    replicas: Vec<Arc<E>>,
    cursor: AtomicUsize,
}

impl<E> Pool<E> {
    /// Create new pool. Must have at least one replica.
    pub fn new(name: impl ToString, replicas: Vec<Arc<E>>) -> Result<Self, Error> {
        let name = name.to_string();
        if replicas.is_empty() {
            return Err(Error::Empty(name));
        }

        Ok(Self::new_unchecked(name, replicas))
    }

    /// Pool that serves only this one endpoint.
    pub(super) fn single(name: impl ToString, endpoint: Arc<E>) -> Self {
        Self::new_unchecked(name.to_string(), vec![endpoint])
    }

    fn new_unchecked(name: String, replicas: Vec<Arc<E>>) -> Self {
        Self {
            name,
            replicas,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Replica at the cursor.
    pub fn current(&self) -> Arc<E> {
        self.replicas[self.cursor()].clone()
    }

    /// Move the cursor to the next replica and return it.
    pub fn advance(&self) -> Arc<E> {
        let len = self.replicas.len();

        // Nothing to cycle through.
        if len == 1 {
            return self.replicas[0].clone();
        }

        let previous = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cursor| {
                Some((cursor + 1) % len)
            })
            .unwrap_or_else(|cursor| cursor);

        self.replicas[(previous + 1) % len].clone()
    }

    /// Go back to the first replica.
    pub fn reset(&self) {
        self.cursor.store(0, Ordering::Release);
    }

    /// Pool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pool members.
    pub fn replicas(&self) -> &[Arc<E>] {
        &self.replicas
    }

    /// Position of the current replica.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Number of replicas.
    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }
}

impl<E: crate::backend::Endpoint> Pool<E> {
    /// Names of the replicas, in order.
    pub fn replica_names(&self) -> Vec<&str> {
        self.replicas.iter().map(|r| r.name()).collect()
    }
}

impl<E: crate::backend::Endpoint> fmt::Display for Pool<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.replica_names().join(", "))
    }
}

impl<E> fmt::Debug for Pool<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name)
            .field("replicas", &self.replicas.len())
            .field("cursor", &self.cursor())
            .finish()
    }
}

//! Safe/unsafe method classification.

use std::collections::HashMap;

/// Where a method is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    /// Can run on a replica.
    Safe,
    /// Must run on the leader.
    Unsafe,
}

/// Method name to [`Safety`] table.
///
/// Seeded with the safe methods; anything else is unsafe
/// and remembered the first time it's seen.
#[derive(Debug, Clone, Default)]
pub struct Methods {
    table: HashMap<String, Safety>,
}

impl Methods {
    /// Create table from the list of safe methods.
    pub fn new<S: AsRef<str>>(safe: &[S]) -> Self {
        Self {
            table: safe
                .iter()
                .map(|method| (method.as_ref().to_owned(), Safety::Safe))
                .collect(),
        }
    }

    /// Classify a method, remembering the answer.
    pub fn classify(&mut self, method: &str) -> Safety {
        if let Some(safety) = self.table.get(method) {
            return *safety;
        }

        self.table.insert(method.to_owned(), Safety::Unsafe);
        Safety::Unsafe
    }

    /// Method has been classified.
    pub fn resolved(&self, method: &str) -> bool {
        self.table.contains_key(method)
    }

    /// Method is known to be safe.
    pub fn safe(&self, method: &str) -> bool {
        self.table.get(method) == Some(&Safety::Safe)
    }

    /// Number of classified methods.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

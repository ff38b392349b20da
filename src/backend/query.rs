//! Read query.

use super::Param;

/// Cache key: the SQL text and its binds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub sql: String,
    pub binds: Vec<Param>,
}

/// A `SELECT` and everything needed to run or cache it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// SQL text.
    pub sql: String,
    /// Bind parameters.
    pub binds: Vec<Param>,
    /// Name used by the driver's logger.
    pub name: Option<String>,
    /// `SELECT ... FOR UPDATE` and friends.
    pub locked: bool,
}

impl Query {
    /// New unlocked query without binds.
    pub fn new(sql: impl ToString) -> Self {
        Self {
            sql: sql.to_string(),
            ..Default::default()
        }
    }

    /// Add bind parameters.
    pub fn binds(mut self, binds: impl IntoIterator<Item = Param>) -> Self {
        self.binds.extend(binds);
        self
    }

    /// Name the query.
    pub fn named(mut self, name: impl ToString) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Mark the query as taking row locks.
    pub fn lock(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Cache key, independent of where the query runs.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            sql: self.sql.clone(),
            binds: self.binds.clone(),
        }
    }

    /// Parameters passed to the endpoint: SQL, name, then binds.
    pub fn params(&self) -> Vec<Param> {
        let mut params = Vec::with_capacity(self.binds.len() + 2);
        params.push(Param::Text(self.sql.clone()));
        params.push(self.name.clone().into());
        params.extend(self.binds.iter().cloned());
        params
    }
}

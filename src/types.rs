//! Identifier newtypes shared across the dashboard core
//!
//! Order and barista ids are assigned by the backend and treated as opaque
//! integers on this side.

use serde::{Deserialize, Serialize};

/// Unique identifier for an order, assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Wrap a raw backend id
    #[must_use]
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying id
    #[must_use]
    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a barista (staff member)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaristaId(i64);

impl BaristaId {
    /// Wrap a raw backend id
    #[must_use]
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying id
    #[must_use]
    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for BaristaId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BaristaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Typed record id wrappers for compile-time type safety.
//!
//! This module provides `Id<T>`, a typed wrapper around the storage layer's
//! numeric keys that prevents accidentally mixing up different id types
//! (e.g., passing a `FormatId` where a `SubmissionId` was expected).
//!
//! # Example
//!
//! ```rust
//! use server_core::common::{FormatId, SubmissionId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let format_id = FormatId::from_i64(1);
//! let submission_id = SubmissionId::from_i64(1);
//!
//! // This would be a compile error:
//! // let wrong: SubmissionId = format_id;
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

/// A typed wrapper around an `i64` record key.
///
/// The type parameter `T` represents the entity type this id belongs to.
/// Keys are assigned by the storage backend (BIGSERIAL in Postgres, an
/// atomic counter in the in-memory store), so there is no `new()` here.
#[repr(transparent)]
pub struct Id<T>(i64, PhantomData<fn() -> T>);

impl<T> Id<T> {
    /// Creates an `Id` from a raw key, as loaded from storage.
    #[inline]
    pub fn from_i64(raw: i64) -> Self {
        Self(raw, PhantomData)
    }

    /// Returns the inner key.
    #[inline]
    pub fn into_i64(self) -> i64 {
        self.0
    }

    /// Parses an `Id` from a string (route parameters, client input).
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(i64::from_str(s)?, PhantomData))
    }
}

// Manual impls: derives would put unwanted bounds on `T`.

impl<T> Clone for Id<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(i64::deserialize(deserializer)?, PhantomData))
    }
}

//! Record identifiers
//!
//! A [`TypedUuid`] is a plain UUID tagged with the record it identifies, so a product
//! id cannot be passed where a cart id is expected.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use uuid::Uuid;

/// UUID of a `R` record.
pub struct TypedUuid<R> {
    uuid: Uuid,
    record: PhantomData<fn() -> R>,
}

impl<R> TypedUuid<R> {
    /// Generate a fresh time-ordered identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            record: PhantomData,
        }
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.uuid
    }

    /// Borrow the untyped identifier, e.g. for binding into a query.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.uuid
    }
}

impl<R> Default for TypedUuid<R> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls: derives would demand the same traits of `R`.

impl<R> Clone for TypedUuid<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for TypedUuid<R> {}

impl<R> PartialEq for TypedUuid<R> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<R> Eq for TypedUuid<R> {}

impl<R> PartialOrd for TypedUuid<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> Ord for TypedUuid<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid.cmp(&other.uuid)
    }
}

impl<R> Hash for TypedUuid<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<R> fmt::Debug for TypedUuid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.uuid, f)
    }
}

impl<R> fmt::Display for TypedUuid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uuid, f)
    }
}

impl<R> FromStr for TypedUuid<R> {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self::from_uuid)
    }
}

impl<R> From<Uuid> for TypedUuid<R> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<R> From<TypedUuid<R>> for Uuid {
    fn from(id: TypedUuid<R>) -> Self {
        id.into_uuid()
    }
}

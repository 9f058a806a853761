//! Repository contracts
//!
//! A repository is generic over the entity it stores. Entities describe
//! themselves through [`Entity`]: a surrogate id, a natural key that must be
//! unique, a parent used to scope listings, and any further unique
//! constraints. Implementations must enforce every uniqueness rule at write
//! time so that concurrent creates resolve to one winner.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::page::{Page, PageRequest};

/// A named unique constraint value beyond the natural key.
///
/// Two rows of the same entity may not share a `(name, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueConstraint {
    /// Constraint name, reported back on violation.
    pub name: &'static str,
    /// Scoped value, e.g. `"COLLECTION:4"`.
    pub value: String,
}

impl UniqueConstraint {
    /// Create a constraint value.
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// A persistable entity.
pub trait Entity: Debug + Clone + Serialize + Send + Sync + 'static {
    /// Natural key, unique across all rows.
    type Key: Debug + Clone + Eq + Hash + Send + Sync;

    /// Scope used by parent listings (tenant, resource type, folder...).
    type Parent: Debug + Clone + PartialEq + Send + Sync;

    /// Entity name used in errors and logs.
    const NAME: &'static str;

    /// Surrogate identifier.
    fn id(&self) -> Uuid;

    /// Natural key of this row.
    fn key(&self) -> Self::Key;

    /// Listing scope of this row.
    fn parent(&self) -> Self::Parent;

    /// Extra unique constraints. Defaults to none.
    fn unique_constraints(&self) -> Vec<UniqueConstraint> {
        Vec::new()
    }
}

/// Async repository over one entity type.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Look up by surrogate id.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<E>>;

    /// Look up by natural key.
    async fn find_by_key(&self, key: &E::Key) -> StoreResult<Option<E>>;

    /// All rows under a parent, in insertion order.
    async fn find_by_parent(&self, parent: &E::Parent) -> StoreResult<Vec<E>>;

    /// One page of rows under a parent.
    async fn find_page_by_parent(
        &self,
        parent: &E::Parent,
        request: &PageRequest,
    ) -> StoreResult<Page<E>>;

    /// Every row, in insertion order.
    async fn find_all(&self) -> StoreResult<Vec<E>>;

    /// Insert a new row.
    ///
    /// Fails with `UniqueViolation` if the id, natural key, or any unique
    /// constraint is already taken.
    async fn insert(&self, entity: E) -> StoreResult<E>;

    /// Replace an existing row (matched by id).
    ///
    /// Fails with `NotFound` if the id is absent and with `UniqueViolation`
    /// if the new values collide with another row.
    async fn update(&self, entity: E) -> StoreResult<E>;

    /// Delete a row by id. Fails with `NotFound` if absent.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Whether a row with the natural key exists.
    async fn exists_by_key(&self, key: &E::Key) -> StoreResult<bool> {
        Ok(self.find_by_key(key).await?.is_some())
    }
}

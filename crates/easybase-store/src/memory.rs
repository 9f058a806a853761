//! In-memory repository implementation.
//!
//! Suitable for single-process deployments and testing. All writes take a
//! single write lock, so uniqueness checks and the write itself are atomic
//! with respect to each other.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::page::{Direction, Page, PageRequest, Sort};
use crate::repository::{Entity, Repository, UniqueConstraint};

/// Name reported when the natural key collides.
const NATURAL_KEY: &str = "natural_key";

/// Name reported when the surrogate id collides.
const PRIMARY_KEY: &str = "primary_key";

struct MemoryState<E: Entity> {
    /// Rows by insertion sequence.
    rows: BTreeMap<u64, E>,
    /// Surrogate id to sequence.
    ids: HashMap<Uuid, u64>,
    /// Natural key to surrogate id.
    keys: HashMap<E::Key, Uuid>,
    /// Extra unique constraints to surrogate id.
    constraints: HashMap<UniqueConstraint, Uuid>,
    next_seq: u64,
}

impl<E: Entity> MemoryState<E> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            ids: HashMap::new(),
            keys: HashMap::new(),
            constraints: HashMap::new(),
            next_seq: 0,
        }
    }

    fn get(&self, id: Uuid) -> Option<&E> {
        self.ids.get(&id).and_then(|seq| self.rows.get(seq))
    }

    /// Check that `entity` may be written without clashing with a row other
    /// than itself.
    fn check_unique(&self, entity: &E) -> StoreResult<()> {
        let id = entity.id();

        if let Some(owner) = self.keys.get(&entity.key()) {
            if *owner != id {
                return Err(violation::<E>(NATURAL_KEY));
            }
        }

        for constraint in entity.unique_constraints() {
            if let Some(owner) = self.constraints.get(&constraint) {
                if *owner != id {
                    return Err(violation::<E>(constraint.name));
                }
            }
        }

        Ok(())
    }

    fn index(&mut self, entity: &E) {
        let id = entity.id();
        self.keys.insert(entity.key(), id);
        for constraint in entity.unique_constraints() {
            self.constraints.insert(constraint, id);
        }
    }

    fn unindex(&mut self, entity: &E) {
        self.keys.remove(&entity.key());
        for constraint in entity.unique_constraints() {
            self.constraints.remove(&constraint);
        }
    }
}

fn violation<E: Entity>(constraint: &str) -> StoreError {
    tracing::debug!(entity = E::NAME, constraint, "Unique constraint violated");
    StoreError::UniqueViolation {
        entity: E::NAME,
        constraint: constraint.to_string(),
    }
}

/// In-memory repository.
///
/// Cloning is cheap and clones share the same rows.
pub struct MemoryRepository<E: Entity> {
    state: Arc<RwLock<MemoryState<E>>>,
}

impl<E: Entity> Clone for MemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: Entity> std::fmt::Debug for MemoryRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("entity", &E::NAME)
            .finish()
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryRepository<E> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::new())),
        }
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    /// Whether the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.rows.is_empty()
    }
}

/// Order rows by a serialized property. Rows missing the property sort
/// first; ties keep insertion order.
fn sort_rows<E: Entity>(rows: &mut [E], sort: &Sort) {
    let mut keyed: Vec<(Value, E)> = rows
        .iter()
        .map(|row| {
            let value = serde_json::to_value(row)
                .ok()
                .and_then(|v| v.get(&sort.property).cloned())
                .unwrap_or(Value::Null);
            (value, row.clone())
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_values(a, b);
        match sort.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    });

    for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
        *slot = row;
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x.cmp(&y);
            }
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x.cmp(&y);
            }
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // Mixed or structured values compare by their JSON text
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<E>> {
        Ok(self.state.read().await.get(id).cloned())
    }

    async fn find_by_key(&self, key: &E::Key) -> StoreResult<Option<E>> {
        let state = self.state.read().await;
        Ok(state.keys.get(key).and_then(|id| state.get(*id)).cloned())
    }

    async fn find_by_parent(&self, parent: &E::Parent) -> StoreResult<Vec<E>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|row| row.parent() == *parent)
            .cloned()
            .collect())
    }

    async fn find_page_by_parent(
        &self,
        parent: &E::Parent,
        request: &PageRequest,
    ) -> StoreResult<Page<E>> {
        let mut rows = self.find_by_parent(parent).await?;
        if let Some(sort) = &request.sort {
            sort_rows(&mut rows, sort);
        }
        Ok(request.paginate(rows))
    }

    async fn find_all(&self) -> StoreResult<Vec<E>> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn insert(&self, entity: E) -> StoreResult<E> {
        let mut state = self.state.write().await;

        if state.ids.contains_key(&entity.id()) {
            return Err(violation::<E>(PRIMARY_KEY));
        }
        state.check_unique(&entity)?;

        let seq = state.next_seq;
        state.next_seq += 1;
        state.index(&entity);
        state.ids.insert(entity.id(), seq);
        state.rows.insert(seq, entity.clone());

        Ok(entity)
    }

    async fn update(&self, entity: E) -> StoreResult<E> {
        let mut state = self.state.write().await;

        let id = entity.id();
        let seq = *state.ids.get(&id).ok_or_else(|| StoreError::NotFound {
            entity: E::NAME,
            id: id.to_string(),
        })?;
        state.check_unique(&entity)?;

        if let Some(previous) = state.rows.get(&seq).cloned() {
            state.unindex(&previous);
        }
        state.index(&entity);
        state.rows.insert(seq, entity.clone());

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;

        let seq = state.ids.remove(&id).ok_or_else(|| StoreError::NotFound {
            entity: E::NAME,
            id: id.to_string(),
        })?;
        if let Some(previous) = state.rows.remove(&seq) {
            state.unindex(&previous);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize, PartialEq)]
    struct Widget {
        id: Uuid,
        owner: u32,
        name: String,
        slot: u32,
    }

    impl Widget {
        fn new(owner: u32, name: &str, slot: u32) -> Self {
            Self {
                id: Uuid::now_v7(),
                owner,
                name: name.to_string(),
                slot,
            }
        }
    }

    impl Entity for Widget {
        type Key = (u32, String);
        type Parent = u32;
        const NAME: &'static str = "Widget";

        fn id(&self) -> Uuid {
            self.id
        }

        fn key(&self) -> Self::Key {
            (self.owner, self.name.clone())
        }

        fn parent(&self) -> Self::Parent {
            self.owner
        }

        fn unique_constraints(&self) -> Vec<UniqueConstraint> {
            vec![UniqueConstraint::new(
                "widget_slot",
                format!("{}:{}", self.owner, self.slot),
            )]
        }
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        // Both round to the same f64
        let low = Value::from((1u64 << 60) + 1);
        let high = Value::from((1u64 << 60) + 2);
        assert_eq!(compare_values(&low, &high), Ordering::Less);
        assert_eq!(compare_values(&high, &low), Ordering::Greater);

        assert_eq!(compare_values(&Value::from(-3i64), &Value::from(2u64)), Ordering::Less);
        assert_eq!(compare_values(&Value::from(1.5), &Value::from(2u64)), Ordering::Less);
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repo = MemoryRepository::new();
        let widget = repo.insert(Widget::new(1, "gear", 1)).await.unwrap();

        let by_id = repo.find_by_id(widget.id).await.unwrap();
        assert_eq!(by_id, Some(widget.clone()));

        let by_key = repo.find_by_key(&(1, "gear".to_string())).await.unwrap();
        assert_eq!(by_key, Some(widget));

        assert!(!repo.exists_by_key(&(2, "gear".to_string())).await.unwrap());
    }

    #[tokio::test]
    async fn test_natural_key_violation() {
        let repo = MemoryRepository::new();
        repo.insert(Widget::new(1, "gear", 1)).await.unwrap();

        let err = repo.insert(Widget::new(1, "gear", 2)).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueViolation {
                entity: "Widget",
                constraint: "natural_key".to_string(),
            }
        );

        // Same name under another owner is fine
        repo.insert(Widget::new(2, "gear", 1)).await.unwrap();
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_extra_constraint_violation() {
        let repo = MemoryRepository::new();
        repo.insert(Widget::new(1, "gear", 1)).await.unwrap();

        let err = repo.insert(Widget::new(1, "cog", 1)).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert!(err.to_string().contains("widget_slot"));
    }

    #[tokio::test]
    async fn test_update_reindexes() {
        let repo = MemoryRepository::new();
        let mut widget = repo.insert(Widget::new(1, "gear", 1)).await.unwrap();

        widget.name = "sprocket".to_string();
        repo.update(widget.clone()).await.unwrap();

        assert!(repo.find_by_key(&(1, "gear".to_string())).await.unwrap().is_none());
        assert!(repo.find_by_key(&(1, "sprocket".to_string())).await.unwrap().is_some());

        // The old name is free again
        repo.insert(Widget::new(1, "gear", 2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_collision_and_missing() {
        let repo = MemoryRepository::new();
        repo.insert(Widget::new(1, "gear", 1)).await.unwrap();
        let mut other = repo.insert(Widget::new(1, "cog", 2)).await.unwrap();

        other.slot = 1;
        assert!(repo.update(other).await.unwrap_err().is_unique_violation());

        let ghost = Widget::new(1, "ghost", 9);
        assert!(matches!(
            repo.update(ghost).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_frees_keys() {
        let repo = MemoryRepository::new();
        let widget = repo.insert(Widget::new(1, "gear", 1)).await.unwrap();

        repo.delete(widget.id).await.unwrap();
        assert!(repo.is_empty().await);
        assert!(matches!(
            repo.delete(widget.id).await,
            Err(StoreError::NotFound { .. })
        ));

        repo.insert(Widget::new(1, "gear", 1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_page_by_parent_sorted() {
        let repo = MemoryRepository::new();
        for (name, slot) in [("c", 3), ("a", 1), ("b", 2)] {
            repo.insert(Widget::new(7, name, slot)).await.unwrap();
        }
        repo.insert(Widget::new(8, "z", 1)).await.unwrap();

        let unsorted = repo
            .find_page_by_parent(&7, &PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = unsorted.content.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(unsorted.total_elements, 3);

        let request = PageRequest::new(0, 2).with_sort(Sort::desc("slot"));
        let page = repo.find_page_by_parent(&7, &request).await.unwrap();
        let slots: Vec<_> = page.content.iter().map(|w| w.slot).collect();
        assert_eq!(slots, vec![3, 2]);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_single_winner() {
        let repo = MemoryRepository::new();
        let mut handles = Vec::new();
        for slot in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.insert(Widget::new(1, "contended", slot)).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}

//! Resource action local service
//!
//! Business logic and repository access for the resource action registry.
//! Performs no permission checks; callers must already be authorized (see
//! [`crate::service::ResourceActionService`]).
//!
//! A service built with [`ResourceActionLocalService::with_catalog`] mirrors
//! every registry write into a [`RoleMaskEvaluator`] catalog, so a
//! deactivated or deleted row stops granting access on the next check.

use chrono::Utc;
use easybase_rbac::{default_actions, validate_bit_value, ResourceAction, RoleMaskEvaluator};
use easybase_store::{Entity, MemoryRepository, Repository};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Unguarded resource action operations.
#[derive(Clone)]
pub struct ResourceActionLocalService {
    repository: Arc<dyn Repository<ResourceAction>>,
    catalog: Option<Arc<RoleMaskEvaluator>>,
}

impl std::fmt::Debug for ResourceActionLocalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceActionLocalService")
            .field("catalog", &self.catalog.is_some())
            .finish_non_exhaustive()
    }
}

impl ResourceActionLocalService {
    /// Create a service over a repository.
    pub fn new(repository: Arc<dyn Repository<ResourceAction>>) -> Self {
        Self {
            repository,
            catalog: None,
        }
    }

    /// Create a service backed by an in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRepository::<ResourceAction>::new()))
    }

    /// Keep `evaluator`'s action catalog in step with this registry.
    ///
    /// Only writes made after this call are mirrored; call
    /// [`Self::sync_catalog`] to load rows that already exist.
    pub fn with_catalog(mut self, evaluator: Arc<RoleMaskEvaluator>) -> Self {
        self.catalog = Some(evaluator);
        self
    }

    /// Load every registry row, active or not, into the attached catalog.
    ///
    /// Returns the number of rows loaded; zero when no catalog is attached.
    pub async fn sync_catalog(&self) -> ServiceResult<usize> {
        let Some(catalog) = &self.catalog else {
            return Ok(0);
        };
        let actions = self.repository.find_all().await?;
        let count = actions.len();
        catalog.load_actions(actions).await;
        debug!(count, "Action catalog synced from registry");
        Ok(count)
    }

    async fn mirror(&self, action: &ResourceAction) {
        if let Some(catalog) = &self.catalog {
            catalog.register_action(action).await;
        }
    }

    /// Register a new action.
    ///
    /// # Errors
    ///
    /// - `Validation` if a key is blank or the bit is not a single bit
    /// - `Conflict` if `(resource_type, action_key)` or
    ///   `(resource_type, bit_value)` is already registered
    #[instrument(skip(self, action_name, description))]
    pub async fn create_resource_action(
        &self,
        resource_type: &str,
        action_key: &str,
        action_name: &str,
        bit_value: u64,
        description: &str,
    ) -> ServiceResult<ResourceAction> {
        if resource_type.trim().is_empty() {
            return Err(ServiceError::Validation("resource type must not be blank".into()));
        }
        if action_key.trim().is_empty() {
            return Err(ServiceError::Validation("action key must not be blank".into()));
        }
        validate_bit_value(bit_value).map_err(ServiceError::Validation)?;

        let key = (resource_type.to_string(), action_key.to_string());
        if self.repository.exists_by_key(&key).await? {
            return Err(ServiceError::conflict(
                ResourceAction::NAME,
                format!("{}:{}", resource_type, action_key),
            ));
        }

        let siblings = self.repository.find_by_parent(&resource_type.to_string()).await?;
        if let Some(holder) = siblings.iter().find(|a| a.bit_value == bit_value) {
            return Err(ServiceError::conflict(
                ResourceAction::NAME,
                format!(
                    "{} bit {} (held by {})",
                    resource_type, bit_value, holder.action_key
                ),
            ));
        }

        let action = ResourceAction::new(
            resource_type,
            action_key,
            action_name,
            bit_value,
            description,
        );
        // A concurrent create can still win between the checks and here; the
        // repository's unique constraints turn that into Conflict.
        let action = self.repository.insert(action).await?;
        self.mirror(&action).await;

        info!(
            action_id = %action.id,
            permission = %action.permission_key(),
            bit_value,
            "Resource action created"
        );
        Ok(action)
    }

    /// Look up by natural key.
    pub async fn get_resource_action(
        &self,
        resource_type: &str,
        action_key: &str,
    ) -> ServiceResult<ResourceAction> {
        debug!("Fetching resource action {}:{}", resource_type, action_key);
        self.repository
            .find_by_key(&(resource_type.to_string(), action_key.to_string()))
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(
                    ResourceAction::NAME,
                    format!("{}:{}", resource_type, action_key),
                )
            })
    }

    /// Look up by id.
    pub async fn get_resource_action_by_id(&self, action_id: Uuid) -> ServiceResult<ResourceAction> {
        debug!("Fetching resource action {}", action_id);
        self.repository
            .find_by_id(action_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ResourceAction::NAME, action_id))
    }

    /// All actions of a resource type, active or not.
    pub async fn get_resource_actions(&self, resource_type: &str) -> ServiceResult<Vec<ResourceAction>> {
        Ok(self
            .repository
            .find_by_parent(&resource_type.to_string())
            .await?)
    }

    /// Active actions of a resource type.
    pub async fn get_active_resource_actions(
        &self,
        resource_type: &str,
    ) -> ServiceResult<Vec<ResourceAction>> {
        let mut actions = self.get_resource_actions(resource_type).await?;
        actions.retain(|a| a.active);
        Ok(actions)
    }

    /// Active actions across every resource type.
    pub async fn get_all_active_resource_actions(&self) -> ServiceResult<Vec<ResourceAction>> {
        let mut actions = self.repository.find_all().await?;
        actions.retain(|a| a.active);
        Ok(actions)
    }

    /// All actions of a resource type ordered by ascending bit value.
    ///
    /// Includes inactive actions so masks always render the same labels.
    pub async fn get_resource_actions_ordered(
        &self,
        resource_type: &str,
    ) -> ServiceResult<Vec<ResourceAction>> {
        let mut actions = self.get_resource_actions(resource_type).await?;
        actions.sort_by_key(|a| a.bit_value);
        Ok(actions)
    }

    /// Whether `(resource_type, action_key)` is registered.
    pub async fn resource_action_exists(
        &self,
        resource_type: &str,
        action_key: &str,
    ) -> ServiceResult<bool> {
        Ok(self
            .repository
            .exists_by_key(&(resource_type.to_string(), action_key.to_string()))
            .await?)
    }

    /// Update the mutable fields of an action.
    ///
    /// The bit and `(resource_type, action_key)` cannot change.
    #[instrument(skip(self, action_name, description))]
    pub async fn update_resource_action(
        &self,
        action_id: Uuid,
        action_name: &str,
        description: &str,
        active: bool,
    ) -> ServiceResult<ResourceAction> {
        let mut action = self.get_resource_action_by_id(action_id).await?;
        action.action_name = action_name.to_string();
        action.description = description.to_string();
        action.active = active;
        action.updated_at = Utc::now();

        let action = self.repository.update(action).await?;
        self.mirror(&action).await;
        info!(permission = %action.permission_key(), active, "Resource action updated");
        Ok(action)
    }

    /// Mark an action active. Activating an active action is a no-op.
    pub async fn activate_resource_action(&self, action_id: Uuid) -> ServiceResult<ResourceAction> {
        self.set_active(action_id, true).await
    }

    /// Mark an action inactive. Deactivating an inactive action is a no-op.
    pub async fn deactivate_resource_action(&self, action_id: Uuid) -> ServiceResult<ResourceAction> {
        self.set_active(action_id, false).await
    }

    async fn set_active(&self, action_id: Uuid, active: bool) -> ServiceResult<ResourceAction> {
        let mut action = self.get_resource_action_by_id(action_id).await?;
        if action.active == active {
            return Ok(action);
        }

        action.active = active;
        action.updated_at = Utc::now();
        let action = self.repository.update(action).await?;
        self.mirror(&action).await;
        info!(permission = %action.permission_key(), active, "Resource action toggled");
        Ok(action)
    }

    /// Hard-delete an action.
    ///
    /// Masks that still carry the action's bit are left untouched, so
    /// existing grants may change meaning if the bit is later reused.
    #[instrument(skip(self))]
    pub async fn delete_resource_action(&self, action_id: Uuid) -> ServiceResult<()> {
        let action = self.get_resource_action_by_id(action_id).await?;
        self.repository.delete(action_id).await?;
        if let Some(catalog) = &self.catalog {
            catalog
                .unregister_action(&action.resource_type, &action.action_key)
                .await;
        }

        warn!(
            permission = %action.permission_key(),
            bit_value = action.bit_value,
            "Resource action deleted; masks holding this bit are now dangling"
        );
        Ok(())
    }

    /// Insert any missing built-in actions for a resource type.
    ///
    /// Built-ins whose key or bit is already taken are skipped. Returns the
    /// rows that were created.
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self, resource_type: &str) -> ServiceResult<Vec<ResourceAction>> {
        let existing = self.get_resource_actions(resource_type).await?;
        let mut created = Vec::new();

        for action in default_actions(resource_type) {
            let taken = existing
                .iter()
                .chain(created.iter())
                .any(|a: &ResourceAction| {
                    a.action_key == action.action_key || a.bit_value == action.bit_value
                });
            if taken {
                continue;
            }
            let action = self.repository.insert(action).await?;
            self.mirror(&action).await;
            created.push(action);
        }

        if !created.is_empty() {
            info!(resource_type, count = created.len(), "Seeded built-in resource actions");
        }
        Ok(created)
    }
}

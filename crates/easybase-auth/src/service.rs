//! Resource action service
//!
//! External-facing, permission-gated facade over
//! [`ResourceActionLocalService`]. Each operation checks the caller's
//! permission on the `PERMISSION` resource type and only then delegates.
//! It never reaches the repository itself.
//!
//! A denied check returns `Forbidden` before existence is looked up, so
//! callers can tell "does not exist" from "exists but not allowed".

use easybase_rbac::{Action, Caller, PermissionEvaluator, ResourceAction, ResourceType};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::guard::PermissionGuard;
use crate::local::ResourceActionLocalService;

/// Resource type every registry operation is checked against.
const DOMAIN: ResourceType = ResourceType::Permission;

/// Permission-gated resource action operations.
///
/// # Example
///
/// ```rust,no_run
/// use easybase_auth::{ResourceActionLocalService, ResourceActionService};
/// use easybase_rbac::{AllowAll, Caller};
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// async fn example() {
///     let service = ResourceActionService::new(
///         ResourceActionLocalService::in_memory(),
///         Arc::new(AllowAll),
///     );
///     let caller = Caller::new(Uuid::now_v7());
///
///     service
///         .create_resource_action(&caller, "Collection", "VIEW", "View Collection", 1, "")
///         .await
///         .unwrap();
///     assert!(service.resource_action_exists(&caller, "Collection", "VIEW").await.unwrap());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ResourceActionService {
    local: ResourceActionLocalService,
    guard: PermissionGuard,
}

impl ResourceActionService {
    /// Create the facade.
    pub fn new(local: ResourceActionLocalService, evaluator: Arc<dyn PermissionEvaluator>) -> Self {
        Self {
            local,
            guard: PermissionGuard::new(evaluator),
        }
    }

    async fn require(&self, caller: &Caller, action: Action) -> ServiceResult<()> {
        self.guard.check(caller, DOMAIN.as_str(), action).await
    }

    /// Register a new action. Requires `PERMISSION:CREATE`.
    #[instrument(skip(self, caller, action_name, description), fields(user_id = %caller.user_id))]
    pub async fn create_resource_action(
        &self,
        caller: &Caller,
        resource_type: &str,
        action_key: &str,
        action_name: &str,
        bit_value: u64,
        description: &str,
    ) -> ServiceResult<ResourceAction> {
        self.require(caller, Action::Create).await?;
        self.local
            .create_resource_action(resource_type, action_key, action_name, bit_value, description)
            .await
    }

    /// Look up by natural key. Requires `PERMISSION:VIEW`.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn get_resource_action(
        &self,
        caller: &Caller,
        resource_type: &str,
        action_key: &str,
    ) -> ServiceResult<ResourceAction> {
        self.require(caller, Action::View).await?;
        self.local.get_resource_action(resource_type, action_key).await
    }

    /// Look up by id. Requires `PERMISSION:VIEW`.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn get_resource_action_by_id(
        &self,
        caller: &Caller,
        action_id: Uuid,
    ) -> ServiceResult<ResourceAction> {
        self.require(caller, Action::View).await?;
        self.local.get_resource_action_by_id(action_id).await
    }

    /// All actions of a resource type. Requires `PERMISSION:VIEW`.
    pub async fn get_resource_actions(
        &self,
        caller: &Caller,
        resource_type: &str,
    ) -> ServiceResult<Vec<ResourceAction>> {
        self.require(caller, Action::View).await?;
        self.local.get_resource_actions(resource_type).await
    }

    /// Active actions of a resource type. Requires `PERMISSION:VIEW`.
    pub async fn get_active_resource_actions(
        &self,
        caller: &Caller,
        resource_type: &str,
    ) -> ServiceResult<Vec<ResourceAction>> {
        self.require(caller, Action::View).await?;
        self.local.get_active_resource_actions(resource_type).await
    }

    /// Active actions of every resource type. Requires `PERMISSION:LIST`.
    pub async fn get_all_active_resource_actions(
        &self,
        caller: &Caller,
    ) -> ServiceResult<Vec<ResourceAction>> {
        self.require(caller, Action::List).await?;
        self.local.get_all_active_resource_actions().await
    }

    /// Actions of a resource type by ascending bit. Requires `PERMISSION:VIEW`.
    pub async fn get_resource_actions_ordered(
        &self,
        caller: &Caller,
        resource_type: &str,
    ) -> ServiceResult<Vec<ResourceAction>> {
        self.require(caller, Action::View).await?;
        self.local.get_resource_actions_ordered(resource_type).await
    }

    /// Existence check. Requires `PERMISSION:VIEW`.
    pub async fn resource_action_exists(
        &self,
        caller: &Caller,
        resource_type: &str,
        action_key: &str,
    ) -> ServiceResult<bool> {
        self.require(caller, Action::View).await?;
        self.local.resource_action_exists(resource_type, action_key).await
    }

    /// Update name, description and active flag. Requires `PERMISSION:UPDATE`.
    #[instrument(skip(self, caller, action_name, description), fields(user_id = %caller.user_id))]
    pub async fn update_resource_action(
        &self,
        caller: &Caller,
        action_id: Uuid,
        action_name: &str,
        description: &str,
        active: bool,
    ) -> ServiceResult<ResourceAction> {
        self.require(caller, Action::Update).await?;
        self.local
            .update_resource_action(action_id, action_name, description, active)
            .await
    }

    /// Activate an action. Requires `PERMISSION:UPDATE`.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn activate_resource_action(
        &self,
        caller: &Caller,
        action_id: Uuid,
    ) -> ServiceResult<ResourceAction> {
        self.require(caller, Action::Update).await?;
        self.local.activate_resource_action(action_id).await
    }

    /// Deactivate an action. Requires `PERMISSION:UPDATE`.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn deactivate_resource_action(
        &self,
        caller: &Caller,
        action_id: Uuid,
    ) -> ServiceResult<ResourceAction> {
        self.require(caller, Action::Update).await?;
        self.local.deactivate_resource_action(action_id).await
    }

    /// Hard-delete an action. Requires `PERMISSION:DELETE`.
    ///
    /// Existing masks keep the deleted bit; use with caution.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn delete_resource_action(&self, caller: &Caller, action_id: Uuid) -> ServiceResult<()> {
        self.require(caller, Action::Delete).await?;
        self.local.delete_resource_action(action_id).await
    }

    /// Insert missing built-in actions. Requires `PERMISSION:CREATE`.
    pub async fn seed_defaults(
        &self,
        caller: &Caller,
        resource_type: &str,
    ) -> ServiceResult<Vec<ResourceAction>> {
        self.require(caller, Action::Create).await?;
        self.local.seed_defaults(resource_type).await
    }
}

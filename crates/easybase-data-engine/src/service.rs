//! Collection service
//!
//! Permission-gated facade over [`CollectionLocalService`]. Operations are
//! checked against the `COLLECTION` resource type first. Callers bound to a
//! tenant are then confined to that tenant: tenant-keyed operations compare
//! the requested tenant, id-keyed operations compare the loaded
//! collection's tenant.

use easybase_auth::{PermissionGuard, ServiceError, ServiceResult};
use easybase_rbac::{Action, Caller, PermissionEvaluator, ResourceType};
use easybase_store::{Page, PageRequest};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::attribute::Attribute;
use crate::collection::{Collection, CollectionSummary};
use crate::local::CollectionLocalService;

const DOMAIN: ResourceType = ResourceType::Collection;

/// Permission-gated collection operations.
#[derive(Debug, Clone)]
pub struct CollectionService {
    local: CollectionLocalService,
    guard: PermissionGuard,
}

impl CollectionService {
    /// Create the facade.
    pub fn new(local: CollectionLocalService, evaluator: Arc<dyn PermissionEvaluator>) -> Self {
        Self {
            local,
            guard: PermissionGuard::new(evaluator),
        }
    }

    async fn require(&self, caller: &Caller, action: Action) -> ServiceResult<()> {
        self.guard.check(caller, DOMAIN.as_str(), action).await
    }

    fn require_tenant(caller: &Caller, tenant_id: Uuid, action: Action) -> ServiceResult<()> {
        if caller.can_access_tenant(tenant_id) {
            return Ok(());
        }

        warn!(
            user_id = %caller.user_id,
            tenant_id = %tenant_id,
            action = action.as_str(),
            "Cross-tenant collection access denied"
        );
        Err(ServiceError::Forbidden {
            resource_type: DOMAIN.as_str().to_string(),
            action: action.as_str().to_string(),
        })
    }

    /// Permission, then load, then tenant check.
    async fn load_owned(
        &self,
        caller: &Caller,
        collection_id: Uuid,
        action: Action,
    ) -> ServiceResult<Collection> {
        self.require(caller, action).await?;
        let collection = self.local.get_collection(collection_id).await?;
        Self::require_tenant(caller, collection.tenant_id, action)?;
        Ok(collection)
    }

    /// Create a collection. Requires `COLLECTION:CREATE`.
    #[instrument(skip(self, caller, attributes), fields(user_id = %caller.user_id))]
    pub async fn create_collection(
        &self,
        caller: &Caller,
        tenant_id: Uuid,
        collection_name: &str,
        attributes: Vec<Attribute>,
    ) -> ServiceResult<Collection> {
        self.require(caller, Action::Create).await?;
        Self::require_tenant(caller, tenant_id, Action::Create)?;
        self.local
            .create_collection(tenant_id, collection_name, attributes)
            .await
    }

    /// Look up by id. Requires `COLLECTION:VIEW`.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn get_collection(&self, caller: &Caller, collection_id: Uuid) -> ServiceResult<Collection> {
        self.load_owned(caller, collection_id, Action::View).await
    }

    /// Look up by tenant and name. Requires `COLLECTION:VIEW`.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn get_collection_by_name(
        &self,
        caller: &Caller,
        tenant_id: Uuid,
        collection_name: &str,
    ) -> ServiceResult<Collection> {
        self.require(caller, Action::View).await?;
        Self::require_tenant(caller, tenant_id, Action::View)?;
        self.local.get_collection_by_name(tenant_id, collection_name).await
    }

    /// One page of a tenant's collections. Requires `COLLECTION:LIST`.
    pub async fn get_collections(
        &self,
        caller: &Caller,
        tenant_id: Uuid,
        request: &PageRequest,
    ) -> ServiceResult<Page<Collection>> {
        self.require(caller, Action::List).await?;
        Self::require_tenant(caller, tenant_id, Action::List)?;
        self.local.get_collections(tenant_id, request).await
    }

    /// Like [`Self::get_collections`] but without attribute lists.
    pub async fn get_collection_summaries(
        &self,
        caller: &Caller,
        tenant_id: Uuid,
        request: &PageRequest,
    ) -> ServiceResult<Page<CollectionSummary>> {
        let page = self.get_collections(caller, tenant_id, request).await?;
        Ok(page.map(|collection| CollectionSummary::from(&collection)))
    }

    /// Replace the attribute list. Requires `COLLECTION:UPDATE`.
    #[instrument(skip(self, caller, attributes), fields(user_id = %caller.user_id))]
    pub async fn update_collection(
        &self,
        caller: &Caller,
        collection_id: Uuid,
        attributes: Vec<Attribute>,
    ) -> ServiceResult<Collection> {
        self.load_owned(caller, collection_id, Action::Update).await?;
        self.local.update_collection(collection_id, attributes).await
    }

    /// Hard-delete a collection. Requires `COLLECTION:DELETE`.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn delete_collection(&self, caller: &Caller, collection_id: Uuid) -> ServiceResult<()> {
        self.load_owned(caller, collection_id, Action::Delete).await?;
        self.local.delete_collection(collection_id).await
    }
}

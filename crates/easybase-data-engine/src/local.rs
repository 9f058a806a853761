//! Collection local service
//!
//! Business logic and repository access for collections. No permission or
//! tenant checks happen here; see [`crate::service::CollectionService`].

use easybase_auth::{ServiceError, ServiceResult};
use easybase_store::{Entity, MemoryRepository, Page, PageRequest, Repository};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::attribute::{validate_attributes, Attribute};
use crate::collection::Collection;

/// Unguarded collection operations.
#[derive(Clone)]
pub struct CollectionLocalService {
    repository: Arc<dyn Repository<Collection>>,
}

impl std::fmt::Debug for CollectionLocalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionLocalService").finish_non_exhaustive()
    }
}

impl CollectionLocalService {
    /// Create a service over a repository.
    pub fn new(repository: Arc<dyn Repository<Collection>>) -> Self {
        Self { repository }
    }

    /// Create a service backed by an in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRepository::<Collection>::new()))
    }

    /// Create a collection for a tenant.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is blank or an attribute name is blank
    ///   or repeated
    /// - `Conflict` if the tenant already has a collection with this name
    #[instrument(skip(self, attributes), fields(attribute_count = attributes.len()))]
    pub async fn create_collection(
        &self,
        tenant_id: Uuid,
        collection_name: &str,
        attributes: Vec<Attribute>,
    ) -> ServiceResult<Collection> {
        if collection_name.trim().is_empty() {
            return Err(ServiceError::Validation("collection name must not be blank".into()));
        }
        validate_attributes(&attributes).map_err(ServiceError::Validation)?;

        let key = (tenant_id, collection_name.to_string());
        if self.repository.exists_by_key(&key).await? {
            return Err(ServiceError::conflict(
                Collection::NAME,
                format!("{}/{}", tenant_id, collection_name),
            ));
        }

        let collection = self
            .repository
            .insert(Collection::new(tenant_id, collection_name, attributes))
            .await?;

        info!(
            collection_id = %collection.id,
            tenant_id = %tenant_id,
            collection_name,
            "Collection created"
        );
        Ok(collection)
    }

    /// Look up by id.
    pub async fn get_collection(&self, collection_id: Uuid) -> ServiceResult<Collection> {
        debug!("Fetching collection {}", collection_id);
        self.repository
            .find_by_id(collection_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Collection::NAME, collection_id))
    }

    /// Look up by tenant and name.
    pub async fn get_collection_by_name(
        &self,
        tenant_id: Uuid,
        collection_name: &str,
    ) -> ServiceResult<Collection> {
        debug!("Fetching collection {}/{}", tenant_id, collection_name);
        self.repository
            .find_by_key(&(tenant_id, collection_name.to_string()))
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(Collection::NAME, format!("{}/{}", tenant_id, collection_name))
            })
    }

    /// One page of a tenant's collections.
    ///
    /// Sorting in `request` is handed to the repository as-is.
    pub async fn get_collections(
        &self,
        tenant_id: Uuid,
        request: &PageRequest,
    ) -> ServiceResult<Page<Collection>> {
        debug!(
            tenant_id = %tenant_id,
            page = request.page,
            size = request.size,
            "Listing collections"
        );
        Ok(self.repository.find_page_by_parent(&tenant_id, request).await?)
    }

    /// Replace a collection's attribute list wholesale.
    #[instrument(skip(self, attributes), fields(attribute_count = attributes.len()))]
    pub async fn update_collection(
        &self,
        collection_id: Uuid,
        attributes: Vec<Attribute>,
    ) -> ServiceResult<Collection> {
        validate_attributes(&attributes).map_err(ServiceError::Validation)?;

        let mut collection = self.get_collection(collection_id).await?;
        collection.replace_attributes(attributes);
        let collection = self.repository.update(collection).await?;

        info!(
            collection_id = %collection.id,
            collection_name = %collection.collection_name,
            "Collection attributes replaced"
        );
        Ok(collection)
    }

    /// Hard-delete a collection. Data rows stored against it are untouched.
    #[instrument(skip(self))]
    pub async fn delete_collection(&self, collection_id: Uuid) -> ServiceResult<()> {
        let collection = self.get_collection(collection_id).await?;
        self.repository.delete(collection_id).await?;

        info!(
            collection_id = %collection_id,
            collection_name = %collection.collection_name,
            "Collection deleted"
        );
        Ok(())
    }
}

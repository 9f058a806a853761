//! Collection domain model
//!
//! A collection is a tenant-scoped, named schema: an ordered list of
//! attributes. Its name is unique within the tenant.

use chrono::{DateTime, Utc};
use easybase_store::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attribute::Attribute;

/// A named schema owned by one tenant.
///
/// # Examples
///
/// ```
/// use easybase_data_engine::{Attribute, AttributeType, Collection};
/// use uuid::Uuid;
///
/// let tenant_id = Uuid::now_v7();
/// let collection = Collection::new(
///     tenant_id,
///     "products",
///     vec![Attribute::new("title", AttributeType::String)],
/// );
/// assert_eq!(collection.attribute_names(), vec!["title"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    /// Unique identifier
    pub id: Uuid,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Name, unique within the tenant
    pub collection_name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// When the collection was created
    pub created_at: DateTime<Utc>,

    /// When the attribute list was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Create a collection with a fresh v7 id.
    pub fn new(tenant_id: Uuid, collection_name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            collection_name: collection_name.into(),
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attribute names in declaration order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Replace the attribute list and bump `updated_at`.
    pub fn replace_attributes(&mut self, attributes: Vec<Attribute>) {
        self.attributes = attributes;
        self.updated_at = Utc::now();
    }
}

impl Entity for Collection {
    type Key = (Uuid, String);
    type Parent = Uuid;
    const NAME: &'static str = "Collection";

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.tenant_id, self.collection_name.clone())
    }

    fn parent(&self) -> Self::Parent {
        self.tenant_id
    }
}

/// Lightweight view for listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Collection id
    pub id: Uuid,
    /// Name within the tenant
    pub collection_name: String,
    /// Number of attributes
    pub attribute_count: usize,
    /// When the attribute list was last replaced
    pub updated_at: DateTime<Utc>,
}

impl From<&Collection> for CollectionSummary {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id,
            collection_name: collection.collection_name.clone(),
            attribute_count: collection.attributes.len(),
            updated_at: collection.updated_at,
        }
    }
}

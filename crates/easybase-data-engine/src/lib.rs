//! # EasyBase Data Engine
//!
//! Tenant-scoped collection schemas for the EasyBase platform.
//!
//! ## Overview
//!
//! The easybase-data-engine crate handles:
//! - **Attributes**: Named, typed fields drawn from a closed set of type
//!   descriptors
//! - **Collections**: Ordered attribute lists, unique by name per tenant
//! - **Local service**: Create, look up, page, replace and delete
//! - **Facade service**: `COLLECTION` permission checks and tenant
//!   isolation in front of the local service
//!
//! ## Usage
//!
//! ```rust,no_run
//! use easybase_data_engine::{Attribute, AttributeType, CollectionLocalService, CollectionService};
//! use easybase_rbac::{AllowAll, Caller};
//! use easybase_store::PageRequest;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! async fn example() {
//!     let service = CollectionService::new(CollectionLocalService::in_memory(), Arc::new(AllowAll));
//!     let tenant_id = Uuid::now_v7();
//!     let caller = Caller::new(Uuid::now_v7()).with_tenant(tenant_id);
//!
//!     service
//!         .create_collection(
//!             &caller,
//!             tenant_id,
//!             "products",
//!             vec![Attribute::new("title", AttributeType::String).required()],
//!         )
//!         .await
//!         .unwrap();
//!
//!     let page = service
//!         .get_collections(&caller, tenant_id, &PageRequest::default())
//!         .await
//!         .unwrap();
//!     assert_eq!(page.total_elements, 1);
//! }
//! ```
//!
//! ## Required Permissions
//!
//! | Operation | Action |
//! |---|---|
//! | create | `COLLECTION:CREATE` |
//! | get by id, get by name | `COLLECTION:VIEW` |
//! | page listing | `COLLECTION:LIST` |
//! | replace attributes | `COLLECTION:UPDATE` |
//! | delete | `COLLECTION:DELETE` |

pub mod attribute;
pub mod collection;
pub mod local;
pub mod service;

// Re-export main types
pub use attribute::{validate_attributes, Attribute, AttributeType};
pub use collection::{Collection, CollectionSummary};
pub use local::CollectionLocalService;
pub use service::CollectionService;

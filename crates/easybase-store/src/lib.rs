//! # EasyBase Store
//!
//! Persistence contracts shared by the EasyBase services.
//!
//! ## Overview
//!
//! The easybase-store crate handles:
//! - **Entities**: Types that declare an id, a natural key, a listing parent,
//!   and any extra unique constraints
//! - **Repositories**: Async lookup/insert/update/delete per entity type
//! - **Pagination**: Page requests with opaque sort pass-through and page
//!   metadata (total elements, total pages)
//!
//! ## Features
//!
//! - `memory` (default): In-memory repository for embedding and tests.
//!   Production deployments put a relational store behind [`Repository`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use easybase_store::{Entity, MemoryRepository, PageRequest, Repository};
//! use serde::Serialize;
//! use uuid::Uuid;
//!
//! #[derive(Debug, Clone, Serialize)]
//! struct Tag {
//!     id: Uuid,
//!     owner: Uuid,
//!     label: String,
//! }
//!
//! impl Entity for Tag {
//!     type Key = (Uuid, String);
//!     type Parent = Uuid;
//!     const NAME: &'static str = "Tag";
//!
//!     fn id(&self) -> Uuid { self.id }
//!     fn key(&self) -> Self::Key { (self.owner, self.label.clone()) }
//!     fn parent(&self) -> Self::Parent { self.owner }
//! }
//!
//! async fn example() {
//!     let repo = MemoryRepository::<Tag>::new();
//!     let owner = Uuid::now_v7();
//!     repo.insert(Tag { id: Uuid::now_v7(), owner, label: "red".into() }).await.unwrap();
//!
//!     let page = repo.find_page_by_parent(&owner, &PageRequest::default()).await.unwrap();
//!     assert_eq!(page.total_elements, 1);
//! }
//! ```
//!
//! ## Uniqueness
//!
//! Repositories enforce the natural key and every declared
//! [`UniqueConstraint`]. A violation surfaces as
//! [`StoreError::UniqueViolation`], which services translate into a
//! Conflict condition for the caller.

pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod page;
pub mod repository;

// Re-export main types
pub use error::{StoreError, StoreResult};
#[cfg(feature = "memory")]
pub use memory::MemoryRepository;
pub use page::{Direction, Page, PageRequest, Sort};
pub use repository::{Entity, Repository, UniqueConstraint};

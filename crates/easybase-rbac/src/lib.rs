//! # EasyBase RBAC
//!
//! This crate provides the resource action registry model and permission
//! evaluation shared by the EasyBase services.
//!
//! ## Overview
//!
//! The easybase-rbac crate handles:
//! - **Resources**: Built-in protected resource types
//! - **Actions**: Built-in verbs with default bit values
//! - **Resource Actions**: Registry rows, one bit per action per resource type
//! - **Permission Masks**: Bitwise OR of granted action bits
//! - **Evaluators**: The `has_permission` strategy services depend on
//!
//! ## Architecture
//!
//! ```text
//! Permission = ResourceType + ActionKey
//!
//! Registry (per resource type):
//!   COLLECTION:VIEW    bit 1
//!   COLLECTION:CREATE  bit 2
//!   COLLECTION:UPDATE  bit 4
//!
//! Role mask:
//!   editor / COLLECTION = 1 | 4 = 5   -> VIEW, UPDATE
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use easybase_rbac::{Caller, PermissionEvaluator, PermissionMask, RoleMaskEvaluator};
//! use uuid::Uuid;
//!
//! async fn example() {
//!     let evaluator = RoleMaskEvaluator::with_default_catalog().await;
//!     evaluator.grant("editor", "COLLECTION", PermissionMask::from_bits([1, 4])).await;
//!
//!     let caller = Caller::new(Uuid::now_v7()).with_role("editor");
//!     assert!(evaluator.has_permission(&caller, "COLLECTION", "UPDATE").await);
//! }
//! ```
//!
//! ## Bit Stability
//!
//! A resource action's bit and key are fixed at creation. Deleting an
//! action leaves its bit set in any stored mask; it simply stops
//! authorizing anything until a new action reuses the bit.

pub mod actions;
pub mod evaluator;
pub mod permissions;
pub mod resource_action;
pub mod resources;

// Re-export main types for convenience
pub use actions::Action;
pub use evaluator::{AllowAll, Caller, DenyAll, PermissionEvaluator, RoleMaskEvaluator};
pub use permissions::{Permission, PermissionMask};
pub use resource_action::{default_actions, validate_bit_value, ResourceAction};
pub use resources::ResourceType;

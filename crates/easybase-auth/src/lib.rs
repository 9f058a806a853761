//! # EasyBase Auth
//!
//! This crate provides the resource action services of the EasyBase
//! platform and the error type shared by every permission-gated service.
//!
//! ## Overview
//!
//! The easybase-auth crate handles:
//! - **Local service**: Registry business logic and repository access,
//!   with no permission checks; optionally mirrors writes into a
//!   `RoleMaskEvaluator` catalog
//! - **Facade service**: Permission checks on the `PERMISSION` resource
//!   type, then delegation to the local service
//! - **Guard**: Turns evaluator denials into `Forbidden`
//! - **Errors**: `Forbidden`, `NotFound`, `Conflict`, `Validation`, `Storage`
//!
//! ## Layering
//!
//! ```text
//! caller ─→ ResourceActionService ─(PermissionGuard)─→ ResourceActionLocalService ─→ Repository
//!                 Forbidden                                 NotFound / Conflict
//! ```
//!
//! ## Required Permissions
//!
//! | Operation | Action |
//! |---|---|
//! | create, seed defaults | `PERMISSION:CREATE` |
//! | get, list per type, ordered, exists | `PERMISSION:VIEW` |
//! | all active across types | `PERMISSION:LIST` |
//! | update, activate, deactivate | `PERMISSION:UPDATE` |
//! | delete | `PERMISSION:DELETE` |

pub mod error;
pub mod guard;
pub mod local;
pub mod service;

// Re-export main types
pub use error::{ServiceError, ServiceResult};
pub use guard::PermissionGuard;
pub use local::ResourceActionLocalService;
pub use service::ResourceActionService;

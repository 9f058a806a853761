//! Permission guard used by facade services.
//!
//! Every facade method calls [`PermissionGuard::check`] before touching its
//! local service. A denial becomes `ServiceError::Forbidden` and is logged
//! at warn level with the caller and the missing permission.

use easybase_rbac::{Action, Caller, PermissionEvaluator};
use std::sync::Arc;
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};

/// Wraps a [`PermissionEvaluator`] and turns denials into errors.
#[derive(Clone)]
pub struct PermissionGuard {
    evaluator: Arc<dyn PermissionEvaluator>,
}

impl std::fmt::Debug for PermissionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGuard").finish_non_exhaustive()
    }
}

impl PermissionGuard {
    /// Create a guard over an evaluator.
    pub fn new(evaluator: Arc<dyn PermissionEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Require `resource_type:action` for `caller`.
    pub async fn check(
        &self,
        caller: &Caller,
        resource_type: &str,
        action: Action,
    ) -> ServiceResult<()> {
        if self
            .evaluator
            .has_permission(caller, resource_type, action.as_str())
            .await
        {
            return Ok(());
        }

        warn!(
            user_id = %caller.user_id,
            resource_type,
            action = action.as_str(),
            "Permission denied"
        );
        Err(ServiceError::Forbidden {
            resource_type: resource_type.to_string(),
            action: action.as_str().to_string(),
        })
    }
}

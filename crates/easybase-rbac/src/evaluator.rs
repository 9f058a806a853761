//! Permission evaluation
//!
//! Services depend on the [`PermissionEvaluator`] strategy, never on a
//! concrete implementation. This crate ships a bitmask evaluator driven by
//! the resource action registry plus trivial allow/deny strategies for
//! tests and embedding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::permissions::PermissionMask;
use crate::resource_action::{default_actions, ResourceAction};
use crate::resources::ResourceType;

/// Identity of whoever is calling a guarded service.
///
/// # Examples
///
/// ```
/// use easybase_rbac::Caller;
/// use uuid::Uuid;
///
/// let tenant = Uuid::now_v7();
/// let caller = Caller::new(Uuid::now_v7()).with_tenant(tenant).with_role("editor");
/// assert!(caller.can_access_tenant(tenant));
/// assert!(!caller.can_access_tenant(Uuid::now_v7()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caller {
    /// Calling user
    pub user_id: Uuid,

    /// Tenant the caller is bound to; `None` means platform-wide
    pub tenant_id: Option<Uuid>,

    /// Role names whose masks apply to this caller
    #[serde(default)]
    pub roles: Vec<String>,

    /// Internal callers (bootstrap, migrations) skip permission checks
    #[serde(default)]
    pub is_system: bool,
}

impl Caller {
    /// A platform-wide caller with no roles.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            tenant_id: None,
            roles: Vec::new(),
            is_system: false,
        }
    }

    /// The internal system caller.
    pub fn system() -> Self {
        Self {
            user_id: Uuid::nil(),
            tenant_id: None,
            roles: Vec::new(),
            is_system: true,
        }
    }

    /// Bind the caller to a tenant.
    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Add a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Whether the caller may touch data of `tenant_id`.
    ///
    /// Callers without a tenant binding are platform-wide.
    pub fn can_access_tenant(&self, tenant_id: Uuid) -> bool {
        self.is_system || self.tenant_id.map_or(true, |own| own == tenant_id)
    }
}

/// Decides whether a caller holds a permission.
#[async_trait]
pub trait PermissionEvaluator: Send + Sync {
    /// Check `resource_type:action_key` for `caller`.
    async fn has_permission(&self, caller: &Caller, resource_type: &str, action_key: &str)
        -> bool;
}

/// Grants everything. For tests and trusted embedding.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl PermissionEvaluator for AllowAll {
    async fn has_permission(&self, _caller: &Caller, _resource_type: &str, _action_key: &str) -> bool {
        true
    }
}

/// Denies everything except system callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

#[async_trait]
impl PermissionEvaluator for DenyAll {
    async fn has_permission(&self, caller: &Caller, _resource_type: &str, _action_key: &str) -> bool {
        caller.is_system
    }
}

/// A catalogued action bit.
#[derive(Debug, Clone, Copy)]
struct CatalogEntry {
    bit: u64,
    active: bool,
}

/// Bitmask evaluator.
///
/// Holds an action catalog (`resource_type`, `action_key`) → bit and, per
/// role, one [`PermissionMask`] per resource type. A caller holds a
/// permission when the OR of its roles' masks contains the action's bit.
/// Unknown and inactive actions are denied.
///
/// # Example
///
/// ```
/// use easybase_rbac::{Caller, PermissionEvaluator, PermissionMask, RoleMaskEvaluator};
/// use uuid::Uuid;
///
/// # async fn example() {
/// let evaluator = RoleMaskEvaluator::with_default_catalog().await;
/// evaluator.grant("viewer", "COLLECTION", PermissionMask::from_value(1)).await;
///
/// let caller = Caller::new(Uuid::now_v7()).with_role("viewer");
/// assert!(evaluator.has_permission(&caller, "COLLECTION", "VIEW").await);
/// assert!(!evaluator.has_permission(&caller, "COLLECTION", "DELETE").await);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RoleMaskEvaluator {
    catalog: RwLock<HashMap<(String, String), CatalogEntry>>,
    grants: RwLock<HashMap<String, HashMap<String, PermissionMask>>>,
}

impl RoleMaskEvaluator {
    /// Create an evaluator with an empty catalog and no grants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator whose catalog holds the built-in actions of every
    /// built-in resource type.
    pub async fn with_default_catalog() -> Self {
        let evaluator = Self::new();
        for resource in ResourceType::all() {
            evaluator.load_actions(default_actions(resource.as_str())).await;
        }
        evaluator
    }

    /// Add or refresh one registry row in the catalog.
    pub async fn register_action(&self, action: &ResourceAction) {
        self.catalog.write().await.insert(
            (action.resource_type.clone(), action.action_key.clone()),
            CatalogEntry {
                bit: action.bit_value,
                active: action.active,
            },
        );
    }

    /// Add or refresh many registry rows.
    pub async fn load_actions<I>(&self, actions: I)
    where
        I: IntoIterator<Item = ResourceAction>,
    {
        let mut catalog = self.catalog.write().await;
        for action in actions {
            catalog.insert(
                (action.resource_type, action.action_key),
                CatalogEntry {
                    bit: action.bit_value,
                    active: action.active,
                },
            );
        }
    }

    /// Drop an action from the catalog.
    pub async fn unregister_action(&self, resource_type: &str, action_key: &str) {
        self.catalog
            .write()
            .await
            .remove(&(resource_type.to_string(), action_key.to_string()));
    }

    /// OR `mask` into a role's grants for a resource type.
    pub async fn grant(&self, role: &str, resource_type: &str, mask: PermissionMask) {
        let mut grants = self.grants.write().await;
        let entry = grants
            .entry(role.to_string())
            .or_default()
            .entry(resource_type.to_string())
            .or_default();
        *entry |= mask;
    }

    /// Clear the bits of `mask` from a role's grants for a resource type.
    pub async fn revoke(&self, role: &str, resource_type: &str, mask: PermissionMask) {
        let mut grants = self.grants.write().await;
        if let Some(entry) = grants
            .get_mut(role)
            .and_then(|by_type| by_type.get_mut(resource_type))
        {
            for bit in mask.bits() {
                entry.revoke(bit);
            }
        }
    }

    /// A role's mask for a resource type.
    pub async fn role_mask(&self, role: &str, resource_type: &str) -> PermissionMask {
        self.grants
            .read()
            .await
            .get(role)
            .and_then(|by_type| by_type.get(resource_type))
            .copied()
            .unwrap_or_default()
    }

    /// Effective mask of a caller: the OR of its roles' masks.
    pub async fn caller_mask(&self, caller: &Caller, resource_type: &str) -> PermissionMask {
        let grants = self.grants.read().await;
        caller
            .roles
            .iter()
            .filter_map(|role| grants.get(role))
            .filter_map(|by_type| by_type.get(resource_type))
            .fold(PermissionMask::empty(), |acc, mask| acc | *mask)
    }
}

#[async_trait]
impl PermissionEvaluator for RoleMaskEvaluator {
    async fn has_permission(&self, caller: &Caller, resource_type: &str, action_key: &str) -> bool {
        if caller.is_system {
            return true;
        }

        let entry = self
            .catalog
            .read()
            .await
            .get(&(resource_type.to_string(), action_key.to_string()))
            .copied();

        let Some(entry) = entry else {
            debug!(resource_type, action_key, "Permission check on uncatalogued action");
            return false;
        };
        if !entry.active {
            debug!(resource_type, action_key, "Permission check on inactive action");
            return false;
        }

        self.caller_mask(caller, resource_type).await.contains(entry.bit)
    }
}

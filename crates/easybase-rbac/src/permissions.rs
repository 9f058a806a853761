//! # Permissions
//!
//! A permission names one action on one resource type. Grants are stored
//! compactly as a [`PermissionMask`]: the bitwise OR of the granted
//! actions' bit values within a resource type.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::resources::ResourceType;
use crate::resource_action::ResourceAction;

/// A required permission: resource type plus action key.
///
/// # Example
///
/// ```
/// use easybase_rbac::permissions::Permission;
/// use easybase_rbac::{Action, ResourceType};
///
/// let perm = Permission::builtin(ResourceType::Collection, Action::View);
/// assert_eq!(perm.to_string(), "COLLECTION:VIEW");
///
/// let parsed = Permission::from_string("COLLECTION:VIEW").unwrap();
/// assert_eq!(parsed, perm);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    /// The resource type this permission applies to.
    pub resource_type: String,
    /// The action key on the resource type.
    pub action_key: String,
}

impl Permission {
    /// Create a permission from free-form keys.
    pub fn new(resource_type: impl Into<String>, action_key: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            action_key: action_key.into(),
        }
    }

    /// Create a permission on a built-in resource type and action.
    pub fn builtin(resource: ResourceType, action: Action) -> Self {
        Self::new(resource.as_str(), action.as_str())
    }

    /// Parse from `resource_type:action_key`.
    ///
    /// Both parts must be non-empty. Action keys may not contain `:`.
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource_type, action_key) = s.rsplit_once(':')?;
        if resource_type.is_empty() || action_key.is_empty() {
            return None;
        }
        Some(Self::new(resource_type, action_key))
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.action_key)
    }
}

/// Bitmask of granted actions within one resource type.
///
/// # Example
///
/// ```
/// use easybase_rbac::PermissionMask;
///
/// let mask = PermissionMask::empty().with(1).with(4);
/// assert!(mask.contains(4));
/// assert!(!mask.contains(2));
/// assert_eq!(mask.value(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PermissionMask(u64);

impl PermissionMask {
    /// A mask granting nothing.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Wrap a raw mask value.
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// OR together a set of action bits.
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        Self(bits.into_iter().fold(0, |mask, bit| mask | bit))
    }

    /// Raw mask value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Return a copy with `bit` granted.
    pub fn with(self, bit: u64) -> Self {
        Self(self.0 | bit)
    }

    /// Grant `bit` in place.
    pub fn grant(&mut self, bit: u64) {
        self.0 |= bit;
    }

    /// Revoke `bit` in place.
    pub fn revoke(&mut self, bit: u64) {
        self.0 &= !bit;
    }

    /// Whether every bit of `bit` is granted. A zero bit is never granted.
    pub fn contains(&self, bit: u64) -> bool {
        bit != 0 && self.0 & bit == bit
    }

    /// Combine two masks.
    pub fn union(self, other: PermissionMask) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Set bits, ascending.
    pub fn bits(&self) -> impl Iterator<Item = u64> + '_ {
        (0..u64::BITS)
            .map(|shift| 1u64 << shift)
            .filter(move |bit| self.0 & bit != 0)
    }

    /// Action keys of the granted bits, in ascending bit order.
    ///
    /// Bits with no matching action (for example after the action was
    /// deleted) are skipped.
    pub fn labels(&self, actions: &[ResourceAction]) -> Vec<String> {
        let mut ordered: Vec<&ResourceAction> = actions.iter().collect();
        ordered.sort_by_key(|action| action.bit_value);
        ordered
            .into_iter()
            .filter(|action| self.contains(action.bit_value))
            .map(|action| action.action_key.clone())
            .collect()
    }
}

impl From<u64> for PermissionMask {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::ops::BitOr for PermissionMask {
    type Output = PermissionMask;

    fn bitor(self, rhs: PermissionMask) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for PermissionMask {
    fn bitor_assign(&mut self, rhs: PermissionMask) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<u64> for PermissionMask {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self::from_bits(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_to_string() {
        let perm = Permission::builtin(ResourceType::Permission, Action::Create);
        assert_eq!(perm.to_string(), "PERMISSION:CREATE");
    }

    #[test]
    fn test_permission_parsing() {
        let perm = Permission::from_string("Collection:VIEW").unwrap();
        assert_eq!(perm.resource_type, "Collection");
        assert_eq!(perm.action_key, "VIEW");

        // Resource types may themselves contain colons
        let perm = Permission::from_string("app:Invoice:APPROVE").unwrap();
        assert_eq!(perm.resource_type, "app:Invoice");
        assert_eq!(perm.action_key, "APPROVE");

        assert!(Permission::from_string("COLLECTION").is_none());
        assert!(Permission::from_string(":VIEW").is_none());
        assert!(Permission::from_string("COLLECTION:").is_none());
    }

    #[test]
    fn test_mask_grant_and_revoke() {
        let mut mask = PermissionMask::empty();
        assert!(mask.is_empty());

        mask.grant(Action::View.default_bit());
        mask.grant(Action::Update.default_bit());
        assert!(mask.contains(1));
        assert!(mask.contains(4));
        assert!(!mask.contains(2));

        mask.revoke(1);
        assert!(!mask.contains(1));
        assert_eq!(mask.value(), 4);
    }

    #[test]
    fn test_mask_zero_bit_never_granted() {
        let mask = PermissionMask::from_value(u64::MAX);
        assert!(!mask.contains(0));
    }

    #[test]
    fn test_mask_composition() {
        let viewer = PermissionMask::from_bits([1, 16]);
        let editor: PermissionMask = [2u64, 4].into_iter().collect();

        let combined = viewer | editor;
        assert_eq!(combined.value(), 0b10111);

        let mut acc = PermissionMask::empty();
        acc |= viewer;
        assert_eq!(acc, viewer);
    }

    #[test]
    fn test_mask_bits_ascending() {
        let mask = PermissionMask::from_value(0b1010_0001);
        let bits: Vec<u64> = mask.bits().collect();
        assert_eq!(bits, vec![1, 32, 128]);

        let top = PermissionMask::from_value(1 << 63);
        assert_eq!(top.bits().collect::<Vec<_>>(), vec![1u64 << 63]);
    }

    #[test]
    fn test_mask_labels_in_bit_order() {
        let actions = vec![
            ResourceAction::new("COLLECTION", "DELETE", "Delete", 8, ""),
            ResourceAction::new("COLLECTION", "VIEW", "View", 1, ""),
            ResourceAction::new("COLLECTION", "UPDATE", "Update", 4, ""),
        ];

        // Bit 64 has no registered action and is skipped
        let mask = PermissionMask::from_bits([8, 1, 64]);
        assert_eq!(mask.labels(&actions), vec!["VIEW", "DELETE"]);
    }
}

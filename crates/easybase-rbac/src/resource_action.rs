//! Resource action registry entries
//!
//! A resource action is a single permission unit (verb) scoped to a
//! resource type. Each one owns exactly one bit within its resource type,
//! so a role's grants for that type fold into one `u64` mask.
//!
//! The bit and the `(resource_type, action_key)` pair never change after
//! creation. Changing either would silently re-point every stored mask.

use chrono::{DateTime, Utc};
use easybase_store::{Entity, UniqueConstraint};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::Action;

/// Name of the `(resource_type, bit_value)` unique constraint.
pub const BIT_VALUE_CONSTRAINT: &str = "resource_action_bit_value";

/// A registered action on a resource type.
///
/// # Example
///
/// ```
/// use easybase_rbac::ResourceAction;
///
/// let action = ResourceAction::new("COLLECTION", "VIEW", "View Collection", 1, "");
/// assert!(action.active);
/// assert_eq!(action.permission_key(), "COLLECTION:VIEW");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceAction {
    /// Unique identifier
    pub id: Uuid,

    /// Protected resource class (e.g. `COLLECTION`)
    pub resource_type: String,

    /// Action key, unique within the resource type (e.g. `VIEW`)
    pub action_key: String,

    /// Human-readable label
    pub action_name: String,

    /// Single bit, unique within the resource type
    pub bit_value: u64,

    /// Free text
    pub description: String,

    /// Inactive actions stay addressable by id but drop out of active listings
    pub active: bool,

    /// When the action was registered
    pub created_at: DateTime<Utc>,

    /// When the action was last changed
    pub updated_at: DateTime<Utc>,
}

impl ResourceAction {
    /// Create a new, active resource action.
    ///
    /// The bit is not validated here; use [`validate_bit_value`] before
    /// persisting.
    pub fn new(
        resource_type: impl Into<String>,
        action_key: impl Into<String>,
        action_name: impl Into<String>,
        bit_value: u64,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            resource_type: resource_type.into(),
            action_key: action_key.into(),
            action_name: action_name.into(),
            bit_value,
            description: description.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the registry row of a built-in action.
    pub fn builtin(resource_type: &str, action: Action) -> Self {
        Self::new(
            resource_type,
            action.as_str(),
            format!("{} {}", action.label(), display_name(resource_type)),
            action.default_bit(),
            "",
        )
    }

    /// `resource_type:action_key` form used in logs and permission strings.
    pub fn permission_key(&self) -> String {
        format!("{}:{}", self.resource_type, self.action_key)
    }
}

impl Entity for ResourceAction {
    type Key = (String, String);
    type Parent = String;
    const NAME: &'static str = "ResourceAction";

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.resource_type.clone(), self.action_key.clone())
    }

    fn parent(&self) -> Self::Parent {
        self.resource_type.clone()
    }

    fn unique_constraints(&self) -> Vec<UniqueConstraint> {
        vec![UniqueConstraint::new(
            BIT_VALUE_CONSTRAINT,
            format!("{}:{}", self.resource_type, self.bit_value),
        )]
    }
}

/// Check that a bit value is a single, non-zero bit.
///
/// # Example
///
/// ```
/// use easybase_rbac::resource_action::validate_bit_value;
///
/// assert!(validate_bit_value(8).is_ok());
/// assert!(validate_bit_value(0).is_err());
/// assert!(validate_bit_value(6).is_err());
/// ```
pub fn validate_bit_value(bit_value: u64) -> Result<(), String> {
    if bit_value.is_power_of_two() {
        Ok(())
    } else {
        Err(format!(
            "bit value {} must be a single bit (a non-zero power of two)",
            bit_value
        ))
    }
}

/// Registry rows for every built-in action of a resource type.
pub fn default_actions(resource_type: &str) -> Vec<ResourceAction> {
    Action::all()
        .into_iter()
        .map(|action| ResourceAction::builtin(resource_type, action))
        .collect()
}

/// `COLLECTION` -> `Collection`, `media_file` -> `Media File`.
fn display_name(resource_type: &str) -> String {
    resource_type
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_action_is_active() {
        let action = ResourceAction::new("Collection", "VIEW", "View Collection", 1, "");
        assert!(action.active);
        assert_eq!(action.created_at, action.updated_at);
        assert_eq!(action.permission_key(), "Collection:VIEW");
    }

    #[test]
    fn test_validate_bit_value() {
        for shift in 0..64 {
            assert!(validate_bit_value(1u64 << shift).is_ok());
        }
        assert!(validate_bit_value(0).is_err());
        assert!(validate_bit_value(3).is_err());
        assert!(validate_bit_value(u64::MAX).is_err());
    }

    #[test]
    fn test_entity_keys() {
        let action = ResourceAction::new("COLLECTION", "UPDATE", "Update", 4, "");
        assert_eq!(action.key(), ("COLLECTION".to_string(), "UPDATE".to_string()));
        assert_eq!(action.parent(), "COLLECTION");
        assert_eq!(
            action.unique_constraints(),
            vec![UniqueConstraint::new(BIT_VALUE_CONSTRAINT, "COLLECTION:4")]
        );
    }

    #[test]
    fn test_default_actions() {
        let actions = default_actions("MEDIA");
        assert_eq!(actions.len(), 5);
        assert_eq!(actions[0].action_key, "VIEW");
        assert_eq!(actions[0].action_name, "View Media");
        assert_eq!(actions[4].bit_value, 16);
        assert!(actions.iter().all(|a| a.resource_type == "MEDIA"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("COLLECTION"), "Collection");
        assert_eq!(display_name("media_file"), "Media File");
        assert_eq!(display_name(""), "");
    }
}

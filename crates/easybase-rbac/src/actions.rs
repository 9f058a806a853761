//! # Actions
//!
//! Built-in actions that can be performed on resources.
//! Every built-in action has a default bit so the registry can be seeded
//! with a consistent layout; custom actions registered at runtime pick
//! their own free bits.

use serde::{Deserialize, Serialize};

/// Built-in actions.
///
/// - **View**: Read a single resource
/// - **Create**: Create new resource instances
/// - **Update**: Modify existing resource data
/// - **Delete**: Remove resource instances
/// - **List**: Browse resources across scopes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// View resource details.
    View,

    /// Create new resource instances.
    Create,

    /// Modify existing resources.
    Update,

    /// Permanently remove resources.
    Delete,

    /// Browse resources across scopes.
    List,
}

impl Action {
    /// Get the action key as stored in the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "VIEW",
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::List => "LIST",
        }
    }

    /// Human-readable verb used for default action names.
    pub fn label(&self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Delete => "Delete",
            Action::List => "List",
        }
    }

    /// Default bit of this action in a seeded registry.
    ///
    /// # Example
    ///
    /// ```
    /// use easybase_rbac::actions::Action;
    ///
    /// assert_eq!(Action::View.default_bit(), 1);
    /// assert_eq!(Action::List.default_bit(), 16);
    /// ```
    pub fn default_bit(&self) -> u64 {
        match self {
            Action::View => 1,
            Action::Create => 1 << 1,
            Action::Update => 1 << 2,
            Action::Delete => 1 << 3,
            Action::List => 1 << 4,
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Example
    ///
    /// ```
    /// use easybase_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("VIEW"), Some(Action::View));
    /// assert_eq!(Action::parse("read"), Some(Action::View)); // Alias
    /// assert_eq!(Action::parse("edit"), Some(Action::Update)); // Alias
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" | "read" | "get" => Some(Action::View),
            "create" | "add" | "new" => Some(Action::Create),
            "update" | "edit" | "write" | "modify" => Some(Action::Update),
            "delete" | "remove" | "destroy" => Some(Action::Delete),
            "list" | "query" | "browse" | "search" => Some(Action::List),
            _ => None,
        }
    }

    /// Get all built-in actions, ordered by default bit.
    pub fn all() -> Vec<Self> {
        vec![
            Action::View,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::List,
        ]
    }

    /// Check if this is a destructive action.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Action::Delete)
    }

    /// Check if this is a read-only action.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Action::View | Action::List)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("view"), Some(Action::View));
        assert_eq!(Action::parse("VIEW"), Some(Action::View));
        assert_eq!(Action::parse("get"), Some(Action::View));

        assert_eq!(Action::parse("create"), Some(Action::Create));
        assert_eq!(Action::parse("add"), Some(Action::Create));

        assert_eq!(Action::parse("UPDATE"), Some(Action::Update));
        assert_eq!(Action::parse("write"), Some(Action::Update));

        assert_eq!(Action::parse("delete"), Some(Action::Delete));
        assert_eq!(Action::parse("remove"), Some(Action::Delete));

        assert_eq!(Action::parse("LIST"), Some(Action::List));
        assert_eq!(Action::parse("search"), Some(Action::List));

        assert_eq!(Action::parse("invalid"), None);
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_default_bits_are_distinct_single_bits() {
        let mut seen = 0u64;
        for action in Action::all() {
            let bit = action.default_bit();
            assert!(bit.is_power_of_two());
            assert_eq!(seen & bit, 0);
            seen |= bit;
        }
        assert_eq!(seen, 0b11111);
    }

    #[test]
    fn test_read_only_and_destructive() {
        assert!(Action::View.is_read_only());
        assert!(Action::List.is_read_only());
        assert!(!Action::Update.is_read_only());
        assert!(Action::Delete.is_destructive());
        assert!(!Action::Create.is_destructive());
    }

    #[test]
    fn test_display_uses_action_key() {
        assert_eq!(Action::Delete.to_string(), "DELETE");
        assert_eq!(format!("{}", Action::View), "VIEW");
    }
}

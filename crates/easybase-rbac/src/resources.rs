//! # Resource Types
//!
//! Built-in protected resource classes. Registry rows store the resource
//! type as a free string so applications can register their own types;
//! these are the ones the core services check against.

use serde::{Deserialize, Serialize};

/// Resource types guarded by the core services.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// The resource action registry itself.
    #[serde(rename = "PERMISSION")]
    Permission,
    /// Tenant-scoped collection schemas.
    #[serde(rename = "COLLECTION")]
    Collection,
    /// Media folders and files.
    #[serde(rename = "MEDIA")]
    Media,
}

impl ResourceType {
    /// Get the string key of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Permission => "PERMISSION",
            ResourceType::Collection => "COLLECTION",
            ResourceType::Media => "MEDIA",
        }
    }

    /// Parse resource type from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports plural forms)
    ///
    /// # Example
    ///
    /// ```
    /// use easybase_rbac::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("Collection"), Some(ResourceType::Collection));
    /// assert_eq!(ResourceType::parse("resource_action"), Some(ResourceType::Permission));
    /// assert_eq!(ResourceType::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "permission" | "permissions" | "resource_action" | "resource_actions"
            | "resourceaction" => Some(ResourceType::Permission),
            "collection" | "collections" => Some(ResourceType::Collection),
            "media" | "media_file" | "media_folder" | "file" | "files" => {
                Some(ResourceType::Media)
            }
            _ => None,
        }
    }

    /// Get all built-in resource types.
    pub fn all() -> Vec<Self> {
        vec![
            ResourceType::Permission,
            ResourceType::Collection,
            ResourceType::Media,
        ]
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_parsing() {
        assert_eq!(ResourceType::parse("PERMISSION"), Some(ResourceType::Permission));
        assert_eq!(ResourceType::parse("resource_actions"), Some(ResourceType::Permission));
        assert_eq!(ResourceType::parse("Collection"), Some(ResourceType::Collection));
        assert_eq!(ResourceType::parse("collections"), Some(ResourceType::Collection));
        assert_eq!(ResourceType::parse("media_file"), Some(ResourceType::Media));
        assert_eq!(ResourceType::parse("invalid"), None);
    }

    #[test]
    fn test_all_resources_round_trip() {
        let all = ResourceType::all();
        assert_eq!(all.len(), 3);
        for resource in all {
            assert_eq!(ResourceType::parse(resource.as_str()), Some(resource));
        }
    }
}

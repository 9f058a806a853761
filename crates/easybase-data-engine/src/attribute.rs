//! Collection attributes
//!
//! An attribute is one named, typed field of a collection schema. The set of
//! type descriptors is closed; rows stored against a collection are
//! interpreted through these descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Type descriptor of an attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// Short single-line text
    #[default]
    String,
    /// Long free text
    Text,
    /// 64-bit signed integer
    Integer,
    /// Arbitrary-precision decimal
    Decimal,
    /// True/false
    Boolean,
    /// Calendar date without time
    Date,
    /// UTC timestamp
    DateTime,
    /// Nested JSON document
    Json,
    /// Id of a row in another collection
    Reference,
}

impl AttributeType {
    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Json => "json",
            Self::Reference => "reference",
        }
    }

    /// Parse a type name, accepting a few common spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "string" | "varchar" => Some(Self::String),
            "text" => Some(Self::Text),
            "integer" | "int" | "long" => Some(Self::Integer),
            "decimal" | "number" | "double" => Some(Self::Decimal),
            "boolean" | "bool" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            "date_time" | "datetime" | "timestamp" => Some(Self::DateTime),
            "json" => Some(Self::Json),
            "reference" | "ref" => Some(Self::Reference),
            _ => None,
        }
    }

    /// All type descriptors.
    pub fn all() -> Vec<Self> {
        vec![
            Self::String,
            Self::Text,
            Self::Integer,
            Self::Decimal,
            Self::Boolean,
            Self::Date,
            Self::DateTime,
            Self::Json,
            Self::Reference,
        ]
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field of a collection schema.
///
/// # Examples
///
/// ```
/// use easybase_data_engine::{Attribute, AttributeType};
///
/// let title = Attribute::new("title", AttributeType::String).required();
/// assert!(title.required);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attribute {
    /// Field name, unique within its collection
    pub name: String,

    /// Type descriptor
    #[serde(default)]
    pub data_type: AttributeType,

    /// Whether rows must carry a value
    #[serde(default)]
    pub required: bool,
}

impl Attribute {
    /// Create an optional attribute.
    pub fn new(name: impl Into<String>, data_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: false,
        }
    }

    /// Mark the attribute as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Check an attribute list: every name non-blank and unique.
pub fn validate_attributes(attributes: &[Attribute]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for attribute in attributes {
        if attribute.name.trim().is_empty() {
            return Err("attribute name must not be blank".to_string());
        }
        if !seen.insert(attribute.name.as_str()) {
            return Err(format!("duplicate attribute name: {}", attribute.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parse_aliases() {
        assert_eq!(AttributeType::parse("INT"), Some(AttributeType::Integer));
        assert_eq!(AttributeType::parse("timestamp"), Some(AttributeType::DateTime));
        assert_eq!(AttributeType::parse("blob"), None);

        for data_type in AttributeType::all() {
            assert_eq!(AttributeType::parse(data_type.as_str()), Some(data_type));
        }
    }

    #[test]
    fn test_attribute_deserializes_with_defaults() {
        let attribute: Attribute = serde_json::from_str(r#"{"name":"title"}"#).unwrap();
        assert_eq!(attribute, Attribute::new("title", AttributeType::String));

        let attribute: Attribute =
            serde_json::from_str(r#"{"name":"born","data_type":"date_time","required":true}"#)
                .unwrap();
        assert_eq!(attribute.data_type, AttributeType::DateTime);
        assert!(attribute.required);
    }

    #[test]
    fn test_validate_attributes() {
        let ok = vec![
            Attribute::new("title", AttributeType::String),
            Attribute::new("price", AttributeType::Decimal),
        ];
        assert!(validate_attributes(&ok).is_ok());
        assert!(validate_attributes(&[]).is_ok());

        let blank = vec![Attribute::new("  ", AttributeType::Text)];
        assert!(validate_attributes(&blank).is_err());

        let duplicate = vec![
            Attribute::new("title", AttributeType::String),
            Attribute::new("title", AttributeType::Text),
        ];
        let err = validate_attributes(&duplicate).unwrap_err();
        assert!(err.contains("title"));
    }
}

//! The serialized form of a jsonize map, as read from and written to JSON.
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a source path is read from the XML tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XmlNodeType {
    /// The text content of exactly one element.
    Value,
    /// Zero or more elements, each becoming one array item.
    Sequence,
    /// The value of exactly one attribute.
    Attribute,
    /// Exactly one element, mapped recursively into an object.
    ComplexType,
}

/// The JSON type a value is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonNodeType {
    String,
    Integer,
    Number,
    Array,
    Object,
    Boolean,
    Null,
    Infer,
}

impl JsonNodeType {
    pub fn is_scalar(self) -> bool {
        !matches!(self, JsonNodeType::Array | JsonNodeType::Object)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonNodeType::String => "string",
            JsonNodeType::Integer => "integer",
            JsonNodeType::Number => "number",
            JsonNodeType::Array => "array",
            JsonNodeType::Object => "object",
            JsonNodeType::Boolean => "boolean",
            JsonNodeType::Null => "null",
            JsonNodeType::Infer => "infer",
        }
    }
}

impl fmt::Display for JsonNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for XmlNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            XmlNodeType::Value => "value",
            XmlNodeType::Sequence => "sequence",
            XmlNodeType::Attribute => "attribute",
            XmlNodeType::ComplexType => "complexType",
        })
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XmlNodeSpec {
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: XmlNodeType,
    /// A missing optional source writes nothing instead of failing the rule.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonNodeSpec {
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: JsonNodeType,
}

/// One rule of a jsonize map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeMapSpec {
    pub from: XmlNodeSpec,
    pub to: JsonNodeSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_mappings: Vec<NodeMapSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
}

impl XmlNodeSpec {
    pub fn new(path: impl Into<String>, node_type: XmlNodeType) -> Self {
        Self {
            path: path.into(),
            node_type,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl JsonNodeSpec {
    pub fn new(path: impl Into<String>, node_type: JsonNodeType) -> Self {
        Self {
            path: path.into(),
            node_type,
        }
    }
}

impl NodeMapSpec {
    pub fn new(from: XmlNodeSpec, to: JsonNodeSpec) -> Self {
        Self {
            from,
            to,
            item_mappings: vec![],
            transformation: None,
        }
    }

    pub fn with_item_mappings(mut self, item_mappings: Vec<NodeMapSpec>) -> Self {
        self.item_mappings = item_mappings;
        self
    }

    pub fn with_transformation(mut self, name: impl Into<String>) -> Self {
        self.transformation = Some(name.into());
        self
    }
}

//! The jsonize mapping engine.
//!
//! A jsonize map is an ordered list of rules, each binding an XML source
//! selector to a JSON destination. This crate loads and validates maps
//! ([`JsonizeMap`]), and evaluates them against any tree implementing
//! [`SourceNode`] ([`convert`]).
//!
//! ```
//! use jsonize_core::{JsonizeMap, LoadOptions, TransformationRegistry, convert};
//! use jsonize_xml::XmlDocument;
//! use serde_json::json;
//!
//! let map = JsonizeMap::from_json_str(
//!     r#"[{"from": {"path": "/Root/Name", "type": "value"},
//!          "to": {"path": "name", "type": "string"}}]"#,
//!     &TransformationRegistry::default(),
//!     &LoadOptions::default(),
//! )
//! .unwrap();
//! let doc = XmlDocument::parse("<Root><Name>Alice</Name></Root>").unwrap();
//! assert_eq!(convert(doc.root_node(), &map).unwrap(), json!({ "name": "Alice" }));
//! ```

pub mod coerce;
pub mod convert;
pub mod error;
mod evaluator;
pub mod infer;
pub mod map;
pub mod model;
pub mod transform;

pub use coerce::coerce;
pub use convert::{convert, convert_into};
pub use error::{
    CoercionError, ConversionError, ErrorKind, InferError, LoadIssue, MapLoadError, MappingError,
    RuleId,
};
pub use infer::{InferOptions, infer_map};
pub use map::{JsonizeMap, LoadOptions, NodeMap};
pub use model::{JsonNodeSpec, JsonNodeType, NodeMapSpec, XmlNodeSpec, XmlNodeType};
pub use transform::{TransformContext, Transformation, TransformationRegistry};

pub use jsonize_xpath::{Namespaces, SourceNode};

//! Declarative XML to JSON conversion.
//!
//! A jsonize map is a JSON array of rules. Each rule selects nodes of an XML
//! document with a restricted XPath-style path and says where, and as which
//! JSON type, their values land in the output document.
//!
//! ```
//! use jsonize::{JsonizeMap, LoadOptions, TransformationRegistry, convert_str};
//! use serde_json::json;
//!
//! let map = JsonizeMap::from_json_str(
//!     r#"[{"from": {"path": "/Order/Id", "type": "value"},
//!          "to": {"path": "order.id", "type": "integer"}}]"#,
//!     &TransformationRegistry::default(),
//!     &LoadOptions::default(),
//! )
//! .unwrap();
//! let json = convert_str("<Order><Id>42</Id></Order>", &map).unwrap();
//! assert_eq!(json, json!({ "order": { "id": 42 } }));
//! ```
//!
//! The pieces live in their own crates and are re-exported here:
//! source paths in [`xpath`], destination paths in [`jpath`], the engine in
//! [`jsonize_core`], roxmltree documents in [`xml`] and batch executors in
//! [`executor`].

pub mod batch;
pub mod error;
pub mod files;

pub use batch::{convert_batch, convert_files_batch};
pub use error::JsonizeError;
pub use files::{
    convert_file, convert_str, document_namespaces, infer_map_file, load_map_file,
    merge_namespaces, write_json, xml_file_to_json_file,
};

pub use jsonize_core::*;
pub use jsonize_executor as executor;
pub use jsonize_executor::{Executor, ExecutorImpl, SyncExecutor};
pub use jsonize_jpath as jpath;
pub use jsonize_xml as xml;
pub use jsonize_xml::XmlDocument;
pub use jsonize_xpath as xpath;

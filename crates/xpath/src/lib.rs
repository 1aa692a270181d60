//! Source paths for jsonize maps.
//!
//! A source path is a small, relative addressing scheme over an XML tree:
//! element steps, a trailing attribute step, `.`/`..`, `*`, the `//`
//! descendant separator and a handful of ElementPath-style predicates. It is
//! deliberately not XPath 1.0: there are no axes, functions or operators.
//!
//! Paths are parsed and bound to namespace prefixes once, when a map is
//! loaded, and then resolved against any tree implementing [`SourceNode`].

pub mod ast;
pub mod axes;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod namespaces;
pub mod parser;

pub use ast::{Axis, NameTest, NodeTest, Predicate, SourcePath, Step};
pub use datasource::{NodeType, QName, SourceNode};
pub use engine::{document_root, resolve_required, resolve_single, select};
pub use error::{ResolveError, XPathError};
pub use namespaces::{Namespaces, XML_NAMESPACE};
pub use parser::parse_source_path;

/// Parses `input` and binds its prefixes against `namespaces`.
///
/// This is the entry point used at map-load time; any lexical problem or
/// unknown prefix is reported here rather than during a conversion.
pub fn compile(input: &str, namespaces: &Namespaces) -> Result<SourcePath, XPathError> {
    let mut path = parse_source_path(input)?;
    path.bind(namespaces).map_err(|prefix| XPathError::UnboundPrefix {
        path: input.to_string(),
        prefix,
    })?;
    Ok(path)
}

//! Destination paths for jsonize maps and the writer that builds the output
//! JSON tree from them.
//!
//! A path is an optional anchor (`$` or `@`, both meaning "the current output
//! scope") followed by key, index and append segments:
//!
//! ```
//! use jsonize_jpath::{parse_path, write};
//! use serde_json::json;
//!
//! let mut doc = json!({});
//! write(&mut doc, &parse_path("$.point.x").unwrap(), json!(1.5)).unwrap();
//! assert_eq!(doc, json!({ "point": { "x": 1.5 } }));
//! ```

pub mod ast;
pub mod error;
mod parser;
pub mod writer;

// --- Public API ---
pub use ast::{Anchor, JsonPath, MAX_INDEX, PathSegment};
pub use error::JPathError;
pub use parser::parse_path;
pub use writer::{append, ensure_array, get, write};

impl std::str::FromStr for JsonPath {
    type Err = JPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_str_and_write() {
        let path: JsonPath = "$.meta['content-type']".parse().unwrap();
        let mut doc = json!({});
        write(&mut doc, &path, json!("text/xml")).unwrap();
        assert_eq!(doc, json!({ "meta": { "content-type": "text/xml" } }));
    }

    #[test]
    fn test_child_builds_quoted_keys() {
        let path = JsonPath::new(Anchor::Root).child("a.b").child("c");
        assert_eq!(path.to_string(), "$['a.b'].c");
        assert_eq!(parse_path(&path.to_string()).unwrap(), path);
    }
}

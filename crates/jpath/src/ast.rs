//! Defines the Abstract Syntax Tree (AST) for destination paths.
use std::fmt;

/// Where a destination path starts. Every anchor denotes the current output
/// scope: the document root for top-level rules, the item being built for
/// rules nested in `itemMappings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// `$.a.b`
    Root,
    /// `@.a.b`
    Current,
    /// `a.b`
    #[default]
    Implicit,
}

/// Largest array index a destination path may address. Writing at an index
/// pads the array with `null` up to it.
pub const MAX_INDEX: usize = 100_000;

/// Represents a segment in a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key (e.g., `.name` or `['odd.key']`).
    Key(String),
    /// An array index (e.g., `[0]`).
    Index(usize),
    /// A new element at the end of an array (`[]`).
    Append,
}

/// A parsed destination path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonPath {
    pub anchor: Anchor,
    pub segments: Vec<PathSegment>,
}

impl JsonPath {
    pub fn new(anchor: Anchor) -> Self {
        Self {
            anchor,
            segments: vec![],
        }
    }

    /// True if the path addresses the scope itself (`$`, `@` or the empty path).
    pub fn is_scope_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a copy of this path extended by one key.
    pub fn child(&self, key: &str) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Key(key.to_string()));
        path
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '\'' | '"') || c.is_whitespace())
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.anchor {
            Anchor::Root => write!(f, "$")?,
            Anchor::Current => write!(f, "@")?,
            Anchor::Implicit => {}
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => {
                    let leading = i == 0 && self.anchor == Anchor::Implicit && !key.starts_with(['$', '@']);
                    if leading {
                        write!(f, "{}", key)?;
                    } else {
                        write!(f, ".{}", key)?;
                    }
                }
                PathSegment::Key(key) if key.contains('\'') => write!(f, "[\"{}\"]", key)?,
                PathSegment::Key(key) => write!(f, "['{}']", key)?,
                PathSegment::Index(n) => write!(f, "[{}]", n)?,
                PathSegment::Append => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}

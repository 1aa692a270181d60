use thiserror::Error;

/// Errors raised while compiling a source path. These are load-time errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XPathError {
    #[error("Source path parse error in '{0}': {1}")]
    XPathParse(String, String),

    #[error("Invalid source path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("Unbound namespace prefix '{prefix}' in '{path}'")]
    UnboundPrefix { path: String, prefix: String },
}

/// Errors raised while resolving a compiled path against a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No node matches '{path}'")]
    PathNotFound { path: String },

    #[error("'{path}' matches {count} nodes where exactly one was expected")]
    AmbiguousMatch { path: String, count: usize },
}

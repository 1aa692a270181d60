use crate::model::JsonNodeType;
use jsonize_jpath::JPathError;
use jsonize_xpath::ResolveError;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Identifies a rule inside a map: `#2` is the third top-level rule,
/// `#2.itemMappings[0]` the first item mapping below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleId(String);

impl RuleId {
    pub fn top_level(index: usize) -> Self {
        Self(format!("#{}", index))
    }

    pub fn item(&self, index: usize) -> Self {
        Self(format!("{}.itemMappings[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("'{raw}' is not a valid {target}")]
    InvalidLexicalForm { raw: String, target: JsonNodeType },

    #[error("'{raw}' has a fractional part and cannot be an integer")]
    FractionalInteger { raw: String },

    #[error("'{raw}' is out of range for {target}")]
    OutOfRange { raw: String, target: JsonNodeType },

    #[error("'{raw}' is not empty and cannot be null")]
    NotNull { raw: String },

    #[error("{target} is not a scalar type")]
    NotScalar { target: JsonNodeType },
}

/// A single problem found while loading a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    pub rule: RuleId,
    pub message: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

fn format_issues(issues: &[LoadIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Error, Debug)]
pub enum MapLoadError {
    #[error("Failed to read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("Map is not valid JSON or does not follow the map schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Map has {} invalid rule(s):\n{}", .0.len(), format_issues(.0))]
    Invalid(Vec<LoadIssue>),
}

/// What went wrong while evaluating one rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("no node matches '{path}'")]
    PathNotFound { path: String },

    #[error("{count} nodes match '{path}' where exactly one is expected")]
    AmbiguousMatch { path: String, count: usize },

    #[error("type coercion failed: {0}")]
    TypeCoercion(#[from] CoercionError),

    #[error("transformation '{name}' failed: {message}")]
    Transformation { name: String, message: String },

    #[error("path conflict at '{path}': {message}")]
    PathConflict { path: String, message: String },
}

impl From<ResolveError> for ErrorKind {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::PathNotFound { path } => ErrorKind::PathNotFound { path },
            ResolveError::AmbiguousMatch { path, count } => ErrorKind::AmbiguousMatch { path, count },
        }
    }
}

impl From<JPathError> for ErrorKind {
    fn from(err: JPathError) -> Self {
        match err {
            JPathError::PathConflict { path, message } => ErrorKind::PathConflict { path, message },
            // Destination paths are parsed when the map is loaded.
            JPathError::JPathParse(path, message) => ErrorKind::PathConflict { path, message },
        }
    }
}

fn describe_position(position: &Option<usize>) -> String {
    position
        .map(|p| format!(" at item {}", p))
        .unwrap_or_default()
}

/// A failed rule, tagged with where it sits in the map and what it read and
/// wrote.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Rule {rule} ({source_path} -> {target_path}){}: {kind}",
    describe_position(.position)
)]
pub struct MappingError {
    pub rule: RuleId,
    pub source_path: String,
    pub target_path: String,
    /// 1-based position inside the innermost enclosing sequence.
    pub position: Option<usize>,
    pub kind: ErrorKind,
}

/// Every rule failure of one conversion, plus the tree built by the rules
/// that succeeded.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Conversion failed: {} rule failure(s), first: {}", .failures.len(), first_failure(.failures))]
pub struct ConversionError {
    pub failures: Vec<MappingError>,
    pub partial: Value,
}

fn first_failure(failures: &[MappingError]) -> String {
    failures.first().map(ToString::to_string).unwrap_or_default()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferError {
    #[error("Namespace '{uri}' has no prefix bound to it")]
    UnboundNamespace { uri: String },

    #[error(
        "Element '{name}' has no namespace but unprefixed steps select the default namespace"
    )]
    ShadowedDefaultNamespace { name: String },
}

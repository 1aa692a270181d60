use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JPathError {
    #[error("JSON path parse error in '{0}': {1}")]
    JPathParse(String, String),

    #[error("Path conflict at '{path}': {message}")]
    PathConflict { path: String, message: String },
}

// src/error.rs
use jsonize_core::{ConversionError, InferError, MapLoadError};
use jsonize_xml::XmlParseError;
use thiserror::Error;

/// Everything that can go wrong between reading files and writing JSON.
#[derive(Error, Debug)]
pub enum JsonizeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing failed: {0}")]
    Xml(#[from] XmlParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load map: {0}")]
    MapLoad(#[from] MapLoadError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Map inference failed: {0}")]
    Infer(#[from] InferError),
}

impl JsonizeError {
    /// The tree built by the rules that succeeded, when this is a conversion
    /// failure.
    pub fn partial(&self) -> Option<&serde_json::Value> {
        match self {
            JsonizeError::Conversion(err) => Some(&err.partial),
            _ => None,
        }
    }
}

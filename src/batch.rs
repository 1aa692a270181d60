//! Converts many documents against one map on an [`Executor`].
//!
//! One conversion never spans threads. Each document is a job of its own,
//! and every job shares the same compiled map.
use crate::error::JsonizeError;
use crate::files::{convert_file, convert_str};
use jsonize_core::JsonizeMap;
use jsonize_executor::Executor;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Converts every document in `documents`. The result for document `i` is at
/// index `i`, whatever order the jobs ran in.
pub fn convert_batch<E: Executor>(
    executor: &E,
    map: Arc<JsonizeMap>,
    documents: Vec<String>,
) -> Vec<Result<Value, JsonizeError>> {
    log::info!(
        "Converting {} document(s) with {} (parallelism {})",
        documents.len(),
        executor.name(),
        executor.parallelism()
    );
    executor.execute_all(documents, move |xml| convert_str(&xml, &map))
}

/// Like [`convert_batch`], but each job reads its own file.
pub fn convert_files_batch<E: Executor>(
    executor: &E,
    map: Arc<JsonizeMap>,
    paths: Vec<PathBuf>,
) -> Vec<Result<Value, JsonizeError>> {
    log::info!(
        "Converting {} file(s) with {} (parallelism {})",
        paths.len(),
        executor.name(),
        executor.parallelism()
    );
    executor.execute_all(paths, move |path| convert_file(&path, &map))
}

//! Executors for batch conversion.
//!
//! One conversion is always single-threaded; the unit of parallelism is a
//! whole document. An executor runs one job per document and hands the
//! results back in input order.
//!
//! ## Available Executors
//!
//! - [`SyncExecutor`]: Sequential execution
//! - [`RayonExecutor`]: Work-stealing thread pool (feature: `rayon`)

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

use std::fmt::Debug;

/// Runs independent jobs, possibly in parallel.
pub trait Executor: Send + Sync + Debug {
    /// Applies `f` to every item. Results are returned in the same order as
    /// the input items, whatever order the jobs actually ran in.
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static;

    /// How many jobs may run at once. 1 for sequential executors.
    fn parallelism(&self) -> usize;

    /// A human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Runs every job on the calling thread, one after the other.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}

/// Holds one of the concrete executors. `Executor` has generic methods and
/// cannot be a trait object, so callers that pick an executor at runtime
/// use this enum.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    Sync(SyncExecutor),

    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl ExecutorImpl {
    /// An executor running at most `jobs` conversions at once. `1` is
    /// sequential; `0` uses every available core.
    pub fn with_jobs(jobs: usize) -> Self {
        match jobs {
            1 => ExecutorImpl::Sync(SyncExecutor::new()),
            #[cfg(feature = "rayon")]
            0 => ExecutorImpl::Rayon(RayonExecutor::new()),
            #[cfg(feature = "rayon")]
            n => RayonExecutor::with_threads(n)
                .map(ExecutorImpl::Rayon)
                .unwrap_or_else(|e| {
                    log::warn!("Falling back to sequential execution: {}", e);
                    ExecutorImpl::Sync(SyncExecutor::new())
                }),
            #[cfg(not(feature = "rayon"))]
            _ => ExecutorImpl::Sync(SyncExecutor::new()),
        }
    }
}

impl Executor for ExecutorImpl {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.execute_all(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.execute_all(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        #[cfg(feature = "rayon")]
        {
            ExecutorImpl::Rayon(RayonExecutor::new())
        }
        #[cfg(not(feature = "rayon"))]
        {
            ExecutorImpl::Sync(SyncExecutor::new())
        }
    }
}

//! Resolves a compiled [`SourcePath`] against a generic [`SourceNode`].

use crate::ast::{SourcePath, Step};
use crate::axes;
use crate::datasource::SourceNode;
use crate::error::ResolveError;

/// Walks up from any node to the root of its document.
pub fn document_root<'a, N: SourceNode<'a>>(node: N) -> N {
    let mut current = node;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}

/// Selects every node matched by `path`, deduplicated and in document order.
///
/// Relative paths start at `context`; absolute paths start at the document
/// root that `context` belongs to.
pub fn select<'a, N>(path: &SourcePath, context: N) -> Vec<N>
where
    N: SourceNode<'a> + 'a,
{
    let start = if path.is_absolute {
        document_root(context)
    } else {
        context
    };

    let mut current = vec![start];
    for step in &path.steps {
        current = evaluate_step(step, &current);
        if current.is_empty() {
            break;
        }
    }
    current
}

/// Evaluates one step for every context node. Predicates are applied to each
/// context node's own candidate list, so `Item[1]` means the first `Item`
/// child of each parent.
fn evaluate_step<'a, N>(step: &Step, context_nodes: &[N]) -> Vec<N>
where
    N: SourceNode<'a> + 'a,
{
    let mut results = Vec::new();
    for &node in context_nodes {
        let mut candidates: Vec<N> = axes::collect_axis(step.axis, node)
            .into_iter()
            .filter(|n| axes::matches_test(step.axis, &step.test, *n))
            .collect();
        for predicate in &step.predicates {
            candidates = axes::apply_predicate(predicate, candidates);
        }
        results.extend(candidates);
    }
    results.sort();
    results.dedup();
    results
}

/// Selects at most one node. No match is `Ok(None)`; more than one is an
/// [`ResolveError::AmbiguousMatch`].
pub fn resolve_single<'a, N>(path: &SourcePath, context: N) -> Result<Option<N>, ResolveError>
where
    N: SourceNode<'a> + 'a,
{
    let mut nodes = select(path, context);
    match nodes.len() {
        0 => Ok(None),
        1 => Ok(nodes.pop()),
        count => Err(ResolveError::AmbiguousMatch {
            path: path.to_string(),
            count,
        }),
    }
}

/// Like [`resolve_single`], but a missing node is a [`ResolveError::PathNotFound`].
pub fn resolve_required<'a, N>(path: &SourcePath, context: N) -> Result<N, ResolveError>
where
    N: SourceNode<'a> + 'a,
{
    resolve_single(path, context)?.ok_or_else(|| ResolveError::PathNotFound {
        path: path.to_string(),
    })
}

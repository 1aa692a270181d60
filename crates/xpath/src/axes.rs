//! Pure functions collecting the nodes a step can reach and filtering them.

use crate::ast::{Axis, NameTest, NodeTest, Predicate};
use crate::datasource::{NodeType, QName, SourceNode};

/// Nodes reachable from `node` along `axis`, in document order.
pub fn collect_axis<'a, N: SourceNode<'a>>(axis: Axis, node: N) -> Vec<N> {
    match axis {
        Axis::Child => node.children().collect(),
        Axis::Attribute => node.attributes().collect(),
        Axis::SelfAxis => vec![node],
        Axis::Parent => node.parent().into_iter().collect(),
        Axis::DescendantOrSelf => {
            let mut results = vec![node];
            collect_descendants(node, &mut results);
            results
        }
    }
}

fn collect_descendants<'a, N: SourceNode<'a>>(node: N, results: &mut Vec<N>) {
    for child in node.children() {
        results.push(child);
        collect_descendants(child, results);
    }
}

pub fn name_matches(test: &NameTest, name: Option<QName<'_>>) -> bool {
    name.is_some_and(|q| q.local_part == test.local && q.namespace == test.namespace.as_deref())
}

pub fn matches_test<'a, N: SourceNode<'a>>(axis: Axis, test: &NodeTest, node: N) -> bool {
    match test {
        NodeTest::Node => true,
        NodeTest::Wildcard => node.node_type() == NodeType::Element,
        NodeTest::Name(name) => {
            let expected = if axis == Axis::Attribute {
                NodeType::Attribute
            } else {
                NodeType::Element
            };
            node.node_type() == expected && name_matches(name, node.name())
        }
    }
}

fn child_elements<'a, N: SourceNode<'a>>(node: N, name: &NameTest) -> impl Iterator<Item = N> + 'a
where
    N: 'a,
{
    let name = name.clone();
    node.children()
        .filter(move |c| c.node_type() == NodeType::Element && name_matches(&name, c.name()))
}

/// Applies one predicate to the candidate list of a single context node.
pub fn apply_predicate<'a, N: SourceNode<'a> + 'a>(predicate: &Predicate, candidates: Vec<N>) -> Vec<N> {
    match predicate {
        Predicate::Position(n) => n
            .checked_sub(1)
            .and_then(|i| candidates.into_iter().nth(i))
            .into_iter()
            .collect(),
        Predicate::Last => candidates.into_iter().last().into_iter().collect(),
        Predicate::HasAttribute(name) => candidates
            .into_iter()
            .filter(|c| c.attributes().any(|a| name_matches(name, a.name())))
            .collect(),
        Predicate::AttributeEquals(name, value) => candidates
            .into_iter()
            .filter(|c| {
                c.attributes()
                    .any(|a| name_matches(name, a.name()) && a.string_value() == *value)
            })
            .collect(),
        Predicate::HasChild(name) => candidates
            .into_iter()
            .filter(|c| child_elements(*c, name).next().is_some())
            .collect(),
        Predicate::ChildEquals(name, value) => candidates
            .into_iter()
            .filter(|c| child_elements(*c, name).any(|e| e.string_value() == *value))
            .collect(),
    }
}

//! Defines the read-only XML tree contract the resolver runs against.
use std::hash::Hash;

/// An expanded name: the namespace URI (if any) and the local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub namespace: Option<&'a str>,
    pub local_part: &'a str,
}

/// The type of a node in the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// The contract for a node of an already-parsed XML document.
///
/// The engine never touches markup: it only navigates through this trait, so
/// any tree (roxmltree, a test fixture, a streaming DOM) can be converted.
/// `Ord` must follow document order; the resolver relies on it to return
/// sequence matches in source order.
///
/// `'a` is the lifetime of the underlying document.
pub trait SourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    fn node_type(&self) -> NodeType;

    /// The expanded name of an element or attribute; `None` for other nodes.
    fn name(&self) -> Option<QName<'a>>;

    /// For text and attribute nodes their content; for elements and the root,
    /// the concatenation of all descendant text nodes.
    fn string_value(&self) -> String;

    /// Attribute nodes of an element, in document order.
    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// Child nodes, in document order.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// `None` only for the root node.
    fn parent(&self) -> Option<Self>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::cmp::Ordering;
    use std::hash::Hasher;

    #[derive(Debug, Clone)]
    struct MockNodeData {
        node_type: NodeType,
        namespace: Option<&'static str>,
        name: Option<&'static str>,
        value: String,
        children: Vec<usize>,
        attributes: Vec<usize>,
        parent: Option<usize>,
    }

    /// An arena-backed tree. Node ids are allocated in document order as
    /// long as nodes are appended depth-first.
    #[derive(Debug, Default)]
    pub struct MockTree {
        nodes: Vec<MockNodeData>,
    }

    #[derive(Debug, Clone, Copy)]
    pub struct MockNode<'a> {
        pub id: usize,
        pub tree: &'a MockTree,
    }

    impl MockTree {
        pub fn new() -> Self {
            let mut tree = Self::default();
            tree.push(NodeType::Root, None, None, String::new(), None);
            tree
        }

        pub fn root(&self) -> MockNode<'_> {
            MockNode { id: 0, tree: self }
        }

        fn push(
            &mut self,
            node_type: NodeType,
            namespace: Option<&'static str>,
            name: Option<&'static str>,
            value: String,
            parent: Option<usize>,
        ) -> usize {
            let id = self.nodes.len();
            self.nodes.push(MockNodeData {
                node_type,
                namespace,
                name,
                value,
                children: vec![],
                attributes: vec![],
                parent,
            });
            id
        }

        pub fn element(&mut self, parent: usize, name: &'static str) -> usize {
            self.element_ns(parent, None, name)
        }

        pub fn element_ns(
            &mut self,
            parent: usize,
            namespace: Option<&'static str>,
            name: &'static str,
        ) -> usize {
            let id = self.push(NodeType::Element, namespace, Some(name), String::new(), Some(parent));
            self.nodes[parent].children.push(id);
            id
        }

        pub fn attribute(&mut self, parent: usize, name: &'static str, value: &str) -> usize {
            let id = self.push(NodeType::Attribute, None, Some(name), value.to_string(), Some(parent));
            self.nodes[parent].attributes.push(id);
            id
        }

        pub fn text(&mut self, parent: usize, value: &str) -> usize {
            let id = self.push(NodeType::Text, None, None, value.to_string(), Some(parent));
            self.nodes[parent].children.push(id);
            id
        }

        /// `<parent><name>text</name></parent>`
        pub fn leaf(&mut self, parent: usize, name: &'static str, text: &str) -> usize {
            let id = self.element(parent, name);
            self.text(id, text);
            id
        }

        fn collect_text(&self, id: usize, out: &mut String) {
            let data = &self.nodes[id];
            if data.node_type == NodeType::Text {
                out.push_str(&data.value);
            }
            for &child in &data.children {
                self.collect_text(child, out);
            }
        }
    }

    impl PartialEq for MockNode<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }
    impl Eq for MockNode<'_> {}

    impl PartialOrd for MockNode<'_> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for MockNode<'_> {
        fn cmp(&self, other: &Self) -> Ordering {
            self.id.cmp(&other.id)
        }
    }

    impl Hash for MockNode<'_> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl<'a> SourceNode<'a> for MockNode<'a> {
        fn node_type(&self) -> NodeType {
            self.tree.nodes[self.id].node_type
        }

        fn name(&self) -> Option<QName<'a>> {
            let data = &self.tree.nodes[self.id];
            data.name.map(|local_part| QName {
                namespace: data.namespace,
                local_part,
            })
        }

        fn string_value(&self) -> String {
            let data = &self.tree.nodes[self.id];
            match data.node_type {
                NodeType::Element | NodeType::Root => {
                    let mut out = String::new();
                    self.tree.collect_text(self.id, &mut out);
                    out
                }
                _ => data.value.clone(),
            }
        }

        fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            let ids = tree.nodes[self.id].attributes.clone();
            Box::new(ids.into_iter().map(move |id| MockNode { id, tree }))
        }

        fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            let ids = tree.nodes[self.id].children.clone();
            Box::new(ids.into_iter().map(move |id| MockNode { id, tree }))
        }

        fn parent(&self) -> Option<Self> {
            self.tree.nodes[self.id].parent.map(|id| MockNode {
                id,
                tree: self.tree,
            })
        }
    }
}

//! Adapts parsed `roxmltree` documents to the [`SourceNode`] contract so the
//! jsonize engine can navigate them.
use jsonize_xpath::{Namespaces, NodeType, QName, SourceNode};
use roxmltree::Node;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

pub use roxmltree::Error as XmlParseError;

/// Wrapper around `roxmltree::Document`.
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, XmlParseError> {
        let doc = roxmltree::Document::parse(text)?;
        log::debug!(
            "Parsed XML document with root element '{}'",
            doc.root_element().tag_name().name()
        );
        Ok(Self { doc })
    }

    /// The document node, parent of the root element.
    pub fn root_node(&self) -> XmlNode<'_, 'input> {
        XmlNode::Node(self.doc.root())
    }

    pub fn root_element(&self) -> XmlNode<'_, 'input> {
        XmlNode::Node(self.doc.root_element())
    }

    /// Every prefix declared anywhere in the document. When a prefix is
    /// redeclared, the first declaration in document order wins.
    pub fn namespaces(&self) -> Namespaces {
        let mut namespaces = Namespaces::new();
        for node in self.doc.descendants().filter(Node::is_element) {
            for ns in node.namespaces() {
                let prefix = ns.name().unwrap_or("");
                if namespaces.uri(prefix).is_none() {
                    namespaces.insert(prefix, ns.uri());
                }
            }
        }
        namespaces
    }
}

/// A node of an [`XmlDocument`]. `roxmltree` keeps attributes as data on
/// their element, so they are addressed by parent and index.
#[derive(Debug, Clone, Copy)]
pub enum XmlNode<'a, 'input> {
    Node(Node<'a, 'input>),
    Attribute { parent: Node<'a, 'input>, index: usize },
}

impl<'a, 'input> XmlNode<'a, 'input> {
    pub fn inner(&self) -> Option<Node<'a, 'input>> {
        match self {
            XmlNode::Node(node) => Some(*node),
            XmlNode::Attribute { .. } => None,
        }
    }

    fn sort_key(&self) -> (usize, usize) {
        match self {
            XmlNode::Node(node) => (node.id().get_usize(), 0),
            XmlNode::Attribute { parent, index } => (parent.id().get_usize(), index + 1),
        }
    }
}

impl PartialEq for XmlNode<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for XmlNode<'_, '_> {}

impl PartialOrd for XmlNode<'_, '_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// An element sorts before its attributes, which sort before its children:
// node ids follow document order and attributes share their parent's id.
impl Ord for XmlNode<'_, '_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for XmlNode<'_, '_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl<'a> SourceNode<'a> for XmlNode<'a, 'a> {
    fn node_type(&self) -> NodeType {
        match self {
            XmlNode::Node(node) if node.is_root() => NodeType::Root,
            XmlNode::Node(node) if node.is_text() => NodeType::Text,
            XmlNode::Node(node) if node.is_comment() => NodeType::Comment,
            XmlNode::Node(node) if node.is_pi() => NodeType::ProcessingInstruction,
            XmlNode::Node(_) => NodeType::Element,
            XmlNode::Attribute { .. } => NodeType::Attribute,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        match self {
            XmlNode::Node(node) if node.is_element() => {
                let tag = node.tag_name();
                Some(QName {
                    namespace: tag.namespace(),
                    local_part: tag.name(),
                })
            }
            XmlNode::Node(_) => None,
            XmlNode::Attribute { parent, index } => {
                parent.attributes().nth(*index).map(|attr| QName {
                    namespace: attr.namespace(),
                    local_part: attr.name(),
                })
            }
        }
    }

    fn string_value(&self) -> String {
        match self {
            XmlNode::Node(node) if node.is_element() || node.is_root() => node
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect(),
            XmlNode::Node(node) if node.is_pi() => node
                .pi()
                .and_then(|pi| pi.value)
                .unwrap_or_default()
                .to_string(),
            XmlNode::Node(node) => node.text().unwrap_or_default().to_string(),
            XmlNode::Attribute { parent, index } => parent
                .attributes()
                .nth(*index)
                .map(|attr| attr.value().to_string())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Node(node) => {
                let parent = *node;
                let count = node.attributes().len();
                Box::new((0..count).map(move |index| XmlNode::Attribute { parent, index }))
            }
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Node(node) => Box::new(node.children().map(XmlNode::Node)),
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match self {
            XmlNode::Node(node) => node.parent().map(XmlNode::Node),
            XmlNode::Attribute { parent, .. } => Some(XmlNode::Node(*parent)),
        }
    }
}

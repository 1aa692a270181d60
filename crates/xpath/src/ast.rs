//! Defines the Abstract Syntax Tree (AST) for source paths.
use crate::namespaces::Namespaces;
use std::fmt;

/// A parsed source path, like `/Root/Items/Item[2]/@id` or `./Name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    /// True if the path starts from the document root (e.g., `/Root`).
    pub is_absolute: bool,
    pub steps: Vec<Step>,
}

/// A single step of a source path, like `Item[@type='a']`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

/// The direction of movement from the context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Attribute,
    SelfAxis,
    Parent,
    /// Produced by the `//` separator only.
    DescendantOrSelf,
}

/// A test applied to the nodes collected along an axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// A qualified name (e.g., `Item`, `gml:pos`).
    Name(NameTest),
    /// `*`, any element.
    Wildcard,
    /// Any node, used by `.`, `..` and `//`.
    Node,
}

/// A qualified name as written in the path, plus the namespace URI it is
/// bound to once [`SourcePath::bind`] has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    pub prefix: Option<String>,
    pub local: String,
    pub namespace: Option<String>,
}

impl NameTest {
    pub fn new(prefix: Option<&str>, local: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
            namespace: None,
        }
    }
}

/// An ElementPath-style filter on the nodes selected by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[n]`, 1-based.
    Position(usize),
    /// `[last()]`
    Last,
    /// `[@name]`
    HasAttribute(NameTest),
    /// `[@name='value']`
    AttributeEquals(NameTest, String),
    /// `[name]`
    HasChild(NameTest),
    /// `[name='value']`
    ChildEquals(NameTest, String),
}

impl Step {
    pub fn child(test: NodeTest) -> Self {
        Self {
            axis: Axis::Child,
            test,
            predicates: vec![],
        }
    }

    pub fn attribute(name: NameTest) -> Self {
        Self {
            axis: Axis::Attribute,
            test: NodeTest::Name(name),
            predicates: vec![],
        }
    }

    pub fn self_node() -> Self {
        Self {
            axis: Axis::SelfAxis,
            test: NodeTest::Node,
            predicates: vec![],
        }
    }

    pub fn parent() -> Self {
        Self {
            axis: Axis::Parent,
            test: NodeTest::Node,
            predicates: vec![],
        }
    }

    pub fn descendant_or_self() -> Self {
        Self {
            axis: Axis::DescendantOrSelf,
            test: NodeTest::Node,
            predicates: vec![],
        }
    }
}

impl SourcePath {
    /// True if the last step selects an attribute.
    pub fn selects_attribute(&self) -> bool {
        self.steps
            .last()
            .is_some_and(|step| step.axis == Axis::Attribute)
    }

    /// Resolves every prefix in the path to its namespace URI.
    ///
    /// Unprefixed element names take the default namespace (the `""`
    /// binding) when there is one; unprefixed attribute names never do.
    /// Returns the first prefix that has no binding.
    pub fn bind(&mut self, namespaces: &Namespaces) -> Result<(), String> {
        for step in &mut self.steps {
            let is_attribute = step.axis == Axis::Attribute;
            if let NodeTest::Name(name) = &mut step.test {
                bind_name(name, namespaces, is_attribute)?;
            }
            for predicate in &mut step.predicates {
                match predicate {
                    Predicate::HasAttribute(name) | Predicate::AttributeEquals(name, _) => {
                        bind_name(name, namespaces, true)?
                    }
                    Predicate::HasChild(name) | Predicate::ChildEquals(name, _) => {
                        bind_name(name, namespaces, false)?
                    }
                    Predicate::Position(_) | Predicate::Last => {}
                }
            }
        }
        Ok(())
    }
}

fn bind_name(name: &mut NameTest, namespaces: &Namespaces, is_attribute: bool) -> Result<(), String> {
    name.namespace = match &name.prefix {
        Some(prefix) => Some(
            namespaces
                .uri(prefix)
                .ok_or_else(|| prefix.clone())?
                .to_string(),
        ),
        None if is_attribute => None,
        None => namespaces.default_namespace().map(str::to_string),
    };
    Ok(())
}

impl fmt::Display for NameTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Position(n) => write!(f, "[{}]", n),
            Predicate::Last => write!(f, "[last()]"),
            Predicate::HasAttribute(name) => write!(f, "[@{}]", name),
            Predicate::AttributeEquals(name, value) => write!(f, "[@{}='{}']", name, value),
            Predicate::HasChild(name) => write!(f, "[{}]", name),
            Predicate::ChildEquals(name, value) => write!(f, "[{}='{}']", name, value),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.axis, &self.test) {
            // Rendered as the empty segment between the two slashes of `//`.
            (Axis::DescendantOrSelf, _) => return Ok(()),
            (Axis::SelfAxis, _) => write!(f, ".")?,
            (Axis::Parent, _) => write!(f, "..")?,
            (Axis::Attribute, NodeTest::Name(name)) => write!(f, "@{}", name)?,
            (_, NodeTest::Name(name)) => write!(f, "{}", name)?,
            (_, NodeTest::Wildcard) => write!(f, "*")?,
            (_, NodeTest::Node) => write!(f, "node()")?,
        }
        for predicate in &self.predicates {
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absolute {
            write!(f, "/")?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

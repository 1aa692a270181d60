//! Derives a jsonize map from a sample document.
//!
//! Conventions:
//! - attributes become `attribute` rules keyed `{attribute_tag}{name}`;
//! - leaf elements become `value` rules keyed `{element}.{value_tag}`, or
//!   the element key itself when `value_tag` is empty;
//! - elements repeated under one parent become `sequence` rules whose item
//!   mappings are inferred from all occurrences together;
//! - every target uses the `infer` type.
//!
//! Parts that only some occurrences of a repeated element have are marked
//! `optional`, so the inferred map converts every occurrence.
use crate::error::InferError;
use crate::model::{JsonNodeSpec, JsonNodeType, NodeMapSpec, XmlNodeSpec, XmlNodeType};
use jsonize_jpath::{Anchor, JsonPath};
use jsonize_xpath::{Namespaces, NodeType, QName, SourceNode, document_root};

/// Settings for [`infer_map`].
#[derive(Debug, Clone)]
pub struct InferOptions {
    /// Key under which an element's text is written. Empty writes the text
    /// at the element key.
    pub value_tag: String,
    /// Prefix prepended to keys coming from attributes.
    pub attribute_tag: String,
    /// Keep `prefix:` in JSON keys. Source paths always keep their prefixes.
    pub with_namespaces: bool,
    /// Prefixes used to write qualified names in source paths.
    pub namespaces: Namespaces,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            value_tag: "value".to_string(),
            attribute_tag: String::new(),
            with_namespaces: true,
            namespaces: Namespaces::new(),
        }
    }
}

/// All occurrences of one child name below a group of parents.
struct ChildGroup<'a, N> {
    name: QName<'a>,
    members: Vec<N>,
    /// Parents that have at least one such child.
    parents_with: usize,
    /// Most occurrences under a single parent.
    max_per_parent: usize,
}

fn elements<'a, N: SourceNode<'a> + 'a>(node: N) -> impl Iterator<Item = N> + 'a {
    node.children().filter(|c| c.node_type() == NodeType::Element)
}

fn group_children<'a, N: SourceNode<'a> + 'a>(parents: &[N]) -> Vec<ChildGroup<'a, N>> {
    let mut groups: Vec<ChildGroup<'a, N>> = Vec::new();
    for &parent in parents {
        let mut counts: Vec<(QName<'a>, usize)> = Vec::new();
        for child in elements(parent) {
            let Some(name) = child.name() else { continue };
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name, 1)),
            }
            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => group.members.push(child),
                None => groups.push(ChildGroup {
                    name,
                    members: vec![child],
                    parents_with: 0,
                    max_per_parent: 0,
                }),
            }
        }
        for (name, count) in counts {
            if let Some(group) = groups.iter_mut().find(|g| g.name == name) {
                group.parents_with += 1;
                group.max_per_parent = group.max_per_parent.max(count);
            }
        }
    }
    groups
}

fn union_attributes<'a, N: SourceNode<'a> + 'a>(parents: &[N]) -> Vec<(QName<'a>, usize)> {
    let mut names: Vec<(QName<'a>, usize)> = Vec::new();
    for &parent in parents {
        for name in parent.attributes().filter_map(|a| a.name()) {
            match names.iter_mut().find(|(n, _)| *n == name) {
                Some((_, count)) => *count += 1,
                None => names.push((name, 1)),
            }
        }
    }
    names
}

struct Inferrer<'o> {
    options: &'o InferOptions,
}

impl Inferrer<'_> {
    /// The step text for a source path and the key for the JSON output.
    fn names(&self, name: QName<'_>, is_attribute: bool) -> Result<(String, String), InferError> {
        let local = name.local_part.to_string();
        let namespaces = &self.options.namespaces;
        match name.namespace {
            None if !is_attribute && namespaces.default_namespace().is_some() => {
                Err(InferError::ShadowedDefaultNamespace { name: local })
            }
            None => Ok((local.clone(), local)),
            Some(uri) => match namespaces.prefix_for(uri) {
                Some(prefix) if !prefix.is_empty() => {
                    let qualified = format!("{}:{}", prefix, local);
                    let key = if self.options.with_namespaces {
                        qualified.clone()
                    } else {
                        local
                    };
                    Ok((qualified, key))
                }
                // Only unprefixed element steps pick up the default namespace.
                Some(_) if !is_attribute => Ok((local.clone(), local)),
                _ => Err(InferError::UnboundNamespace {
                    uri: uri.to_string(),
                }),
            },
        }
    }

    fn value_target(&self, element: &JsonPath) -> JsonPath {
        if self.options.value_tag.is_empty() {
            element.clone()
        } else {
            element.child(&self.options.value_tag)
        }
    }

    /// Infers the rules for a group of elements that share one source path
    /// and one target. `parents` all satisfy `xpath`.
    fn group<'a, N: SourceNode<'a> + 'a>(
        &self,
        parents: &[N],
        xpath: &str,
        target: &JsonPath,
        rules: &mut Vec<NodeMapSpec>,
    ) -> Result<(), InferError> {
        let total = parents.len();

        for (name, count) in union_attributes(parents) {
            let (step, key) = self.names(name, true)?;
            let from = XmlNodeSpec::new(format!("{}/@{}", xpath, step), XmlNodeType::Attribute);
            let to = target.child(&format!("{}{}", self.options.attribute_tag, key));
            rules.push(NodeMapSpec::new(
                optional_if(from, count < total),
                JsonNodeSpec::new(to.to_string(), JsonNodeType::Infer),
            ));
        }

        let groups = group_children(parents);
        if groups.is_empty() && parents.first().is_some_and(|p| p.node_type() == NodeType::Element) {
            rules.push(NodeMapSpec::new(
                XmlNodeSpec::new(xpath, XmlNodeType::Value),
                JsonNodeSpec::new(self.value_target(target).to_string(), JsonNodeType::Infer),
            ));
        }

        for group in groups {
            let (step, key) = self.names(group.name, false)?;
            let child_path = format!("{}/{}", xpath, step);
            let child_target = target.child(&key);
            if group.max_per_parent > 1 {
                let mut items = Vec::new();
                self.group(
                    &group.members,
                    ".",
                    &JsonPath::new(Anchor::Current),
                    &mut items,
                )?;
                rules.push(
                    NodeMapSpec::new(
                        XmlNodeSpec::new(child_path, XmlNodeType::Sequence),
                        JsonNodeSpec::new(child_target.to_string(), JsonNodeType::Array),
                    )
                    .with_item_mappings(items),
                );
            } else {
                let first = rules.len();
                self.group(&group.members, &child_path, &child_target, rules)?;
                if group.parents_with < total {
                    for rule in &mut rules[first..] {
                        rule.from.optional = true;
                    }
                }
            }
        }
        Ok(())
    }
}

fn optional_if(from: XmlNodeSpec, optional: bool) -> XmlNodeSpec {
    if optional { from.optional() } else { from }
}

/// Infers a map that converts `root`'s document, and documents shaped like
/// it. Every attribute is kept; text is only taken from leaf elements, so
/// text mixed with child elements is not mapped.
pub fn infer_map<'a, N>(root: N, options: &InferOptions) -> Result<Vec<NodeMapSpec>, InferError>
where
    N: SourceNode<'a> + 'a,
{
    let root = document_root(root);
    let mut rules = Vec::new();
    Inferrer { options }.group(&[root], "", &JsonPath::new(Anchor::Root), &mut rules)?;
    log::info!("Inferred {} top-level rule(s)", rules.len());
    Ok(rules)
}

//! Prefix to namespace-URI bindings used when compiling source paths.
use std::collections::BTreeMap;

/// The namespace the `xml` prefix is bound to in every XML document.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Maps short prefixes (as written in source paths) to namespace URIs.
///
/// The empty prefix `""` is the default namespace: unprefixed element steps
/// match elements in that namespace instead of elements with no namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    bindings: BTreeMap<String, String>,
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Namespaces::insert`].
    pub fn with(mut self, prefix: &str, uri: &str) -> Self {
        self.insert(prefix, uri);
        self
    }

    pub fn insert(&mut self, prefix: &str, uri: &str) {
        self.bindings.insert(prefix.to_string(), uri.to_string());
    }

    /// The URI bound to `prefix`. `xml` is always bound, even when not
    /// declared.
    pub fn uri(&self, prefix: &str) -> Option<&str> {
        match self.bindings.get(prefix) {
            Some(uri) => Some(uri.as_str()),
            None if prefix == "xml" => Some(XML_NAMESPACE),
            None => None,
        }
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.uri("")
    }

    /// Inverse lookup of the prefix bound to `uri`. Named prefixes win over
    /// the default binding.
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.bindings
            .iter()
            .filter(|(_, bound)| bound.as_str() == uri)
            .map(|(prefix, _)| prefix.as_str())
            .max_by_key(|prefix| !prefix.is_empty())
            .or((uri == XML_NAMESPACE).then_some("xml"))
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl<P: Into<String>, U: Into<String>> FromIterator<(P, U)> for Namespaces {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(p, u)| (p.into(), u.into()))
                .collect(),
        }
    }
}

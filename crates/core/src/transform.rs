//! The registry of named value transformations a map may refer to.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a transformation knows about the value it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformContext<'c> {
    pub source_path: &'c str,
    pub target_path: &'c str,
    /// Local name of the element the value was read from (the owner element
    /// for attributes).
    pub element: Option<&'c str>,
    /// 1-based position inside the enclosing sequence, if any.
    pub position: Option<usize>,
}

/// The signature of a transformation. It must be a pure function of its
/// inputs; an `Err` carries a human-readable reason.
pub type TransformFn = dyn Fn(&str, &TransformContext<'_>) -> Result<String, String> + Send + Sync;

/// A named, shareable transformation handle.
#[derive(Clone)]
pub struct Transformation {
    name: Arc<str>,
    func: Arc<TransformFn>,
}

impl Transformation {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&str, &TransformContext<'_>) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, raw: &str, ctx: &TransformContext<'_>) -> Result<String, String> {
        (self.func)(raw, ctx)
    }
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transformation").field(&self.name).finish()
    }
}

/// A name-indexed table of transformations supplied by the host application.
#[derive(Clone, Debug)]
pub struct TransformationRegistry {
    transformations: HashMap<String, Transformation>,
}

impl TransformationRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            transformations: HashMap::new(),
        }
    }

    /// Registers a transformation, replacing any previous one of that name.
    pub fn register<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&str, &TransformContext<'_>) -> Result<String, String> + Send + Sync + 'static,
    {
        self.transformations
            .insert(name.to_string(), Transformation::new(name, func));
    }

    pub fn get(&self, name: &str) -> Option<&Transformation> {
        self.transformations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformations.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transformations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TransformationRegistry {
    /// A registry with the built-in transformations.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("trim", |raw, _| Ok(raw.trim().to_string()));
        registry.register("upper", |raw, _| Ok(raw.to_uppercase()));
        registry.register("lower", |raw, _| Ok(raw.to_lowercase()));
        registry.register("normalize_whitespace", |raw, _| Ok(normalize_whitespace(raw)));
        registry
    }
}

/// Drops line breaks and collapses every whitespace run to a single space.
fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: TransformContext<'static> = TransformContext {
        source_path: "/a",
        target_path: "$.a",
        element: Some("a"),
        position: None,
    };

    #[test]
    fn test_builtins() {
        let registry = TransformationRegistry::default();
        let apply = |name: &str, raw: &str| registry.get(name).unwrap().apply(raw, &CTX).unwrap();
        assert_eq!(apply("trim", "  x "), "x");
        assert_eq!(apply("upper", "abc"), "ABC");
        assert_eq!(apply("lower", "AbC"), "abc");
        assert_eq!(
            apply("normalize_whitespace", "  Some\n   wrapped\ttext  "),
            "Some wrapped text"
        );
        assert_eq!(
            registry.names(),
            vec!["lower", "normalize_whitespace", "trim", "upper"]
        );
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = TransformationRegistry::new();
        assert!(registry.names().is_empty());
        assert!(!registry.contains("trim"));
    }

    #[test]
    fn test_custom_transformation_sees_context() {
        let mut registry = TransformationRegistry::new();
        registry.register("tag", |raw, ctx| {
            let element = ctx.element.ok_or("no element")?;
            Ok(format!("{}={}", element, raw))
        });
        registry.register("fail", |_, _| Err("always fails".to_string()));

        let tag = registry.get("tag").unwrap();
        assert_eq!(tag.name(), "tag");
        assert_eq!(tag.apply("1", &CTX).unwrap(), "a=1");
        assert_eq!(
            registry.get("fail").unwrap().apply("1", &CTX),
            Err("always fails".to_string())
        );
    }
}

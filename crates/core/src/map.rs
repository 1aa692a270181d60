//! Loading, validating and compiling jsonize maps.
//!
//! A [`JsonizeMap`] is checked completely before any conversion runs: path
//! syntax, namespace prefixes, selector/target type combinations and
//! transformation names. Every problem is collected, not just the first.
use crate::error::{LoadIssue, MapLoadError, RuleId};
use crate::model::{JsonNodeType, NodeMapSpec, XmlNodeType};
use crate::transform::{Transformation, TransformationRegistry};
use jsonize_jpath::{JsonPath, parse_path};
use jsonize_xpath::{Namespaces, SourcePath, compile};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Settings applied while compiling a map.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Prefix bindings for the source paths. The empty prefix binds the
    /// default namespace.
    pub namespaces: Namespaces,
}

impl LoadOptions {
    pub fn with_namespaces(namespaces: Namespaces) -> Self {
        Self { namespaces }
    }
}

/// A compiled, immutable rule.
#[derive(Debug, Clone)]
pub struct NodeMap {
    pub(crate) id: RuleId,
    pub(crate) source_type: XmlNodeType,
    pub(crate) source: SourcePath,
    pub(crate) source_text: String,
    pub(crate) optional: bool,
    pub(crate) target_type: JsonNodeType,
    pub(crate) target: JsonPath,
    pub(crate) target_text: String,
    pub(crate) transformation: Option<Transformation>,
    pub(crate) item_mappings: Vec<NodeMap>,
}

impl NodeMap {
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn source_type(&self) -> XmlNodeType {
        self.source_type
    }

    pub fn source_path(&self) -> &str {
        &self.source_text
    }

    pub fn target_type(&self) -> JsonNodeType {
        self.target_type
    }

    pub fn target_path(&self) -> &str {
        &self.target_text
    }

    pub fn item_mappings(&self) -> &[NodeMap] {
        &self.item_mappings
    }
}

/// An ordered list of compiled rules, shareable across threads.
#[derive(Debug, Clone)]
pub struct JsonizeMap {
    rules: Vec<NodeMap>,
    namespaces: Namespaces,
}

impl JsonizeMap {
    /// Validates and compiles `specs`.
    pub fn compile(
        specs: &[NodeMapSpec],
        registry: &TransformationRegistry,
        options: &LoadOptions,
    ) -> Result<Self, MapLoadError> {
        let compiler = Compiler {
            registry,
            namespaces: &options.namespaces,
        };
        let mut issues = Vec::new();
        let rules: Vec<NodeMap> = specs
            .iter()
            .enumerate()
            .filter_map(|(i, spec)| compiler.rule(spec, RuleId::top_level(i), &mut issues))
            .collect();

        if !issues.is_empty() {
            for issue in &issues {
                log::warn!("Invalid map rule {}", issue);
            }
            return Err(MapLoadError::Invalid(issues));
        }
        log::debug!("Compiled jsonize map with {} top-level rule(s)", rules.len());
        Ok(Self {
            rules,
            namespaces: options.namespaces.clone(),
        })
    }

    pub fn from_json_str(
        text: &str,
        registry: &TransformationRegistry,
        options: &LoadOptions,
    ) -> Result<Self, MapLoadError> {
        let specs: Vec<NodeMapSpec> = serde_json::from_str(text)?;
        Self::compile(&specs, registry, options)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        registry: &TransformationRegistry,
        options: &LoadOptions,
    ) -> Result<Self, MapLoadError> {
        let specs: Vec<NodeMapSpec> = serde_json::from_reader(reader)?;
        Self::compile(&specs, registry, options)
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        registry: &TransformationRegistry,
        options: &LoadOptions,
    ) -> Result<Self, MapLoadError> {
        let path = path.as_ref();
        log::info!("Loading jsonize map from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), registry, options)
    }

    pub fn rules(&self) -> &[NodeMap] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }
}

struct Compiler<'c> {
    registry: &'c TransformationRegistry,
    namespaces: &'c Namespaces,
}

impl Compiler<'_> {
    /// Compiles one rule and its item mappings. Returns `None` when any
    /// problem was recorded for this rule or below it.
    fn rule(&self, spec: &NodeMapSpec, id: RuleId, issues: &mut Vec<LoadIssue>) -> Option<NodeMap> {
        let before = issues.len();
        let mut issue = |message: String| {
            issues.push(LoadIssue {
                rule: id.clone(),
                message,
            })
        };

        let source = compile(&spec.from.path, self.namespaces)
            .map_err(|e| issue(e.to_string()))
            .ok();
        let target = parse_path(&spec.to.path)
            .map_err(|e| issue(e.to_string()))
            .ok();

        let source_type = spec.from.node_type;
        let target_type = spec.to.node_type;
        if let Some(source) = &source {
            match (source_type, source.selects_attribute()) {
                (XmlNodeType::Attribute, false) => issue(format!(
                    "attribute path '{}' must end with an '@name' step",
                    spec.from.path
                )),
                (XmlNodeType::Attribute, true) => {}
                (other, true) => issue(format!(
                    "{} path '{}' must not select an attribute",
                    other, spec.from.path
                )),
                (_, false) => {}
            }
        }

        let nested = matches!(source_type, XmlNodeType::Sequence | XmlNodeType::ComplexType);
        let expected_container = match source_type {
            XmlNodeType::Sequence => Some(JsonNodeType::Array),
            XmlNodeType::ComplexType => Some(JsonNodeType::Object),
            XmlNodeType::Value | XmlNodeType::Attribute => None,
        };
        match expected_container {
            Some(expected) if target_type != expected => issue(format!(
                "a {} source must target '{}', not '{}'",
                source_type, expected, target_type
            )),
            None if !target_type.is_scalar() => issue(format!(
                "a {} source cannot target '{}'",
                source_type, target_type
            )),
            _ => {}
        }

        if nested && spec.item_mappings.is_empty() {
            issue(format!("a {} source requires itemMappings", source_type));
        }
        if !nested && !spec.item_mappings.is_empty() {
            log::warn!(
                "Rule {} has itemMappings on a {} source; they are ignored",
                id,
                source_type
            );
        }

        let transformation = match &spec.transformation {
            Some(name) if nested => {
                issue(format!(
                    "transformation '{}' cannot apply to a {} source",
                    name, source_type
                ));
                None
            }
            Some(name) => {
                let found = self.registry.get(name).cloned();
                if found.is_none() {
                    issue(format!("unknown transformation '{}'", name));
                }
                found
            }
            None => None,
        };

        let item_mappings: Vec<NodeMap> = if nested {
            spec.item_mappings
                .iter()
                .enumerate()
                .filter_map(|(i, item)| self.rule(item, id.item(i), issues))
                .collect()
        } else {
            vec![]
        };

        if issues.len() > before {
            return None;
        }
        Some(NodeMap {
            source: source?,
            target: target?,
            source_text: spec.from.path.clone(),
            target_text: spec.to.path.clone(),
            optional: spec.from.optional,
            source_type,
            target_type,
            transformation,
            item_mappings,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JsonNodeSpec, XmlNodeSpec};
    use serde_json::json;

    fn value(from: &str, to: &str, ty: JsonNodeType) -> NodeMapSpec {
        NodeMapSpec::new(
            XmlNodeSpec::new(from, XmlNodeType::Value),
            JsonNodeSpec::new(to, ty),
        )
    }

    fn load(specs: &[NodeMapSpec]) -> Result<JsonizeMap, MapLoadError> {
        JsonizeMap::compile(specs, &TransformationRegistry::default(), &LoadOptions::default())
    }

    fn issues(specs: &[NodeMapSpec]) -> Vec<LoadIssue> {
        match load(specs) {
            Err(MapLoadError::Invalid(issues)) => issues,
            other => panic!("expected an invalid map, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_valid_map() {
        let map = load(&[
            value("/Root/Name", "name", JsonNodeType::String).with_transformation("trim"),
            NodeMapSpec::new(
                XmlNodeSpec::new("/Root/Items/Item", XmlNodeType::Sequence),
                JsonNodeSpec::new("items", JsonNodeType::Array),
            )
            .with_item_mappings(vec![value(".", "@", JsonNodeType::Integer)]),
        ])
        .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.rules()[1].item_mappings()[0].id().as_str(), "#1.itemMappings[0]");
        assert_eq!(map.rules()[0].target_path(), "name");
    }

    #[test]
    fn test_reject_sequence_without_item_mappings() {
        let spec = NodeMapSpec::new(
            XmlNodeSpec::new("Items/Item", XmlNodeType::Sequence),
            JsonNodeSpec::new("items", JsonNodeType::Array),
        );
        let issues = issues(&[spec]);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("requires itemMappings"));
    }

    #[test]
    fn test_reject_unknown_transformation() {
        let issues = issues(&[value("a", "a", JsonNodeType::String).with_transformation("rot13")]);
        assert_eq!(issues[0].message, "unknown transformation 'rot13'");
    }

    #[test]
    fn test_reject_invalid_paths_and_prefixes() {
        let issues = issues(&[
            value("a[", "a", JsonNodeType::String),
            value("a", "$..a", JsonNodeType::String),
            value("gml:pos", "pos", JsonNodeType::String),
        ]);
        let rules: Vec<&str> = issues.iter().map(|i| i.rule.as_str()).collect();
        assert_eq!(rules, vec!["#0", "#1", "#2"]);
        assert!(issues[2].message.contains("gml"));
    }

    #[test]
    fn test_namespace_bindings_resolve_prefixes() {
        let options = LoadOptions::with_namespaces(Namespaces::new().with("gml", "urn:gml"));
        let map = JsonizeMap::compile(
            &[value("gml:pos", "pos", JsonNodeType::String)],
            &TransformationRegistry::new(),
            &options,
        )
        .unwrap();
        assert_eq!(map.namespaces().uri("gml"), Some("urn:gml"));
    }

    #[test]
    fn test_reject_selector_type_mismatches() {
        let attribute_without_step = NodeMapSpec::new(
            XmlNodeSpec::new("a/b", XmlNodeType::Attribute),
            JsonNodeSpec::new("x", JsonNodeType::String),
        );
        let value_with_attribute = value("a/@b", "x", JsonNodeType::String);
        let value_to_object = value("a", "x", JsonNodeType::Object);
        let sequence_to_string = NodeMapSpec::new(
            XmlNodeSpec::new("a", XmlNodeType::Sequence),
            JsonNodeSpec::new("x", JsonNodeType::String),
        )
        .with_item_mappings(vec![value(".", "@", JsonNodeType::String)]);
        let complex_to_array = NodeMapSpec::new(
            XmlNodeSpec::new("a", XmlNodeType::ComplexType),
            JsonNodeSpec::new("x", JsonNodeType::Array),
        )
        .with_item_mappings(vec![value("b", "b", JsonNodeType::String)]);

        let issues = issues(&[
            attribute_without_step,
            value_with_attribute,
            value_to_object,
            sequence_to_string,
            complex_to_array,
        ]);
        assert_eq!(issues.len(), 5);
    }

    #[test]
    fn test_nested_issues_are_collected_with_rule_ids() {
        let spec = NodeMapSpec::new(
            XmlNodeSpec::new("a", XmlNodeType::ComplexType),
            JsonNodeSpec::new("a", JsonNodeType::Object),
        )
        .with_transformation("trim")
        .with_item_mappings(vec![
            value("b", "b", JsonNodeType::String),
            value("c[", "c", JsonNodeType::String),
        ]);
        let issues = issues(&[spec]);
        let rules: Vec<String> = issues.iter().map(|i| i.rule.to_string()).collect();
        assert_eq!(rules, vec!["#0", "#0.itemMappings[1]"]);
    }

    #[test]
    fn test_from_json_str() {
        let text = json!([
            {
                "from": { "path": "/Root/Name", "type": "value" },
                "to": { "path": "name", "type": "string" }
            }
        ])
        .to_string();
        let map = JsonizeMap::from_json_str(
            &text,
            &TransformationRegistry::new(),
            &LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(map.len(), 1);

        let err = JsonizeMap::from_json_str(
            r#"[{"from": {"path": "a"}}]"#,
            &TransformationRegistry::new(),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MapLoadError::Json(_)));
    }
}

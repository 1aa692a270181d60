//! Runs a whole map against a document.
use crate::error::ConversionError;
use crate::evaluator::Evaluator;
use crate::map::JsonizeMap;
use jsonize_xpath::{SourceNode, document_root};
use serde_json::{Map, Value};

/// Converts the document `root` belongs to into a new JSON object.
///
/// Rules run in map order against the document root, so later rules
/// overwrite or extend what earlier rules wrote. If any rule fails, the
/// error carries every failure together with the partially built tree.
pub fn convert<'a, N>(root: N, map: &JsonizeMap) -> Result<Value, ConversionError>
where
    N: SourceNode<'a> + 'a,
{
    convert_into(root, map, Value::Object(Map::new()))
}

/// Like [`convert`], but writes into `initial` instead of an empty object.
pub fn convert_into<'a, N>(root: N, map: &JsonizeMap, initial: Value) -> Result<Value, ConversionError>
where
    N: SourceNode<'a> + 'a,
{
    let root = document_root(root);
    log::info!("Converting document with {} mapping rule(s)", map.len());

    let mut output = initial;
    let mut evaluator = Evaluator::default();
    for rule in map.rules() {
        evaluator.evaluate(rule, root, &mut output, None);
    }

    if evaluator.failures.is_empty() {
        log::debug!("Conversion finished without failures");
        Ok(output)
    } else {
        log::warn!(
            "Conversion finished with {} rule failure(s)",
            evaluator.failures.len()
        );
        Err(ConversionError {
            failures: evaluator.failures,
            partial: output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::map::LoadOptions;
    use crate::transform::TransformationRegistry;
    use jsonize_xml::XmlDocument;
    use serde_json::json;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn map(rules: Value) -> JsonizeMap {
        let mut registry = TransformationRegistry::default();
        registry.register("reject_x", |raw, _| {
            if raw.contains('x') {
                Err(format!("'{}' contains x", raw))
            } else {
                Ok(raw.to_string())
            }
        });
        JsonizeMap::from_json_str(&rules.to_string(), &registry, &LoadOptions::default()).unwrap()
    }

    fn run(xml: &str, rules: Value) -> Result<Value, ConversionError> {
        init();
        let doc = XmlDocument::parse(xml).unwrap();
        convert(doc.root_node(), &map(rules))
    }

    #[test]
    fn test_value_rule() {
        let out = run(
            "<Root><Name>Alice</Name></Root>",
            json!([{ "from": { "path": "/Root/Name", "type": "value" },
                     "to": { "path": "name", "type": "string" } }]),
        )
        .unwrap();
        assert_eq!(out, json!({ "name": "Alice" }));
    }

    #[test]
    fn test_attribute_rule_with_transformation() {
        let out = run(
            r#"<Root><P code=" ab "/></Root>"#,
            json!([{ "from": { "path": "Root/P/@code", "type": "attribute" },
                     "to": { "path": "$.p.code", "type": "string" },
                     "transformation": "upper" }]),
        )
        .unwrap();
        assert_eq!(out, json!({ "p": { "code": " AB " } }));
    }

    #[test]
    fn test_sequence_items_merge_into_objects() {
        let out = run(
            r#"<R><I id="1"><n>a</n></I><I id="2"><n>b</n></I></R>"#,
            json!([{ "from": { "path": "/R/I", "type": "sequence" },
                     "to": { "path": "items", "type": "array" },
                     "itemMappings": [
                        { "from": { "path": "@id", "type": "attribute" },
                          "to": { "path": "@.id", "type": "integer" } },
                        { "from": { "path": "n", "type": "value" },
                          "to": { "path": "@.name", "type": "string" } }
                     ] }]),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({ "items": [{ "id": 1, "name": "a" }, { "id": 2, "name": "b" }] })
        );
    }

    #[test]
    fn test_later_item_mapping_overwrites_earlier_one() {
        let out = run(
            "<R><I><a>1</a><b>2</b></I></R>",
            json!([{ "from": { "path": "R/I", "type": "sequence" },
                     "to": { "path": "items", "type": "array" },
                     "itemMappings": [
                        { "from": { "path": "a", "type": "value" },
                          "to": { "path": "@.v", "type": "integer" } },
                        { "from": { "path": "b", "type": "value" },
                          "to": { "path": "@.v", "type": "integer" } }
                     ] }]),
        )
        .unwrap();
        assert_eq!(out, json!({ "items": [{ "v": 2 }] }));
    }

    #[test]
    fn test_failed_item_is_dropped_and_reported() {
        let err = run(
            "<R><I>1</I><I>x</I><I>3</I></R>",
            json!([{ "from": { "path": "R/I", "type": "sequence" },
                     "to": { "path": "items", "type": "array" },
                     "itemMappings": [
                        { "from": { "path": ".", "type": "value" },
                          "to": { "path": "@", "type": "integer" } }
                     ] }]),
        )
        .unwrap_err();

        assert_eq!(err.partial, json!({ "items": [1, 3] }));
        assert_eq!(err.failures.len(), 1);
        let failure = &err.failures[0];
        assert_eq!(failure.rule.as_str(), "#0.itemMappings[0]");
        assert_eq!(failure.position, Some(2));
        assert!(matches!(failure.kind, ErrorKind::TypeCoercion(_)));
    }

    #[test]
    fn test_complex_type_builds_object() {
        let out = run(
            "<R><Pos><x>1.5</x><y>2</y></Pos></R>",
            json!([
                { "from": { "path": "R/Pos/x", "type": "value" },
                  "to": { "path": "$.pos.raw", "type": "string" } },
                { "from": { "path": "R/Pos", "type": "complexType" },
                  "to": { "path": "$.pos", "type": "object" },
                  "itemMappings": [
                    { "from": { "path": "x", "type": "value" },
                      "to": { "path": "@.x", "type": "number" } },
                    { "from": { "path": "y", "type": "value" },
                      "to": { "path": "@.y", "type": "number" } }
                  ] }
            ]),
        )
        .unwrap();
        assert_eq!(out, json!({ "pos": { "raw": "1.5", "x": 1.5, "y": 2 } }));
    }

    #[test]
    fn test_complex_type_failure_drops_object() {
        let err = run(
            "<R><Pos><x>1</x></Pos></R>",
            json!([{ "from": { "path": "R/Pos", "type": "complexType" },
                     "to": { "path": "pos", "type": "object" },
                     "itemMappings": [
                        { "from": { "path": "x", "type": "value" },
                          "to": { "path": "@.x", "type": "number" } },
                        { "from": { "path": "y", "type": "value" },
                          "to": { "path": "@.y", "type": "number" } }
                     ] }]),
        )
        .unwrap_err();
        assert_eq!(err.partial, json!({}));
        assert_eq!(err.failures.len(), 1);
        assert_eq!(
            err.failures[0].kind,
            ErrorKind::PathNotFound { path: "y".into() }
        );
    }

    #[test]
    fn test_missing_and_ambiguous_sources() {
        let err = run(
            "<R><a>1</a><a>2</a></R>",
            json!([
                { "from": { "path": "R/missing", "type": "value" },
                  "to": { "path": "m", "type": "string" } },
                { "from": { "path": "R/a", "type": "value" },
                  "to": { "path": "a", "type": "string" } },
                { "from": { "path": "R/a[2]", "type": "value" },
                  "to": { "path": "second", "type": "integer" } }
            ]),
        )
        .unwrap_err();
        assert_eq!(err.partial, json!({ "second": 2 }));
        let kinds: Vec<_> = err.failures.iter().map(|f| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::PathNotFound { path: "R/missing".into() },
                ErrorKind::AmbiguousMatch { path: "R/a".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_optional_source_writes_nothing() {
        let out = run(
            "<R><a>1</a></R>",
            json!([
                { "from": { "path": "R/b", "type": "value", "optional": true },
                  "to": { "path": "b", "type": "integer" } },
                { "from": { "path": "R/a", "type": "value", "optional": true },
                  "to": { "path": "a", "type": "integer" } }
            ]),
        )
        .unwrap();
        assert_eq!(out, json!({ "a": 1 }));
    }

    #[test]
    fn test_transformation_failure_is_reported() {
        let err = run(
            "<R><a>xyz</a></R>",
            json!([{ "from": { "path": "R/a", "type": "value" },
                     "to": { "path": "a", "type": "string" },
                     "transformation": "reject_x" }]),
        )
        .unwrap_err();
        assert_eq!(
            err.failures[0].kind,
            ErrorKind::Transformation {
                name: "reject_x".into(),
                message: "'xyz' contains x".into()
            }
        );
    }

    #[test]
    fn test_path_conflict_only_fails_its_rule() {
        let err = run(
            "<R><a>1</a><b>2</b></R>",
            json!([
                { "from": { "path": "R/a", "type": "value" },
                  "to": { "path": "a", "type": "integer" } },
                { "from": { "path": "R/b", "type": "value" },
                  "to": { "path": "a.b", "type": "integer" } },
                { "from": { "path": "R/b", "type": "value" },
                  "to": { "path": "b", "type": "integer" } }
            ]),
        )
        .unwrap_err();
        assert_eq!(err.partial, json!({ "a": 1, "b": 2 }));
        assert!(matches!(
            err.failures[0].kind,
            ErrorKind::PathConflict { .. }
        ));
        assert_eq!(err.failures[0].rule.as_str(), "#1");
    }

    #[test]
    fn test_convert_into_existing_tree() {
        init();
        let doc = XmlDocument::parse("<R><a>1</a></R>").unwrap();
        let map = map(json!([{ "from": { "path": "R/a", "type": "value" },
                                "to": { "path": "meta.a", "type": "infer" } }]));
        let out = convert_into(doc.root_element(), &map, json!({ "meta": { "source": "test" } }))
            .unwrap();
        assert_eq!(out, json!({ "meta": { "source": "test", "a": 1 } }));
    }

    #[test]
    fn test_nested_sequences() {
        let out = run(
            "<R><G><v>1</v><v>2</v></G><G/></R>",
            json!([{ "from": { "path": "R/G", "type": "sequence" },
                     "to": { "path": "groups", "type": "array" },
                     "itemMappings": [
                        { "from": { "path": "v", "type": "sequence" },
                          "to": { "path": "@.values", "type": "array" },
                          "itemMappings": [
                            { "from": { "path": ".", "type": "value" },
                              "to": { "path": "@", "type": "integer" } }
                          ] }
                     ] }]),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({ "groups": [{ "values": [1, 2] }, { "values": [] }] })
        );
    }
}

//! File-level helpers: read maps and documents from disk, write results.
use crate::error::JsonizeError;
use jsonize_core::{
    InferOptions, JsonizeMap, LoadOptions, Namespaces, NodeMapSpec, TransformationRegistry,
    convert, infer_map,
};
use jsonize_xml::XmlDocument;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Loads and validates a map file, compiling its source paths against
/// `namespaces`.
pub fn load_map_file(
    path: impl AsRef<Path>,
    registry: &TransformationRegistry,
    namespaces: Namespaces,
) -> Result<JsonizeMap, JsonizeError> {
    let options = LoadOptions::with_namespaces(namespaces);
    Ok(JsonizeMap::from_path(path, registry, &options)?)
}

/// Parses `xml` and converts it. Any rule failure is returned as
/// [`JsonizeError::Conversion`], which still carries the partial tree.
pub fn convert_str(xml: &str, map: &JsonizeMap) -> Result<Value, JsonizeError> {
    let doc = XmlDocument::parse(xml)?;
    Ok(convert(doc.root_node(), map)?)
}

pub fn convert_file(path: impl AsRef<Path>, map: &JsonizeMap) -> Result<Value, JsonizeError> {
    let xml = fs::read_to_string(path)?;
    convert_str(&xml, map)
}

/// Serializes `value` to `path`, creating or truncating the file.
pub fn write_json(path: impl AsRef<Path>, value: &Value, pretty: bool) -> Result<(), JsonizeError> {
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Converts one XML file and writes the result. Nothing is written when a
/// rule fails.
pub fn xml_file_to_json_file(
    xml_path: impl AsRef<Path>,
    map: &JsonizeMap,
    out_path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), JsonizeError> {
    let value = convert_file(xml_path.as_ref(), map)?;
    write_json(out_path.as_ref(), &value, pretty)?;
    log::info!(
        "Wrote {} from {}",
        out_path.as_ref().display(),
        xml_path.as_ref().display()
    );
    Ok(())
}

/// The prefixes declared in an XML file. Used to fill in bindings that the
/// caller did not give explicitly.
pub fn document_namespaces(path: impl AsRef<Path>) -> Result<Namespaces, JsonizeError> {
    let xml = fs::read_to_string(path)?;
    let doc = XmlDocument::parse(&xml)?;
    Ok(doc.namespaces())
}

/// Adds every binding of `fallback` whose prefix `explicit` leaves unbound.
pub fn merge_namespaces(mut explicit: Namespaces, fallback: &Namespaces) -> Namespaces {
    for (prefix, uri) in fallback.iter() {
        if explicit.uri(prefix).is_none() {
            explicit.insert(prefix, uri);
        }
    }
    explicit
}

/// Infers a map from a sample XML file. Prefixes declared in the document
/// are added to `options.namespaces` unless already bound there.
pub fn infer_map_file(
    path: impl AsRef<Path>,
    options: &InferOptions,
) -> Result<Vec<NodeMapSpec>, JsonizeError> {
    let xml = fs::read_to_string(path)?;
    let doc = XmlDocument::parse(&xml)?;
    let options = InferOptions {
        namespaces: merge_namespaces(options.namespaces.clone(), &doc.namespaces()),
        ..options.clone()
    };
    Ok(infer_map(doc.root_node(), &options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_explicit_bindings() {
        let explicit = Namespaces::new().with("a", "urn:explicit");
        let document = Namespaces::new().with("a", "urn:doc").with("b", "urn:b");
        let merged = merge_namespaces(explicit, &document);
        assert_eq!(merged.uri("a"), Some("urn:explicit"));
        assert_eq!(merged.uri("b"), Some("urn:b"));
    }

    #[test]
    fn test_convert_str_reports_malformed_xml() {
        let map = JsonizeMap::compile(&[], &TransformationRegistry::new(), &LoadOptions::default())
            .unwrap();
        let err = convert_str("<a><b></a>", &map).unwrap_err();
        assert!(matches!(err, JsonizeError::Xml(_)));
        assert!(err.partial().is_none());
    }
}

#![allow(dead_code)]

use jsonize::{JsonizeError, JsonizeMap, LoadOptions, Namespaces, TransformationRegistry};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Compiles a map written with `json!` using the built-in transformations.
pub fn map_from_json(rules: Value) -> Result<JsonizeMap, JsonizeError> {
    map_with_namespaces(rules, Namespaces::new())
}

pub fn map_with_namespaces(rules: Value, namespaces: Namespaces) -> Result<JsonizeMap, JsonizeError> {
    init_logger();
    Ok(JsonizeMap::from_json_str(
        &rules.to_string(),
        &TransformationRegistry::default(),
        &LoadOptions::with_namespaces(namespaces),
    )?)
}

/// A purchase order with repeated lines, attributes and a namespaced note.
pub const ORDER_XML: &str = r#"<?xml version="1.0"?>
<Order id="A-17" xmlns:n="urn:notes">
  <Customer>  Ada Lovelace </Customer>
  <Placed>2024-03-01</Placed>
  <Paid>yes</Paid>
  <Lines>
    <Line sku="X1"><Qty>2</Qty><Price>9.50</Price></Line>
    <Line sku="Y2"><Qty>1</Qty><Price>120</Price><Gift>true</Gift></Line>
    <Line sku="Z3"><Qty>4</Qty><Price>0.25</Price></Line>
  </Lines>
  <n:Note>leave at door</n:Note>
</Order>"#;

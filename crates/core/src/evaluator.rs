//! Recursive evaluation of one compiled rule against one XML context node.
//!
//! The output scope is threaded explicitly through every call: top-level rules
//! write into the document tree, item mappings write into the item being
//! built. Failures are recorded where they happen; a rule's return value only
//! says whether its own contribution survived.
use crate::coerce::coerce;
use crate::error::{ErrorKind, MappingError};
use crate::map::NodeMap;
use crate::model::XmlNodeType;
use crate::transform::TransformContext;
use jsonize_xpath::{SourceNode, resolve_single, select};
use serde_json::{Map, Value};

#[derive(Debug, Default)]
pub(crate) struct Evaluator {
    pub(crate) failures: Vec<MappingError>,
}

impl Evaluator {
    /// Evaluates `rule` with `context` as the XML context and `scope` as the
    /// output scope. Returns `false` if the rule wrote nothing because it, or
    /// one of its item mappings, failed.
    pub(crate) fn evaluate<'a, N>(
        &mut self,
        rule: &NodeMap,
        context: N,
        scope: &mut Value,
        position: Option<usize>,
    ) -> bool
    where
        N: SourceNode<'a> + 'a,
    {
        log::debug!(
            "Evaluating rule {} ({} '{}' -> {} '{}')",
            rule.id,
            rule.source_type,
            rule.source_text,
            rule.target_type,
            rule.target_text
        );
        let result = match rule.source_type {
            XmlNodeType::Value | XmlNodeType::Attribute => {
                self.map_scalar(rule, context, scope, position)
            }
            XmlNodeType::Sequence => self.map_sequence(rule, context, scope),
            XmlNodeType::ComplexType => self.map_complex(rule, context, scope, position),
        };
        match result {
            Ok(written) => written,
            Err(kind) => {
                self.fail(rule, position, kind);
                false
            }
        }
    }

    fn fail(&mut self, rule: &NodeMap, position: Option<usize>, kind: ErrorKind) {
        let error = MappingError {
            rule: rule.id.clone(),
            source_path: rule.source_text.clone(),
            target_path: rule.target_text.clone(),
            position,
            kind,
        };
        log::warn!("{}", error);
        self.failures.push(error);
    }

    /// Resolves the single node a non-sequence rule reads. `Ok(None)` only
    /// for optional rules without a match.
    fn resolve<'a, N>(&self, rule: &NodeMap, context: N) -> Result<Option<N>, ErrorKind>
    where
        N: SourceNode<'a> + 'a,
    {
        match resolve_single(&rule.source, context)? {
            Some(node) => Ok(Some(node)),
            None if rule.optional => {
                log::debug!("Optional source '{}' is absent", rule.source_text);
                Ok(None)
            }
            None => Err(ErrorKind::PathNotFound {
                path: rule.source_text.clone(),
            }),
        }
    }

    fn map_scalar<'a, N>(
        &mut self,
        rule: &NodeMap,
        context: N,
        scope: &mut Value,
        position: Option<usize>,
    ) -> Result<bool, ErrorKind>
    where
        N: SourceNode<'a> + 'a,
    {
        let Some(node) = self.resolve(rule, context)? else {
            return Ok(true);
        };
        let raw = node.string_value();

        let raw = match &rule.transformation {
            Some(transformation) => {
                let owner = match rule.source_type {
                    XmlNodeType::Attribute => node.parent(),
                    _ => Some(node),
                };
                let ctx = TransformContext {
                    source_path: &rule.source_text,
                    target_path: &rule.target_text,
                    element: owner.and_then(|n| n.name()).map(|q| q.local_part),
                    position,
                };
                transformation
                    .apply(&raw, &ctx)
                    .map_err(|message| ErrorKind::Transformation {
                        name: transformation.name().to_string(),
                        message,
                    })?
            }
            None => raw,
        };

        let value = coerce(&raw, rule.target_type)?;
        jsonize_jpath::write(scope, &rule.target, value)?;
        Ok(true)
    }

    /// Appends one item per matched element. A failing item is dropped; the
    /// array itself is always present, even with no matches.
    fn map_sequence<'a, N>(
        &mut self,
        rule: &NodeMap,
        context: N,
        scope: &mut Value,
    ) -> Result<bool, ErrorKind>
    where
        N: SourceNode<'a> + 'a,
    {
        let array = jsonize_jpath::ensure_array(scope, &rule.target)?;
        let elements = select(&rule.source, context);
        log::debug!(
            "Sequence '{}' matched {} element(s)",
            rule.source_text,
            elements.len()
        );

        for (index, element) in elements.into_iter().enumerate() {
            let position = Some(index + 1);
            let mut item = Value::Null;
            let mut complete = true;
            for item_rule in &rule.item_mappings {
                complete &= self.evaluate(item_rule, element, &mut item, position);
            }
            if complete {
                array.push(item);
            } else {
                log::warn!(
                    "Dropping item {} of rule {} after a failed item mapping",
                    index + 1,
                    rule.id
                );
            }
        }
        Ok(true)
    }

    /// Maps one element into a fresh object and merges it into `to.path`.
    /// Any failing item mapping drops the whole object.
    fn map_complex<'a, N>(
        &mut self,
        rule: &NodeMap,
        context: N,
        scope: &mut Value,
        position: Option<usize>,
    ) -> Result<bool, ErrorKind>
    where
        N: SourceNode<'a> + 'a,
    {
        let Some(element) = self.resolve(rule, context)? else {
            return Ok(true);
        };

        let mut object = Value::Object(Map::new());
        let mut complete = true;
        for item_rule in &rule.item_mappings {
            complete &= self.evaluate(item_rule, element, &mut object, position);
        }
        if !complete {
            log::warn!("Dropping object of rule {} after a failed item mapping", rule.id);
            return Ok(false);
        }
        jsonize_jpath::write(scope, &rule.target, object)?;
        Ok(true)
    }
}

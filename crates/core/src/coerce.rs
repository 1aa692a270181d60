//! Converts raw XML text into typed JSON scalars.
//!
//! Numeric, boolean and null checks look at the value with surrounding XML
//! whitespace removed; `string` keeps the raw text untouched.
use crate::error::CoercionError;
use crate::model::JsonNodeType;
use nom::{
    IResult, Parser,
    character::complete::{digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    number::complete::recognize_float,
    sequence::pair,
};
use serde_json::{Number, Value};

fn integral_form(input: &str) -> IResult<&str, &str> {
    all_consuming(recognize(pair(opt(one_of("+-")), digit1))).parse(input)
}

/// `[+-]? (digits ('.' digits?)? | '.' digits) ([eE] [+-]? digits)?`
fn numeric_form(input: &str) -> IResult<&str, &str> {
    all_consuming(recognize_float).parse(input)
}

fn invalid(raw: &str, target: JsonNodeType) -> CoercionError {
    CoercionError::InvalidLexicalForm {
        raw: raw.to_string(),
        target,
    }
}

fn out_of_range(raw: &str, target: JsonNodeType) -> CoercionError {
    CoercionError::OutOfRange {
        raw: raw.to_string(),
        target,
    }
}

fn parse_finite(text: &str, raw: &str, target: JsonNodeType) -> Result<f64, CoercionError> {
    let value: f64 = text.parse().map_err(|_| invalid(raw, target))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(out_of_range(raw, target))
    }
}

fn parse_integral(text: &str) -> Option<Value> {
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<u64>().map(Value::from))
        .ok()
}

fn to_integer(raw: &str) -> Result<Value, CoercionError> {
    let text = raw.trim();
    if integral_form(text).is_ok() {
        return parse_integral(text).ok_or_else(|| out_of_range(raw, JsonNodeType::Integer));
    }
    if numeric_form(text).is_err() {
        return Err(invalid(raw, JsonNodeType::Integer));
    }
    let value = parse_finite(text, raw, JsonNodeType::Integer)?;
    if value.fract() != 0.0 {
        return Err(CoercionError::FractionalInteger {
            raw: raw.to_string(),
        });
    }
    // i64::MAX is not representable as f64; the bound is exclusive.
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(out_of_range(raw, JsonNodeType::Integer));
    }
    Ok(Value::from(value as i64))
}

fn to_number(raw: &str) -> Result<Value, CoercionError> {
    let text = raw.trim();
    if integral_form(text).is_ok() {
        if let Some(value) = parse_integral(text) {
            return Ok(value);
        }
    } else if numeric_form(text).is_err() {
        return Err(invalid(raw, JsonNodeType::Number));
    }
    let value = parse_finite(text, raw, JsonNodeType::Number)?;
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| out_of_range(raw, JsonNodeType::Number))
}

fn to_boolean(raw: &str) -> Result<Value, CoercionError> {
    let text = raw.trim();
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Ok(Value::Bool(true))
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Ok(Value::Bool(false))
    } else {
        Err(invalid(raw, JsonNodeType::Boolean))
    }
}

fn to_null(raw: &str) -> Result<Value, CoercionError> {
    if raw.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Err(CoercionError::NotNull {
            raw: raw.to_string(),
        })
    }
}

/// Boolean words, then integers, then other numbers, then empty as null,
/// then the raw string. `1` and `0` are integers here, never booleans.
fn infer(raw: &str) -> Value {
    let text = raw.trim();
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if numeric_form(text).is_ok() {
        if let Ok(value) = to_number(raw) {
            return value;
        }
    }
    if text.is_empty() {
        return Value::Null;
    }
    Value::String(raw.to_string())
}

/// Converts `raw` to a JSON value of type `target`.
///
/// A non-`infer` target either succeeds with exactly that type or fails; it
/// never falls back to another type.
pub fn coerce(raw: &str, target: JsonNodeType) -> Result<Value, CoercionError> {
    match target {
        JsonNodeType::String => Ok(Value::String(raw.to_string())),
        JsonNodeType::Integer => to_integer(raw),
        JsonNodeType::Number => to_number(raw),
        JsonNodeType::Boolean => to_boolean(raw),
        JsonNodeType::Null => to_null(raw),
        JsonNodeType::Infer => Ok(infer(raw)),
        JsonNodeType::Array | JsonNodeType::Object => Err(CoercionError::NotScalar { target }),
    }
}

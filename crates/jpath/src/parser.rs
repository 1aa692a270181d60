//! A `nom`-based parser for destination paths.
//!
//! ```text
//! path     := anchor? (key segment* | segment*)
//! anchor   := '$' | '@'
//! segment  := '.' key | '[' digits ']' | '[' ']' | '[' quoted ']'
//! ```
use super::ast::{Anchor, JsonPath, MAX_INDEX, PathSegment};
use crate::error::JPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0, u64 as nom_u64},
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, preceded},
};

// --- Main Public Parser ---

pub fn parse_path(input: &str) -> Result<JsonPath, JPathError> {
    match json_path(input.trim()) {
        Ok(("", path)) => check_indexes(input, path),
        Ok((rem, _)) => Err(JPathError::JPathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(JPathError::JPathParse(input.to_string(), e.to_string())),
    }
}

fn check_indexes(input: &str, path: JsonPath) -> Result<JsonPath, JPathError> {
    let too_large = path.segments.iter().find_map(|segment| match segment {
        PathSegment::Index(index) if *index > MAX_INDEX => Some(*index),
        _ => None,
    });
    match too_large {
        Some(index) => Err(JPathError::JPathParse(
            input.to_string(),
            format!("Index {} exceeds the maximum of {}", index, MAX_INDEX),
        )),
        None => Ok(path),
    }
}

// --- Combinators ---

fn anchor(input: &str) -> IResult<&str, Anchor> {
    alt((
        map(char('$'), |_| Anchor::Root),
        map(char('@'), |_| Anchor::Current),
    ))
    .parse(input)
}

fn key(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !matches!(c, '.' | '[' | ']') && !c.is_whitespace()),
        str::to_string,
    )
    .parse(input)
}

fn quoted_key(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        str::to_string,
    )
    .parse(input)
}

fn bracket_segment(input: &str) -> IResult<&str, PathSegment> {
    delimited(
        char('['),
        ws(alt((
            map(nom_u64, |n| {
                PathSegment::Index(usize::try_from(n).unwrap_or(usize::MAX))
            }),
            map(quoted_key, PathSegment::Key),
            map(multispace0, |_| PathSegment::Append),
        ))),
        char(']'),
    )
    .parse(input)
}

fn segment(input: &str) -> IResult<&str, PathSegment> {
    alt((map(preceded(char('.'), key), PathSegment::Key), bracket_segment)).parse(input)
}

fn json_path(input: &str) -> IResult<&str, JsonPath> {
    let (input, anchor) = opt(anchor).parse(input)?;
    let (input, first) = match anchor {
        Some(_) => (input, None),
        None => opt(map(key, PathSegment::Key)).parse(input)?,
    };
    let (input, rest) = many0(segment).parse(input)?;

    let mut segments: Vec<PathSegment> = first.into_iter().collect();
    segments.extend(rest);
    Ok((
        input,
        JsonPath {
            anchor: anchor.unwrap_or_default(),
            segments,
        },
    ))
}

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

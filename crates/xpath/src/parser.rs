//! A `nom`-based parser for the source path language.
//!
//! ```text
//! path       := '/' relative? | '//' relative | relative
//! relative   := step (('/' | '//') step)*
//! step       := '..' | '.' | '@' qname | ('*' | qname) predicate*
//! qname      := (ncname ':')? ncname
//! predicate  := '[' (integer | 'last()' | '@' qname ('=' literal)? | qname ('=' literal)?) ']'
//! ```

use super::ast::*;
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

// --- Main Public Parser ---

/// Parses a source path without binding namespace prefixes.
pub fn parse_source_path(input: &str) -> Result<SourcePath, XPathError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(XPathError::XPathParse(
            input.to_string(),
            "empty path".to_string(),
        ));
    }
    match location_path(trimmed) {
        Ok(("", path)) => {
            validate(&path).map_err(|message| XPathError::InvalidPath {
                path: input.to_string(),
                message,
            })?;
            Ok(path)
        }
        Ok((rem, _)) => Err(XPathError::XPathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(XPathError::XPathParse(input.to_string(), e.to_string())),
    }
}

/// Structural rules the grammar alone does not express.
fn validate(path: &SourcePath) -> Result<(), String> {
    let last = path.steps.len().saturating_sub(1);
    for (i, step) in path.steps.iter().enumerate() {
        if step.axis == Axis::Attribute && i != last {
            return Err("an attribute step must be the last step".to_string());
        }
        if step.predicates.contains(&Predicate::Position(0)) {
            return Err("positions are 1-based".to_string());
        }
    }
    Ok(())
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn ncname(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_char))).parse(input)
}

fn name_test(input: &str) -> IResult<&str, NameTest> {
    map(
        pair(ncname, opt(preceded(char(':'), ncname))),
        |(first, second)| match second {
            Some(local) => NameTest::new(Some(first), local),
            None => NameTest::new(None, first),
        },
    )
    .parse(input)
}

fn literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        str::to_string,
    )
    .parse(input)
}

// --- Predicates ---

fn position(input: &str) -> IResult<&str, Predicate> {
    map(map_res(digit1, str::parse::<usize>), Predicate::Position).parse(input)
}

fn attribute_predicate(input: &str) -> IResult<&str, Predicate> {
    map(
        pair(
            preceded(char('@'), name_test),
            opt(preceded(ws(char('=')), literal)),
        ),
        |(name, value)| match value {
            Some(value) => Predicate::AttributeEquals(name, value),
            None => Predicate::HasAttribute(name),
        },
    )
    .parse(input)
}

fn child_predicate(input: &str) -> IResult<&str, Predicate> {
    map(
        pair(name_test, opt(preceded(ws(char('=')), literal))),
        |(name, value)| match value {
            Some(value) => Predicate::ChildEquals(name, value),
            None => Predicate::HasChild(name),
        },
    )
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    delimited(
        char('['),
        ws(alt((
            map(tag("last()"), |_| Predicate::Last),
            position,
            attribute_predicate,
            child_predicate,
        ))),
        char(']'),
    )
    .parse(input)
}

// --- Steps ---

fn attribute_step(input: &str) -> IResult<&str, Step> {
    map(preceded(char('@'), name_test), Step::attribute).parse(input)
}

fn element_step(input: &str) -> IResult<&str, Step> {
    map(
        pair(
            alt((
                map(char('*'), |_| NodeTest::Wildcard),
                map(name_test, NodeTest::Name),
            )),
            many0(predicate),
        ),
        |(test, predicates)| Step {
            axis: Axis::Child,
            test,
            predicates,
        },
    )
    .parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    alt((
        map(tag(".."), |_| Step::parent()),
        map(char('.'), |_| Step::self_node()),
        attribute_step,
        element_step,
    ))
    .parse(input)
}

fn relative_steps(input: &str) -> IResult<&str, Vec<Step>> {
    let (input, first) = step(input)?;
    let (input, rest) = many0(pair(alt((tag("//"), tag("/"))), step)).parse(input)?;

    let mut steps = vec![first];
    for (sep, next) in rest {
        if sep == "//" {
            steps.push(Step::descendant_or_self());
        }
        steps.push(next);
    }
    Ok((input, steps))
}

fn absolute_path(input: &str) -> IResult<&str, SourcePath> {
    let (input, sep) = alt((tag("//"), tag("/"))).parse(input)?;
    let (input, rest) = if sep == "//" {
        map(relative_steps, Some).parse(input)?
    } else {
        opt(relative_steps).parse(input)?
    };

    let mut steps = Vec::new();
    if sep == "//" {
        steps.push(Step::descendant_or_self());
    }
    steps.extend(rest.unwrap_or_default());
    Ok((
        input,
        SourcePath {
            is_absolute: true,
            steps,
        },
    ))
}

fn location_path(input: &str) -> IResult<&str, SourcePath> {
    alt((
        absolute_path,
        map(relative_steps, |steps| SourcePath {
            is_absolute: false,
            steps,
        }),
    ))
    .parse(input)
}

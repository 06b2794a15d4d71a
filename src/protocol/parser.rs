//! Query parser
//!
//! nom grammar for one query line:
//!
//! ```text
//! CREATEDB <ident>
//! GET <ident>.<ident>
//! SET <ident>.<ident> "<string>"
//! UPDATE <ident>.<ident> "<string>"
//! REMOVE DB <ident>
//! REMOVE KEY <ident>[.<ident>]
//! LIST [<ident>]
//! ```
//!
//! Keywords are case-sensitive. Tokens are separated by spaces or tabs, and
//! leading/trailing blanks are ignored. The whole line must match.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map, opt},
    error::{Error, ErrorKind},
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};

use crate::error::{KvdbError, Result};

use super::Query;

/// Parse one query line
///
/// Any input that does not match the grammar is `BadQuery`.
pub fn parse_query(input: &str) -> Result<Query> {
    all_consuming(delimited(space0, query, space0))(input)
        .map(|(_, query)| query)
        .map_err(|_| KvdbError::BadQuery)
}

fn query(i: &str) -> IResult<&str, Query> {
    alt((create_db, get, set, update, remove, list))(i)
}

// =============================================================================
// Tokens
// =============================================================================

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ident(i: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char)(i)
}

/// `<namespace>.<key>`
fn location(i: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(ident, char('.'), ident)(i)
}

/// A keyword followed by at least one blank
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |i: &'a str| {
        let (i, matched) = tag(word)(i)?;
        let (i, _) = space1(i)?;
        Ok((i, matched))
    }
}

/// Double-quoted literal with the surrounding quotes stripped
///
/// `\"` and `\\` are unescaped; any other backslash is kept as is.
fn string_literal(i: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('"')(i)?;
    let mut value = String::new();

    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None => return Err(nom::Err::Error(Error::new(rest, ErrorKind::Char))),
            Some('"') => return Ok((chars.as_str(), value)),
            Some('\\') => {
                let mut lookahead = chars.clone();
                match lookahead.next() {
                    Some(escaped @ ('"' | '\\')) => {
                        value.push(escaped);
                        chars = lookahead;
                    }
                    _ => value.push('\\'),
                }
            }
            Some(c) => value.push(c),
        }
        rest = chars.as_str();
    }
}

// =============================================================================
// Statements
// =============================================================================

fn create_db(i: &str) -> IResult<&str, Query> {
    map(preceded(keyword("CREATEDB"), ident), |name: &str| {
        Query::CreateNamespace {
            name: name.to_string(),
        }
    })(i)
}

fn get(i: &str) -> IResult<&str, Query> {
    map(preceded(keyword("GET"), location), |(namespace, key)| {
        Query::Get {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    })(i)
}

fn set(i: &str) -> IResult<&str, Query> {
    map(
        preceded(keyword("SET"), separated_pair(location, space1, string_literal)),
        |((namespace, key), value)| Query::Set {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
        },
    )(i)
}

fn update(i: &str) -> IResult<&str, Query> {
    map(
        preceded(
            keyword("UPDATE"),
            separated_pair(location, space1, string_literal),
        ),
        |((namespace, key), value)| Query::Update {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
        },
    )(i)
}

fn remove(i: &str) -> IResult<&str, Query> {
    preceded(keyword("REMOVE"), alt((remove_db, remove_key)))(i)
}

fn remove_db(i: &str) -> IResult<&str, Query> {
    map(preceded(keyword("DB"), ident), |namespace: &str| {
        Query::RemoveNamespace {
            namespace: namespace.to_string(),
        }
    })(i)
}

fn remove_key(i: &str) -> IResult<&str, Query> {
    map(
        preceded(keyword("KEY"), pair(ident, opt(preceded(char('.'), ident)))),
        |(namespace, key): (&str, Option<&str>)| Query::RemoveKey {
            namespace: namespace.to_string(),
            key: key.map(str::to_string),
        },
    )(i)
}

fn list(i: &str) -> IResult<&str, Query> {
    map(
        tuple((tag("LIST"), opt(preceded(space1, ident)))),
        |(_, namespace): (&str, Option<&str>)| Query::List {
            namespace: namespace.map(str::to_string),
        },
    )(i)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC tokenizer using nom
//!
//! Parses single `#id=TYPE(args);` records into borrowed tokens and scans a
//! whole file for record boundaries without decoding attributes.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, digit1, multispace1, one_of},
    combinator::{map, map_res, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::schema::IfcType;

/// STEP/IFC Token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal with STEP escapes left in place: 'text'
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Real: 3.14, 0., 1.E-5
    Float(f64),
    /// Enumeration without dots: .TRUE. -> TRUE
    Enum(&'a str),
    /// List: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Typed value: IFCPARAMETERVALUE(0.), IFCLABEL('x')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value: $
    Null,
    /// Derived value: *
    Derived,
}

/// Skip whitespace and `/* ... */` comments
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
        ))),
    )(input)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn step_id(input: &str) -> IResult<&str, u32> {
    preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>()))(input)
}

fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(step_id, Token::EntityRef)(input)
}

/// String body up to the closing quote; a doubled quote is an escaped quote
fn string_body(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Ok((&input[i..], &input[..i]));
        }
        i += 1;
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn string_literal(input: &str) -> IResult<&str, Token> {
    map(delimited(char('\''), string_body, char('\'')), Token::String)(input)
}

fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>().map(Token::Integer)
    })(input)
}

/// Real with mandatory decimal point; digits after the point are optional
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>().map(Token::Float),
    )(input)
}

fn enum_value(input: &str) -> IResult<&str, Token> {
    map(delimited(char('.'), keyword, char('.')), Token::Enum)(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        char('('),
        separated_list0(char(','), token),
        preceded(ws, char(')')),
    )(input)
}

fn typed_value(input: &str) -> IResult<&str, Token> {
    map(pair(keyword, arguments), |(name, args)| {
        Token::TypedValue(name, args)
    })(input)
}

fn list(input: &str) -> IResult<&str, Token> {
    map(arguments, Token::List)(input)
}

/// One token with surrounding whitespace and comments
fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // before integer: both start with digits
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            value(Token::Null, char('$')),
            value(Token::Derived, char('*')),
        )),
        ws,
    )(input)
}

fn record(input: &str) -> IResult<&str, (u32, &str, Vec<Token>)> {
    tuple((
        delimited(ws, step_id, ws),
        preceded(char('='), delimited(ws, keyword, ws)),
        terminated(arguments, tuple((ws, char(';')))),
    ))(input)
}

/// Parse a complete entity record
///
/// Example: `#123=IFCFACE((#124));`
pub fn parse_entity(input: &str) -> Result<(u32, IfcType, Vec<Token>)> {
    match record(input) {
        Ok((_, (id, type_name, args))) => {
            Ok((id, IfcType::from_str(&type_name.to_ascii_uppercase()), args))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            Err(Error::parse(
                position,
                format!("malformed entity record near {:?}", preview(e.input)),
            ))
        }
        Err(nom::Err::Incomplete(_)) => Err(Error::parse(input.len(), "truncated entity record")),
    }
}

fn preview(s: &str) -> &str {
    let end = s
        .char_indices()
        .nth(40)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}

/// Byte offset just past the `;` terminating the record starting at `start`,
/// skipping semicolons inside string literals and comments.
pub(crate) fn record_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                i += 1;
                loop {
                    let quote = i + memchr::memchr(b'\'', bytes.get(i..)?)?;
                    if bytes.get(quote + 1) == Some(&b'\'') {
                        i = quote + 2;
                    } else {
                        i = quote + 1;
                        break;
                    }
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let close = memchr::memmem::find(bytes.get(i + 2..)?, b"*/")?;
                i += close + 4;
                continue;
            }
            b';' => return Some(i + 1),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Fast entity scanner - finds record boundaries without decoding attributes
pub struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan for the next entity
    /// Returns (entity_id, type_name, record_start, record_end)
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();
        loop {
            let start = self.position + memchr::memchr(b'#', &bytes[self.position..])?;
            let mut pos = start + 1;
            let id_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let id_end = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }

            // A '#' not followed by `digits =` is a reference inside a record
            // we failed to skip, or stray header text.
            if id_end == id_start || bytes.get(pos) != Some(&b'=') {
                self.position = start + 1;
                continue;
            }

            let end = record_end(bytes, pos)?;
            self.position = end;

            let id = self.content[id_start..id_end].parse::<u32>().ok()?;
            let rest = &self.content[pos + 1..end];
            let type_name = rest.trim_start();
            let type_len = type_name
                .find(|c: char| c == '(' || c.is_whitespace())
                .unwrap_or(type_name.len());
            return Some((id, &type_name[..type_len], start, end));
        }
    }

    /// Find all entities of a specific type (case-insensitive)
    pub fn find_by_type(&mut self, target_type: &str) -> Vec<(u32, usize, usize)> {
        let mut results = Vec::new();
        while let Some((id, type_name, start, end)) = self.next_entity() {
            if type_name.eq_ignore_ascii_case(target_type) {
                results.push((id, start, end));
            }
        }
        results
    }

    /// Reset scanner to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(entity_ref("#123"), Ok(("", Token::EntityRef(123))));
        assert_eq!(integer("-42"), Ok(("", Token::Integer(-42))));
        assert_eq!(float("0."), Ok(("", Token::Float(0.0))));
        assert_eq!(float("1.5E-10"), Ok(("", Token::Float(1.5e-10))));
        assert_eq!(enum_value(".T."), Ok(("", Token::Enum("T"))));
    }

    #[test]
    fn test_escaped_string() {
        assert_eq!(
            string_literal("'it''s'"),
            Ok(("", Token::String("it''s")))
        );
    }

    #[test]
    fn test_nested_list() {
        let (_, token) = list("(1,(2.,3.),$)").unwrap();
        match token {
            Token::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], Token::Integer(1));
                assert_eq!(
                    items[1],
                    Token::List(vec![Token::Float(2.0), Token::Float(3.0)])
                );
                assert_eq!(items[2], Token::Null);
            }
            other => panic!("Expected List token, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_entity() {
        let (id, ifc_type, args) =
            parse_entity("#9 = IFCDIRECTION((0.,0.,1.));").unwrap();
        assert_eq!(id, 9);
        assert_eq!(ifc_type, IfcType::IfcDirection);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_parse_entity_with_comments_and_typed_values() {
        let input = "#7=IFCPOLYLOOP(/* pts */ (#1, #2 ,#3 ), IFCLABEL('a'));";
        let (_, ifc_type, args) = parse_entity(input).unwrap();
        assert_eq!(ifc_type, IfcType::IfcPolyLoop);
        assert_eq!(args.len(), 2);
        assert_eq!(
            args[1],
            Token::TypedValue("IFCLABEL", vec![Token::String("a")])
        );
    }

    #[test]
    fn test_parse_entity_error_has_position() {
        let err = parse_entity("#1=IFCFACE((#2);").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_scanner_skips_semicolons_in_strings() {
        let content = "ISO-10303-21;\nDATA;\n\
                       #1=IFCSURFACESTYLE('a;b',.BOTH.,(#2));\n\
                       #2=IFCFACE((#3));\nENDSEC;";
        let mut scanner = EntityScanner::new(content);
        let (id, type_name, start, end) = scanner.next_entity().unwrap();
        assert_eq!(id, 1);
        assert_eq!(type_name, "IFCSURFACESTYLE");
        assert!(content[start..end].ends_with("(#2));"));
        let (id, type_name, _, _) = scanner.next_entity().unwrap();
        assert_eq!((id, type_name), (2, "IFCFACE"));
        assert!(scanner.next_entity().is_none());

        scanner.reset();
        assert_eq!(scanner.find_by_type("ifcface").len(), 1);
    }
}

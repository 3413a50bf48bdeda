//! Line grammar for ROS `.msg` text, built from `nom` combinators.
//!
//! Every line is classified on its own, with ordered choice:
//!
//! ```text
//! line      = blank | comment | constant | field
//! comment   = "#"+ text
//! constant  = scalar NAME "=" value [comment]      (tried before field)
//! field     = type NAME [default] [comment]
//! type      = (scalar ["<=" N] | pkg "/" Type | Type) ["[" ["<="] [N] "]"]
//! ```
//!
//! String constants take the rest of the line as their value, `#` included.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_till1},
    character::complete::{alpha1, alphanumeric1, char, digit1, space0, space1},
    combinator::{map, map_opt, map_res, opt, recognize, rest, success, verify},
    multi::{many0, many1, many_m_n},
    sequence::{delimited, pair, preceded, tuple},
};
use protoros_core::ScalarType;

/// One classified line of a `.msg` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    /// Comment text with the leading `#`s and spaces removed.
    Comment(&'a str),
    Constant(ConstantDecl<'a>),
    Field(FieldDecl<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType<'a> {
    Scalar(ScalarType),
    /// `Type`, `pkg/Type` or `pkg/msg/Type`, verbatim.
    Named(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySuffix {
    /// `[]`
    Unbounded,
    /// `[N]`
    Fixed(usize),
    /// `[<=N]`
    Bounded(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec<'a> {
    pub base: BaseType<'a>,
    /// `N` of `string<=N` / `wstring<=N`.
    pub string_bound: Option<usize>,
    pub array: Option<ArraySuffix>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl<'a> {
    pub ty: TypeSpec<'a>,
    pub name: &'a str,
    /// 1-based column of `name`.
    pub name_column: usize,
    pub default: Option<&'a str>,
    pub comment: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDecl<'a> {
    pub ty: ScalarType,
    pub name: &'a str,
    /// 1-based column of `name`.
    pub name_column: usize,
    pub value: &'a str,
    pub comment: Option<&'a str>,
}

/// Where and why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based column.
    pub column: usize,
    pub reason: String,
}

/// Classify a single line (without its line terminator).
pub fn parse_line(line: &str) -> Result<Line<'_>, LineError> {
    let body = line.trim_end_matches(['\r', '\n']);
    let trimmed = body.trim_start();
    if trimmed.trim_end().is_empty() {
        return Ok(Line::Blank);
    }
    if trimmed.starts_with('#') {
        return match comment(trimmed) {
            Ok((_, text)) => Ok(Line::Comment(text)),
            Err(_) => Err(LineError {
                column: column_of(body, trimmed),
                reason: "malformed comment".to_string(),
            }),
        };
    }

    let (remaining, mut decl) = alt((
        map(constant_decl, Line::Constant),
        map(field_decl, Line::Field),
    ))(trimmed)
    .map_err(|e| {
        let at = match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
            nom::Err::Incomplete(_) => "",
        };
        LineError {
            column: column_of(body, at),
            reason: "expected `TYPE NAME` or `TYPE NAME=VALUE`".to_string(),
        }
    })?;

    if !remaining.trim().is_empty() {
        let reason = if remaining.trim_start().starts_with('=') {
            "constants must have a non-array scalar type".to_string()
        } else {
            format!("unexpected `{}`", remaining.trim())
        };
        return Err(LineError {
            column: column_of(body, remaining.trim_start()),
            reason,
        });
    }

    // The declaration parsers count from the start of `trimmed`.
    let indent = column_of(body, trimmed) - 1;
    match &mut decl {
        Line::Constant(c) => c.name_column += indent,
        Line::Field(f) => f.name_column += indent,
        Line::Blank | Line::Comment(_) => {}
    }
    Ok(decl)
}

fn column_of(line: &str, remaining: &str) -> usize {
    line.len() - remaining.len() + 1
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

fn scalar(input: &str) -> IResult<&str, ScalarType> {
    map_opt(identifier, ScalarType::from_ros_keyword)(input)
}

fn type_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        identifier,
        many_m_n(0, 2, preceded(char('/'), identifier)),
    ))(input)
}

fn base_type(input: &str) -> IResult<&str, (BaseType<'_>, Option<usize>)> {
    alt((
        map(
            verify(
                pair(scalar, opt(preceded(tag("<="), number))),
                |(ty, bound): &(ScalarType, Option<usize>)| {
                    bound.is_none() || matches!(ty, ScalarType::String | ScalarType::WString)
                },
            ),
            |(ty, bound)| (BaseType::Scalar(ty), bound),
        ),
        map(type_name, |name| (BaseType::Named(name), None)),
    ))(input)
}

fn array_suffix(input: &str) -> IResult<&str, ArraySuffix> {
    delimited(
        char('['),
        alt((
            map(preceded(tag("<="), number), ArraySuffix::Bounded),
            map(number, ArraySuffix::Fixed),
            success(ArraySuffix::Unbounded),
        )),
        char(']'),
    )(input)
}

fn type_spec(input: &str) -> IResult<&str, TypeSpec<'_>> {
    map(
        pair(base_type, opt(array_suffix)),
        |((base, string_bound), array)| TypeSpec {
            base,
            string_bound,
            array,
        },
    )(input)
}

/// `# text`, `## text`, `#`
fn comment(input: &str) -> IResult<&str, &str> {
    preceded(many1(char('#')), map(rest, str::trim))(input)
}

fn trailing_comment(input: &str) -> IResult<&str, Option<&str>> {
    preceded(space0, opt(comment))(input)
}

fn constant_decl(start: &str) -> IResult<&str, ConstantDecl<'_>> {
    let (input, (ty, _)) = pair(scalar, space1)(start)?;
    let name_column = column_of(start, input);
    let (input, (name, _, _, _)) = tuple((identifier, space0, char('='), space0))(input)?;

    if ty == ScalarType::String {
        let (input, value) = map(rest, str::trim)(input)?;
        return Ok((
            input,
            ConstantDecl {
                ty,
                name,
                name_column,
                value,
                comment: None,
            },
        ));
    }

    let (input, value) = verify(map(take_till(|c| c == '#'), str::trim), |v: &str| {
        !v.is_empty()
    })(input)?;
    let (input, comment) = trailing_comment(input)?;
    Ok((
        input,
        ConstantDecl {
            ty,
            name,
            name_column,
            value,
            comment,
        },
    ))
}

fn default_value(input: &str) -> IResult<&str, &str> {
    verify(map(take_till1(|c| c == '#'), str::trim), |v: &str| {
        !v.is_empty() && !v.starts_with('=')
    })(input)
}

fn field_decl(start: &str) -> IResult<&str, FieldDecl<'_>> {
    let (input, (ty, _)) = pair(type_spec, space1)(start)?;
    let name_column = column_of(start, input);
    map(
        tuple((
            identifier,
            opt(preceded(space1, default_value)),
            trailing_comment,
        )),
        move |(name, default, comment)| FieldDecl {
            ty,
            name,
            name_column,
            default,
            comment,
        },
    )(input)
}

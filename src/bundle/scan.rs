use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{anychar, char, multispace0, satisfy},
    combinator::{recognize, value},
    multi::many0_count,
    sequence::{delimited, preceded},
};

/// A `require("...")` call with a string literal argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequireCall<'a> {
    pub specifier: &'a str,
    /// Byte range of the whole call expression.
    pub start: usize,
    pub end: usize,
}

/// Finds require calls outside comments and string literals.
///
/// Member calls like `module.require("x")` are skipped. Regular expression literals are not
/// recognized.
pub fn scan_requires(source: &str) -> Vec<RequireCall<'_>> {
    let mut calls = vec![];
    let mut input = source;
    let mut member = false;

    while let Some(character) = input.chars().next() {
        let start = source.len() - input.len();

        if let Ok((rest, ())) = ignored(input) {
            input = rest;
            member = false;
        } else if let Ok((rest, word)) = identifier(input) {
            input = rest;

            if word == "require" && !member {
                if let Ok((rest, specifier)) = arguments(input) {
                    input = rest;
                    calls.push(RequireCall {
                        specifier,
                        start,
                        end: source.len() - input.len(),
                    });
                }
            }

            member = false;
        } else {
            if !character.is_whitespace() {
                member = character == '.';
            }

            input = &input[character.len_utf8()..];
        }
    }

    calls
}

/// Replaces require calls for which `rewrite` returns a replacement.
pub fn rewrite_requires(
    source: &str,
    mut rewrite: impl FnMut(&RequireCall) -> Option<String>,
) -> String {
    let mut output = String::with_capacity(source.len());
    let mut last = 0;

    for call in scan_requires(source) {
        if let Some(replacement) = rewrite(&call) {
            output.push_str(&source[last..call.start]);
            output.push_str(&replacement);
            last = call.end;
        }
    }

    output.push_str(&source[last..]);

    output
}

fn arguments(input: &str) -> IResult<&str, &str> {
    delimited(
        (multispace0, char('('), multispace0),
        string_literal,
        (multispace0, char(')')),
    )
    .parse(input)
}

fn ignored(input: &str) -> IResult<&str, ()> {
    alt((
        line_comment,
        block_comment,
        value((), string_literal),
        template_literal,
    ))
    .parse(input)
}

fn line_comment(input: &str) -> IResult<&str, ()> {
    value((), (tag("//"), take_while(|character| character != '\n'))).parse(input)
}

fn block_comment(input: &str) -> IResult<&str, ()> {
    value((), (tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

fn string_literal(input: &str) -> IResult<&str, &str> {
    alt((double_quoted, single_quoted)).parse(input)
}

fn double_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), quoted_body('"'), char('"')).parse(input)
}

fn single_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), quoted_body('\''), char('\'')).parse(input)
}

fn quoted_body<'a>(
    quote: char,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    recognize(many0_count(alt((
        preceded(char('\\'), anychar),
        satisfy(move |character| character != quote && character != '\\' && character != '\n'),
    ))))
}

fn template_literal(input: &str) -> IResult<&str, ()> {
    value(
        (),
        (
            char('`'),
            many0_count(alt((
                preceded(char('\\'), anychar),
                satisfy(|character| character != '`' && character != '\\'),
            ))),
            char('`'),
        ),
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|character: char| {
        character.is_alphanumeric() || character == '_' || character == '$'
    })
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn specifiers(source: &str) -> Vec<&str> {
        scan_requires(source)
            .into_iter()
            .map(|call| call.specifier)
            .collect()
    }

    #[test]
    fn scan_require_calls() {
        assert_eq!(
            specifiers("var a = require('./a');\nvar b = require( \"b\" );"),
            vec!["./a", "b"]
        );
    }

    #[test]
    fn scan_require_call_range() {
        let source = "x(require('a'));";

        assert_eq!(
            scan_requires(source),
            vec![RequireCall {
                specifier: "a",
                start: 2,
                end: 14
            }]
        );
        assert_eq!(&source[2..14], "require('a')");
    }

    #[test]
    fn skip_comments_and_strings() {
        assert_eq!(
            specifiers(
                "// require('a')\n/* require('b') */\n\
                 var s = \"require('c')\";\nvar t = `require('d')`;\nrequire('e');"
            ),
            vec!["e"]
        );
    }

    #[test]
    fn skip_escaped_quotes() {
        assert_eq!(specifiers(r#"var s = "\" require('a')"; require('b');"#), vec!["b"]);
    }

    #[test]
    fn skip_member_and_prefixed_calls() {
        assert_eq!(
            specifiers(
                "module.require('a'); myrequire('b'); module . require('c'); require_('d');"
            ),
            Vec::<&str>::new()
        );
    }

    #[test]
    fn skip_dynamic_require() {
        assert_eq!(specifiers("require(name); require('a' + b);"), Vec::<&str>::new());
    }

    #[test]
    fn rewrite_selected_calls() {
        assert_eq!(
            rewrite_requires("require('a'); require('b');", |call| {
                (call.specifier == "a").then(|| "__require(1)".to_owned())
            }),
            "__require(1); require('b');"
        );
    }

    #[test]
    fn rewrite_nothing() {
        assert_eq!(rewrite_requires("foo();", |_| None), "foo();");
    }
}

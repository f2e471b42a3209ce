use logos::{Lexer, Logos};

use crate::{config::DEFAULT_MAX_PARSE_DEPTH, error::LispleError, interpreter::Value};


/// The lexer can only fail on a quote that is never closed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UnterminatedString;

#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"\s+")]
#[logos(error = UnterminatedString)]
pub enum Token<'a> {
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    // Everything up to the next quote, no escapes
    #[token("\"", quoted_string)]
    QuotedString(&'a str),

    #[regex(r#"[^\s()"]+"#, classify_atom)]
    Atom(Atom<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom<'a> {
    Integer(i64),
    Float(f64),
    Symbol(&'a str),
}

impl<'a> From<Atom<'a>> for Value {
    fn from(atom: Atom<'a>) -> Self {
        match atom {
            Atom::Integer(integer) => Value::Integer(integer),
            Atom::Float(float) => Value::Float(float),
            Atom::Symbol(symbol) => Value::Symbol(symbol.to_owned()),
        }
    }
}

fn quoted_string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Result<&'a str, UnterminatedString> {
    let end = lex.remainder().find('"').ok_or(UnterminatedString)?;
    lex.bump(end + 1);

    let slice = lex.slice();
    Ok(&slice[1..slice.len() - 1])
}

fn classify_atom<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Atom<'a> {
    // Integers win over floats, so "3" never becomes 3.0
    let slice = lex.slice();
    if let Ok(integer) = slice.parse() { return Atom::Integer(integer) }
    if let Ok(float) = slice.parse() { return Atom::Float(float) }
    Atom::Symbol(slice)
}

type ParseResult<O> = Result<O, LispleError>;

/// Reads a single token off the front of `text`, returning it together with
/// the unconsumed remainder. `None` means only whitespace was left.
///
/// An unterminated quote consumes nothing, the error is reported against the
/// whole of `text`.
pub fn next_token<'a>(text: &'a str) -> ParseResult<Option<(Token<'a>, &'a str)>> {
    let mut lexer = Token::lexer(text);
    match lexer.next() {
        None => Ok(None),
        Some(Ok(token)) => Ok(Some((token, lexer.remainder()))),
        Some(Err(UnterminatedString)) => Err(LispleError::UnterminatedQuotedString),
    }
}

fn parse_token<'a>(token: Token<'a>, rest: &'a str, depth: usize, max_depth: usize) -> ParseResult<(&'a str, Value)> {
    match token {
        Token::LeftParen => parse_list(rest, depth + 1, max_depth),
        Token::RightParen => Err(LispleError::UnmatchedCloseParen),
        Token::QuotedString(text) => Ok((rest, Value::QuotedString(text.to_owned()))),
        Token::Atom(atom) => Ok((rest, atom.into())),
    }
}

fn parse_list(mut input: &str, depth: usize, max_depth: usize) -> ParseResult<(&str, Value)> {
    // Called just after an opening paren, collects elements until the matching close
    if depth > max_depth { return Err(LispleError::TooDeeplyNested(max_depth)); }

    let mut elements = vec![];
    loop {
        let (token, rest) = next_token(input)?.ok_or(LispleError::UnmatchedOpenParen)?;
        if token == Token::RightParen { return Ok((rest, Value::List(elements))) }

        let (rest, element) = parse_token(token, rest, depth, max_depth)?;
        elements.push(element);
        input = rest;
    }
}

fn parse_sexp(input: &str, max_depth: usize) -> ParseResult<(&str, Value)> {
    match next_token(input)? {
        Some((token, rest)) => parse_token(token, rest, 0, max_depth),
        None => Err(LispleError::EmptyInput),
    }
}

/// Parses exactly one expression from `input` with the default nesting limit.
pub fn parse(input: &str) -> ParseResult<Value> {
    parse_with_limit(input, DEFAULT_MAX_PARSE_DEPTH)
}

/// Parses exactly one expression from `input`. Lists nested deeper than
/// `max_depth` are rejected, and so is anything but whitespace after the
/// expression.
pub fn parse_with_limit(input: &str, max_depth: usize) -> ParseResult<Value> {
    let (rest, sexp) = parse_sexp(input, max_depth)?;

    let rest = rest.trim();
    if !rest.is_empty() { return Err(LispleError::TrailingInput(rest.to_owned())); }

    Ok(sexp)
}

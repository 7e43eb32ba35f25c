use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenSpan};
use crate::stream::TokenStream;

/// The pieces of a `<tag [scope] entries>` literal
#[derive(Debug, Clone, PartialEq)]
pub struct ElementLiteral<'src> {
    pub tag: &'src str,
    /// Bracketed scope expression; `None` when the literal has no brackets
    pub scope: Option<&'src str>,
    /// Attribute entries after the scope, unsplit
    pub entries: &'src str,
}

pub fn parse_element(literal: &str) -> ParseResult<ElementLiteral<'_>> {
    let literal = literal.trim();
    let stream = TokenStream::new(literal);
    let whole = TokenSpan::new(0, literal.len());

    if stream.token(0) != Some(Token::Lt) {
        return Err(ParseError::invalid_syntax(whole, "element literals start with '<'"));
    }
    let end = match stream.element_end(0) {
        Some(end) if end + 1 == stream.len() => end,
        _ => return Err(ParseError::invalid_syntax(whole, "malformed element literal")),
    };

    let (tag, after_tag) = match stream.token(1) {
        Some(Token::Bang) => (
            &literal[stream.lexeme(1).span.start..stream.lexeme(2).span.end],
            3,
        ),
        Some(Token::Ident(tag)) => (tag, 2),
        _ => return Err(ParseError::invalid_syntax(whole, "missing element tag")),
    };

    if after_tag == end {
        return Ok(ElementLiteral {
            tag,
            scope: None,
            entries: "",
        });
    }

    let close = stream.closing(after_tag)?;
    let scope = &literal[stream.lexeme(after_tag).span.end..stream.lexeme(close).span.start];
    let entries = &literal[stream.lexeme(close).span.end..stream.lexeme(end).span.start];

    Ok(ElementLiteral {
        tag,
        scope: Some(scope),
        entries,
    })
}

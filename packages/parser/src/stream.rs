//! Indexed token buffer shared by the grammar scanners
//!
//! The scanners never build a tree. They only need to know where a
//! balanced literal or an element literal ends, so the stream offers
//! those two lookups over a flat token vector.

use crate::error::{ParseError, ParseResult};
use crate::lexer::{lex, Token, TokenSpan};

/// A token, or `None` for a character the lexer did not recognise
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Lexeme<'src> {
    pub token: Option<Token<'src>>,
    pub span: TokenSpan,
}

pub(crate) struct TokenStream<'src> {
    lexemes: Vec<Lexeme<'src>>,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Self {
        let lexemes = lex(source)
            .map(|result| match result {
                Ok(spanned) => Lexeme {
                    token: Some(spanned.token),
                    span: spanned.span,
                },
                Err(error) => Lexeme {
                    token: None,
                    span: error.span,
                },
            })
            .collect();
        Self { lexemes }
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    pub fn lexeme(&self, index: usize) -> Lexeme<'src> {
        self.lexemes[index]
    }

    pub fn token(&self, index: usize) -> Option<Token<'src>> {
        self.lexemes.get(index).and_then(|lexeme| lexeme.token)
    }

    pub fn first_unrecognised(&self) -> Option<TokenSpan> {
        self.lexemes
            .iter()
            .find(|lexeme| lexeme.token.is_none())
            .map(|lexeme| lexeme.span)
    }

    /// Index of the delimiter closing the opener at `open`
    pub fn closing(&self, open: usize) -> ParseResult<usize> {
        let mut expected: Vec<Token<'src>> = Vec::new();

        for index in open..self.lexemes.len() {
            let lexeme = self.lexemes[index];
            match lexeme.token {
                Some(Token::LBracket) => expected.push(Token::RBracket),
                Some(Token::LBrace) => expected.push(Token::RBrace),
                Some(Token::LParen) => expected.push(Token::RParen),
                Some(close @ (Token::RBracket | Token::RBrace | Token::RParen)) => {
                    match expected.pop() {
                        Some(want) if want == close => {
                            if expected.is_empty() {
                                return Ok(index);
                            }
                        }
                        Some(want) => {
                            return Err(ParseError::unexpected_token(
                                lexeme.span,
                                want.describe(),
                                close.describe(),
                            ))
                        }
                        None => {
                            return Err(ParseError::unexpected_token(
                                lexeme.span,
                                "an opening delimiter",
                                close.describe(),
                            ))
                        }
                    }
                }
                _ => {}
            }
        }

        let expected = expected
            .last()
            .map(|token| token.describe())
            .unwrap_or_else(|| "a closing delimiter".to_string());
        Err(ParseError::unexpected_eof(expected))
    }

    /// Index of the `>` ending the element literal that starts at `lt`,
    /// or `None` when the `<` is a comparison operator
    pub fn element_end(&self, lt: usize) -> Option<usize> {
        let mut index = lt + 1;

        match self.token(index)? {
            Token::Bang => match self.token(index + 1)? {
                Token::Ident("doctype")
                    if self.lexemes[index].span.end == self.lexemes[index + 1].span.start =>
                {
                    index += 2
                }
                _ => return None,
            },
            Token::Ident(tag) if is_tag_name(tag) => index += 1,
            _ => return None,
        }

        match self.token(index)? {
            Token::Gt => Some(index),
            Token::LBracket => {
                let mut cursor = self.closing(index).ok()? + 1;
                while cursor < self.lexemes.len() {
                    match self.lexemes[cursor].token {
                        Some(Token::LBracket | Token::LBrace | Token::LParen) => {
                            cursor = self.closing(cursor).ok()? + 1;
                            continue;
                        }
                        Some(Token::Lt) => {
                            if let Some(end) = self.element_end(cursor) {
                                cursor = end + 1;
                                continue;
                            }
                        }
                        Some(Token::Gt) => return Some(cursor),
                        _ => {}
                    }
                    cursor += 1;
                }
                None
            }
            _ => None,
        }
    }
}

/// `[a-z][a-z0-9]*`
pub(crate) fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// `[a-zA-Z_$][0-9a-zA-Z_$]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Locate `part` inside `root` when it is a subslice of it
pub(crate) fn span_within(root: &str, part: &str) -> TokenSpan {
    let start = (part.as_ptr() as usize)
        .saturating_sub(root.as_ptr() as usize)
        .min(root.len());
    TokenSpan::new(start, (start + part.len()).min(root.len()))
}

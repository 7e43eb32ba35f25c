//! Lexer for reformulator expressions using logos
//!
//! Whitespace is insignificant between tokens. Characters that no token
//! accepts are reported as [`LexError`]s so callers can treat them as
//! opaque operand text.

use logos::Logos;

/// Token types for the expression language
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'src> {
    // Literals
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice())]
    Number(&'src str),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    DoubleQuoted(&'src str),

    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice())]
    SingleQuoted(&'src str),

    #[regex(r"[a-zA-Z_$][0-9a-zA-Z_$]*", |lex| lex.slice())]
    Ident(&'src str),

    #[token("@")]
    SelfRef,

    // Operators
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("#")]
    Hash,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,

    // Punctuation
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
}

impl<'src> Token<'src> {
    /// Human readable form used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Token::Number(text)
            | Token::DoubleQuoted(text)
            | Token::SingleQuoted(text)
            | Token::Ident(text) => format!("`{}`", text),
            Token::SelfRef => "'@'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Amp => "'&'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Bang => "'!'".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::Hash => "'#'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Percent => "'%'".to_string(),
            Token::Caret => "'^'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Question => "'?'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
        }
    }
}

/// Span information for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn offset(self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }
}

/// A token with its span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: TokenSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub span: TokenSpan,
    pub message: String,
}

/// Lex source text into tokens with spans
pub fn lex(source: &str) -> impl Iterator<Item = Result<SpannedToken<'_>, LexError>> + '_ {
    Token::lexer(source).spanned().map(|(result, span)| {
        let span = TokenSpan::new(span.start, span.end);
        match result {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(_) => Err(LexError {
                span,
                message: "Unexpected character".to_string(),
            }),
        }
    })
}

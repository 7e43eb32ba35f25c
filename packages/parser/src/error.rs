//! Error types for the expression grammar

use crate::lexer::TokenSpan;
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location and context
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: TokenSpan,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Invalid syntax at {span:?}: {message}")]
    InvalidSyntax { span: TokenSpan, message: String },

    #[error("Lexer error at {span:?}: {message}")]
    LexError { span: TokenSpan, message: String },
}

impl ParseError {
    pub fn unexpected_token(
        span: TokenSpan,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: TokenSpan, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn lex_error(span: TokenSpan, message: impl Into<String>) -> Self {
        Self::LexError {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<TokenSpan> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::InvalidSyntax { span, .. } => Some(*span),
            ParseError::LexError { span, .. } => Some(*span),
        }
    }

    /// Shift the error into the coordinates of an enclosing source string
    pub fn offset(self, by: usize) -> Self {
        match self {
            ParseError::UnexpectedToken {
                span,
                expected,
                found,
            } => ParseError::UnexpectedToken {
                span: span.offset(by),
                expected,
                found,
            },
            ParseError::UnexpectedEof { expected } => ParseError::UnexpectedEof { expected },
            ParseError::InvalidSyntax { span, message } => ParseError::InvalidSyntax {
                span: span.offset(by),
                message,
            },
            ParseError::LexError { span, message } => ParseError::LexError {
                span: span.offset(by),
                message,
            },
        }
    }
}

/// Collection of errors from a validation pass
#[derive(Debug, Default)]
pub struct ParseErrors {
    pub errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// Pretty-print errors with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_errors(source: &str, filename: &str, errors: &ParseErrors) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    for error in &errors.errors {
        let span = error.span().unwrap_or(TokenSpan {
            start: source.len().saturating_sub(1),
            end: source.len(),
        });

        let report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_color(Color::Red)
                    .with_message(match error {
                        ParseError::UnexpectedToken { expected, .. } => {
                            format!("expected {}", expected)
                        }
                        ParseError::UnexpectedEof { expected } => {
                            format!("expected {}", expected)
                        }
                        ParseError::InvalidSyntax { message, .. } => message.clone(),
                        ParseError::LexError { message, .. } => message.clone(),
                    }),
            )
            .finish();

        if report
            .write((filename, Source::from(source)), &mut output)
            .is_err()
        {
            output.extend_from_slice(format!("{}\n", error).as_bytes());
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "Error formatting failed".to_string())
}

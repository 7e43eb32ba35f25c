//! Static validation of expression text
//!
//! Evaluation never reports grammar problems; it collapses them to an
//! empty result. Tooling uses this module instead to locate the first
//! problem in an expression, descending into structure and element
//! literals, with spans relative to the outermost expression.

use crate::element::parse_element;
use crate::error::{ParseError, ParseResult};
use crate::operand::{classify_operand, Operand};
use crate::operation::split_operations;
use crate::operator::Operator;
use crate::stream::{is_identifier, span_within, TokenStream};
use crate::structure::split_entries;

/// Check `expression` and every literal nested inside it
pub fn validate_expression(expression: &str) -> ParseResult<()> {
    validate_within(expression, expression)
}

fn validate_within(root: &str, expression: &str) -> ParseResult<()> {
    let base = span_within(root, expression).start;
    let operations = split_operations(expression).map_err(|error| error.offset(base))?;

    for operation in &operations {
        if operation.operator == Operator::Member && is_identifier(operation.operand) {
            continue;
        }
        validate_operand(root, operation.operand)?;
    }

    Ok(())
}

fn validate_operand(root: &str, operand: &str) -> ParseResult<()> {
    match classify_operand(operand) {
        Operand::Object(interior) | Operand::Array(interior) => {
            validate_entries(root, interior, false)
        }
        Operand::Element(literal) => validate_element(root, literal),
        Operand::Invalid => {
            let span = span_within(root, operand);
            match TokenStream::new(operand).first_unrecognised() {
                Some(unknown) => Err(ParseError::lex_error(
                    unknown.offset(span.start),
                    "unexpected character",
                )),
                None => Err(ParseError::invalid_syntax(
                    span,
                    format!("`{}` is not a valid operand", operand.trim()),
                )),
            }
        }
        _ => Ok(()),
    }
}

fn validate_entries(root: &str, interior: &str, attributes: bool) -> ParseResult<()> {
    let base = span_within(root, interior).start;
    let entries = split_entries(interior).map_err(|error| error.offset(base))?;

    for entry in entries {
        if attributes && entry.key.map_or(false, |key| key.starts_with("on")) {
            continue;
        }
        validate_within(root, entry.expression)?;
    }

    Ok(())
}

fn validate_element(root: &str, literal: &str) -> ParseResult<()> {
    let base = span_within(root, literal).start;
    let element = parse_element(literal).map_err(|error| error.offset(base))?;

    if let Some(scope) = element.scope {
        if !scope.trim().is_empty() {
            validate_within(root, scope)?;
        }
    }

    validate_entries(root, element.entries, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenSpan;

    #[test]
    fn test_valid_expressions() {
        for expression in [
            "1 + 2 * 3",
            "links.length",
            "<a [url & image & @] href: url, onclick: open> | @",
            "{a: [1, 2], b: 'c'} + {d: 1}",
            "",
        ] {
            assert_eq!(validate_expression(expression), Ok(()), "{}", expression);
        }
    }

    #[test]
    fn test_invalid_operand_span_is_absolute() {
        let error = validate_expression("1 + a b").unwrap_err();
        assert_eq!(error.span(), Some(TokenSpan::new(4, 7)));
    }

    #[test]
    fn test_nested_errors_are_located() {
        let error = validate_expression("[1, {a: 1 : 2}]").unwrap_err();
        assert!(matches!(error, ParseError::InvalidSyntax { .. }));
        assert_eq!(error.span(), Some(TokenSpan::new(10, 11)));
    }

    #[test]
    fn test_unknown_characters_are_lex_errors() {
        let error = validate_expression("a + ~").unwrap_err();
        assert!(matches!(error, ParseError::LexError { .. }));
        assert_eq!(error.span(), Some(TokenSpan::new(4, 5)));
    }
}

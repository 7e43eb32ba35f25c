//! Splits an expression into `(operator, operand)` chunks
//!
//! The first chunk carries an implicit `(`. Operand text is kept as a raw
//! slice of the expression; literals (`[...]`, `{...}`, `<tag [...] ...>`)
//! are skipped over as a whole so their interiors never split the
//! expression.

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenSpan};
use crate::operator::Operator;
use crate::stream::TokenStream;

/// One operator and the operand text that follows it
#[derive(Debug, Clone, PartialEq)]
pub struct Operation<'src> {
    pub operator: Operator,
    /// Trimmed operand text, empty when the operand is absent
    pub operand: &'src str,
    /// Set when the operator applies to the following operand alone
    pub prefix: bool,
    pub operator_span: TokenSpan,
    pub operand_span: TokenSpan,
}

impl<'src> Operation<'src> {
    pub fn is_blank(&self) -> bool {
        self.operand.is_empty()
    }
}

struct Pending {
    operator: Operator,
    operator_span: TokenSpan,
    operand: Option<TokenSpan>,
}

impl Pending {
    fn new(operator: Operator, operator_span: TokenSpan) -> Self {
        Self {
            operator,
            operator_span,
            operand: None,
        }
    }

    fn extend(&mut self, span: TokenSpan) {
        self.operand = Some(match self.operand {
            Some(existing) => TokenSpan::new(existing.start, span.end),
            None => span,
        });
    }

    fn finish(self, expression: &str) -> Operation<'_> {
        let operand_span = self.operand.unwrap_or(TokenSpan::new(
            self.operator_span.end,
            self.operator_span.end,
        ));
        Operation {
            operator: self.operator,
            operand: &expression[operand_span.start..operand_span.end],
            prefix: false,
            operator_span: self.operator_span,
            operand_span,
        }
    }
}

/// Split `expression` into operator/operand chunks
pub fn split_operations(expression: &str) -> ParseResult<Vec<Operation<'_>>> {
    let stream = TokenStream::new(expression);
    let mut operations = Vec::new();
    let mut current = Pending::new(Operator::Open, TokenSpan::default());
    let mut index = 0;

    while index < stream.len() {
        let lexeme = stream.lexeme(index);

        let end = match lexeme.token {
            Some(Token::Lt) => match stream.element_end(index) {
                Some(end) => end,
                None => {
                    operations.push(current.finish(expression));
                    current = Pending::new(Operator::Subset, lexeme.span);
                    index += 1;
                    continue;
                }
            },
            Some(Token::LBracket | Token::LBrace) => stream.closing(index)?,
            Some(token @ (Token::Colon | Token::Comma)) => {
                return Err(ParseError::unexpected_token(
                    lexeme.span,
                    "an operator or operand",
                    token.describe(),
                ))
            }
            Some(token) => {
                if let Some(operator) = Operator::from_token(&token) {
                    operations.push(current.finish(expression));
                    current = Pending::new(operator, lexeme.span);
                    index += 1;
                    continue;
                }
                index
            }
            None => index,
        };

        current.extend(TokenSpan::new(lexeme.span.start, stream.lexeme(end).span.end));
        index = end + 1;
    }
    operations.push(current.finish(expression));

    mark_prefixes(expression, &mut operations);
    Ok(operations)
}

fn mark_prefixes(expression: &str, operations: &mut [Operation<'_>]) {
    for index in 1..operations.len() {
        let previous = &operations[index - 1];
        let after_gap = previous.is_blank() && previous.operator != Operator::Close;
        let current = &operations[index];

        let prefix = after_gap
            && match current.operator {
                Operator::NotEqual | Operator::Exists => true,
                Operator::Subtract => expression[current.operator_span.end..]
                    .starts_with(|c: char| {
                        c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '@' | '(')
                    }),
                _ => false,
            };

        operations[index].prefix = prefix;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(expression: &str) -> Vec<(char, &str)> {
        split_operations(expression)
            .unwrap()
            .into_iter()
            .map(|op| (op.operator.symbol(), op.operand))
            .collect()
    }

    #[test]
    fn test_split_simple_arithmetic() {
        assert_eq!(
            chunks("1 + 2 * 3"),
            vec![('(', "1"), ('+', "2"), ('*', "3")]
        );
    }

    #[test]
    fn test_split_keeps_literals_whole() {
        assert_eq!(
            chunks("[1, 2] + {a: 1 | 2}"),
            vec![('(', "[1, 2]"), ('+', "{a: 1 | 2}")]
        );
        assert_eq!(
            chunks("<a [url & @] href: url> | @"),
            vec![('(', "<a [url & @] href: url>"), ('|', "@")]
        );
    }

    #[test]
    fn test_split_comparison_is_not_an_element() {
        assert_eq!(chunks("a < b"), vec![('(', "a"), ('<', "b")]);
    }

    #[test]
    fn test_split_groups_leave_blank_operands() {
        assert_eq!(
            chunks("2 * (1 + 2)"),
            vec![('(', "2"), ('*', ""), ('(', "1"), ('+', "2"), (')', "")]
        );
    }

    #[test]
    fn test_prefix_detection() {
        let operations = split_operations("!a = -b").unwrap();
        let prefixes: Vec<bool> = operations.iter().map(|op| op.prefix).collect();
        assert_eq!(prefixes, vec![false, true, false, true]);

        let operations = split_operations("(a) ! b").unwrap();
        assert!(operations.iter().all(|op| !op.prefix));

        // `- 2` with a gap is not a prefix
        let operations = split_operations("- 2").unwrap();
        assert!(!operations[1].prefix);

        let operations = split_operations("1 - -2").unwrap();
        assert_eq!(operations.len(), 3);
        assert!(!operations[1].prefix);
        assert!(operations[2].prefix);
    }

    #[test]
    fn test_split_rejects_separators_outside_literals() {
        assert!(split_operations("a: b").is_err());
        assert!(split_operations("a, b").is_err());
        assert!(split_operations("[1, 2").is_err());
    }
}

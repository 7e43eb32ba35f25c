//! Grammar for the reformulator expression language
//!
//! The evaluator resolves expressions straight from their text, so this
//! crate does not build an AST. It provides the scanners the evaluator
//! drives (operation splitting, operand classification, structure and
//! element literal splitting) plus a validator for tooling.

pub mod element;
pub mod error;
pub mod lexer;
pub mod operand;
pub mod operation;
pub mod operator;
mod stream;
pub mod structure;
pub mod validate;

#[cfg(test)]
mod tests_grammar;

pub use element::{parse_element, ElementLiteral};
#[cfg(feature = "pretty-errors")]
pub use error::format_errors;
pub use error::{ParseError, ParseErrors, ParseResult};
pub use lexer::{lex, LexError, SpannedToken, Token, TokenSpan};
pub use operand::{classify_operand, Operand};
pub use operation::{split_operations, Operation};
pub use operator::Operator;
pub use stream::is_identifier;
pub use structure::{is_key, split_entries, Entry};
pub use validate::validate_expression;

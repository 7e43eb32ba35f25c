use reformulator_parser::ParseError;
use thiserror::Error;

pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Why an expression collapsed to `Value::Empty`. Never surfaced to the
/// page; only logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unrecognised operand `{0}`")]
    InvalidOperand(String),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Invalid template JSON: {0}")]
    InvalidTemplate(#[source] serde_json::Error),

    #[error("Invalid data JSON: {0}")]
    InvalidData(#[source] serde_json::Error),
}

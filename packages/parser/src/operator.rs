use crate::lexer::Token;
use std::fmt;

/// Binary operators of the expression language plus the two grouping
/// boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `(`
    Open,
    /// `)`
    Close,
    /// `|` fallback
    Or,
    /// `&` guard
    And,
    /// `=`
    Equal,
    /// `!`
    NotEqual,
    /// `<` proper subset / less than
    Subset,
    /// `>` proper superset / greater than
    Superset,
    /// `#` decimal rounding
    Round,
    Add,
    Subtract,
    Divide,
    Multiply,
    Modulo,
    Power,
    /// `.` member access
    Member,
    /// `?` existence test
    Exists,
}

impl Operator {
    pub fn from_token(token: &Token<'_>) -> Option<Self> {
        Some(match token {
            Token::LParen => Operator::Open,
            Token::RParen => Operator::Close,
            Token::Pipe => Operator::Or,
            Token::Amp => Operator::And,
            Token::Eq => Operator::Equal,
            Token::Bang => Operator::NotEqual,
            Token::Lt => Operator::Subset,
            Token::Gt => Operator::Superset,
            Token::Hash => Operator::Round,
            Token::Plus => Operator::Add,
            Token::Minus => Operator::Subtract,
            Token::Slash => Operator::Divide,
            Token::Star => Operator::Multiply,
            Token::Percent => Operator::Modulo,
            Token::Caret => Operator::Power,
            Token::Dot => Operator::Member,
            Token::Question => Operator::Exists,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Open => '(',
            Operator::Close => ')',
            Operator::Or => '|',
            Operator::And => '&',
            Operator::Equal => '=',
            Operator::NotEqual => '!',
            Operator::Subset => '<',
            Operator::Superset => '>',
            Operator::Round => '#',
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Divide => '/',
            Operator::Multiply => '*',
            Operator::Modulo => '%',
            Operator::Power => '^',
            Operator::Member => '.',
            Operator::Exists => '?',
        }
    }

    /// Binding strength; operators fold while the pending one binds at
    /// least as tightly as the incoming one
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Open | Operator::Close => 0,
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Equal | Operator::NotEqual | Operator::Subset | Operator::Superset => 3,
            Operator::Round => 4,
            Operator::Add | Operator::Subtract => 5,
            Operator::Divide | Operator::Multiply | Operator::Modulo => 6,
            Operator::Power => 7,
            Operator::Member => 8,
            Operator::Exists => 9,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

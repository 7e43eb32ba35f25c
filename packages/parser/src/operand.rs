use crate::lexer::Token;
use crate::stream::TokenStream;

/// Grammar category of a single operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<'src> {
    /// Nothing between two operators
    Blank,
    Number(f64),
    /// Quoted string with its own quote character unescaped
    Text(String),
    Boolean(bool),
    /// Interior of a `{...}` literal
    Object(&'src str),
    /// Interior of a `[...]` literal
    Array(&'src str),
    /// A whole `<tag ...>` literal
    Element(&'src str),
    Variable(&'src str),
    /// `@`
    SelfRef,
    /// Text that matches no operand grammar
    Invalid,
}

/// Classify operand text, tested in order: blank, number, quoted string,
/// boolean, object/array literal, element literal, variable or `@`
pub fn classify_operand(text: &str) -> Operand<'_> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Operand::Blank;
    }

    let stream = TokenStream::new(trimmed);
    if stream.is_empty() {
        return Operand::Invalid;
    }
    let last = stream.len() - 1;

    if last == 1 && stream.token(0) == Some(Token::Minus) {
        if let Some(Token::Number(number)) = stream.token(1) {
            if stream.lexeme(0).span.end == stream.lexeme(1).span.start {
                return number
                    .parse::<f64>()
                    .map(|number| Operand::Number(-number))
                    .unwrap_or(Operand::Invalid);
            }
        }
    }

    if last == 0 {
        if let Some(token) = stream.token(0) {
            match token {
                Token::Number(number) => {
                    return number
                        .parse::<f64>()
                        .map(Operand::Number)
                        .unwrap_or(Operand::Invalid)
                }
                Token::DoubleQuoted(raw) => return Operand::Text(unquote(raw, '"')),
                Token::SingleQuoted(raw) => return Operand::Text(unquote(raw, '\'')),
                Token::Ident("true") => return Operand::Boolean(true),
                Token::Ident("false") => return Operand::Boolean(false),
                Token::Ident(name) => return Operand::Variable(name),
                Token::SelfRef => return Operand::SelfRef,
                _ => {}
            }
        }
    }

    match stream.token(0) {
        Some(Token::LBrace) | Some(Token::LBracket) if stream.closing(0).ok() == Some(last) => {
            let interior = &trimmed[stream.lexeme(0).span.end..stream.lexeme(last).span.start];
            if stream.token(0) == Some(Token::LBrace) {
                Operand::Object(interior)
            } else {
                Operand::Array(interior)
            }
        }
        Some(Token::Lt) if stream.element_end(0) == Some(last) => Operand::Element(trimmed),
        _ => Operand::Invalid,
    }
}

/// Strip the quotes and unescape the quote character itself; other
/// backslashes are kept verbatim
fn unquote(raw: &str, quote: char) -> String {
    let inner = &raw[1..raw.len() - 1];
    let escaped = format!("\\{}", quote);
    inner.replace(&escaped, &quote.to_string())
}

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenSpan};
use crate::stream::{is_identifier, TokenStream};

/// One `key: expression` or positional entry of a structure literal
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'src> {
    pub key: Option<&'src str>,
    pub expression: &'src str,
    pub span: TokenSpan,
}

/// Split the interior of `{...}`, `[...]` or an element literal on its
/// top-level commas. Blank entries are skipped; an invalid key or a
/// second `:` in one entry fails the whole structure.
pub fn split_entries(interior: &str) -> ParseResult<Vec<Entry<'_>>> {
    let stream = TokenStream::new(interior);
    let mut entries = Vec::new();
    let mut start = 0;
    let mut colon: Option<TokenSpan> = None;
    let mut index = 0;

    while index < stream.len() {
        let lexeme = stream.lexeme(index);
        match lexeme.token {
            Some(Token::LBracket | Token::LBrace | Token::LParen) => {
                index = stream.closing(index)?;
            }
            Some(Token::Lt) => {
                if let Some(end) = stream.element_end(index) {
                    index = end;
                }
            }
            Some(Token::Colon) => {
                if colon.is_some() {
                    return Err(ParseError::invalid_syntax(
                        lexeme.span,
                        "an entry can only have one key",
                    ));
                }
                colon = Some(lexeme.span);
            }
            Some(Token::Comma) => {
                if let Some(entry) = make_entry(interior, start, lexeme.span.start, colon.take())? {
                    entries.push(entry);
                }
                start = lexeme.span.end;
            }
            _ => {}
        }
        index += 1;
    }

    if let Some(entry) = make_entry(interior, start, interior.len(), colon)? {
        entries.push(entry);
    }

    Ok(entries)
}

fn make_entry(
    interior: &str,
    start: usize,
    end: usize,
    colon: Option<TokenSpan>,
) -> ParseResult<Option<Entry<'_>>> {
    let span = TokenSpan::new(start, end);

    let Some(colon) = colon else {
        let expression = interior[start..end].trim();
        if expression.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Entry {
            key: None,
            expression,
            span,
        }));
    };

    let key = interior[start..colon.start].trim();
    if !is_key(key) {
        let key_span = TokenSpan::new(start, colon.start);
        return Err(ParseError::invalid_syntax(
            key_span,
            format!("invalid key `{}`", key),
        ));
    }

    Ok(Some(Entry {
        key: Some(key),
        expression: interior[colon.end..end].trim(),
        span,
    }))
}

/// Identifiers joined by `-`, e.g. `data-key`
pub fn is_key(key: &str) -> bool {
    !key.is_empty() && key.split('-').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(interior: &str) -> Vec<(Option<&str>, &str)> {
        split_entries(interior)
            .unwrap()
            .into_iter()
            .map(|entry| (entry.key, entry.expression))
            .collect()
    }

    #[test]
    fn test_split_keyed_and_positional() {
        assert_eq!(
            pairs(r#" "a", b & "b", a: "a", data-key: 1 + 2 "#),
            vec![
                (None, r#""a""#),
                (None, r#"b & "b""#),
                (Some("a"), r#""a""#),
                (Some("data-key"), "1 + 2"),
            ]
        );
    }

    #[test]
    fn test_split_respects_nesting_and_quotes() {
        assert_eq!(
            pairs(r#"a: [1, 2], b: {c: 3}, "x, y", <p [] 'q', r>"#),
            vec![
                (Some("a"), "[1, 2]"),
                (Some("b"), "{c: 3}"),
                (None, r#""x, y""#),
                (None, "<p [] 'q', r>"),
            ]
        );
    }

    #[test]
    fn test_split_skips_blank_entries() {
        assert_eq!(pairs("1, , 2,"), vec![(None, "1"), (None, "2")]);
        assert!(pairs("").is_empty());
    }

    #[test]
    fn test_split_rejects_bad_keys() {
        assert!(split_entries("1a: 2").is_err());
        assert!(split_entries("a: 1 : 2").is_err());
        assert!(split_entries("a-: 2").is_err());
    }
}

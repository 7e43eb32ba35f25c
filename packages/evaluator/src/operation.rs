//! Operator semantics
//!
//! Category-level operators (`| & = ! < > ?` and the group boundaries)
//! only look at emptiness, truthiness or structure. The remaining
//! operators dispatch on the concrete pair of operand types; a pair with
//! no entry resolves to `Value::Empty`.

use crate::compare::{deep_equal, is_proper_superset};
use crate::merge::merge;
use crate::value::{format_number, Value, ValueCategory};
use regex::Regex;
use reformulator_parser::Operator;
use std::cmp::Ordering;
use tracing::trace;

/// Apply `operator` to two resolved operands
pub fn resolve_operation(left: &Value, operator: Operator, right: &Value) -> Value {
    let result = match operator {
        Operator::Open => Some(if left.is_empty() {
            right.clone()
        } else {
            Value::Empty
        }),
        Operator::Close => Some(if right.is_empty() {
            left.clone()
        } else {
            Value::Empty
        }),
        Operator::Or => Some(if left.is_truthy() {
            left.clone()
        } else {
            right.clone()
        }),
        Operator::And => Some(if left.is_truthy() {
            right.clone()
        } else {
            Value::Empty
        }),
        Operator::Equal => Some(keep_left_if(left, deep_equal(left, right, false))),
        Operator::NotEqual => Some(keep_left_if(
            left,
            !left.is_empty() && !deep_equal(left, right, false),
        )),
        Operator::Subset => order(left, right, Ordering::Less),
        Operator::Superset => order(left, right, Ordering::Greater),
        Operator::Round => round(left, right),
        Operator::Add => add(left, right),
        Operator::Subtract => subtract(left, right),
        Operator::Divide => divide(left, right),
        Operator::Multiply => multiply(left, right),
        Operator::Modulo => arithmetic(left, right, |a, b| a % b),
        Operator::Power => arithmetic(left, right, f64::powf),
        Operator::Member => member(left, right),
        Operator::Exists => Some(exists(right)),
    };

    match result {
        Some(Value::Number(number)) => Value::number(number),
        Some(value) => value,
        None => {
            trace!(
                operator = %operator,
                left = ?left.kind(),
                right = ?right.kind(),
                "no operator entry for operand types"
            );
            Value::Empty
        }
    }
}

/// Unary `!`: whether the operand is strictly empty
pub fn negate(operand: &Value) -> Value {
    Value::Boolean(operand.is_strictly_empty())
}

/// `?`: whether the operand holds anything
pub fn exists(operand: &Value) -> Value {
    Value::Boolean(!operand.is_strictly_empty())
}

fn keep_left_if(left: &Value, condition: bool) -> Value {
    if condition {
        left.clone()
    } else {
        Value::Empty
    }
}

fn order(left: &Value, right: &Value, wanted: Ordering) -> Option<Value> {
    let holds = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b) == Some(wanted),
        (Value::String(a), Value::String(b)) => a.cmp(b) == wanted,
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b) == wanted,
        _ if left.category() == ValueCategory::Structure
            && right.category() == ValueCategory::Structure =>
        {
            match wanted {
                Ordering::Less => is_proper_superset(right, left),
                Ordering::Greater => is_proper_superset(left, right),
                Ordering::Equal => false,
            }
        }
        _ => return None,
    };
    Some(keep_left_if(left, holds))
}

fn round(left: &Value, right: &Value) -> Option<Value> {
    let (Value::Number(number), Value::Number(places)) = (left, right) else {
        return None;
    };
    if places.fract() != 0.0 || !(0.0..=100.0).contains(places) {
        return Some(Value::Empty);
    }

    if !number.is_finite() {
        return Some(Value::String(format_number(*number)));
    }

    let places = *places as usize;
    let biased = number - 1.0 / (2.0 * 10f64.powi(places as i32));
    let mut formatted = format!("{:.*}", places, biased);
    if formatted.starts_with('-') && formatted.chars().all(|c| matches!(c, '-' | '0' | '.')) {
        formatted.remove(0);
    }
    Some(Value::String(formatted))
}

fn add(left: &Value, right: &Value) -> Option<Value> {
    Some(match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::number(a + b),
        (Value::String(a), b) if b.is_literal() => {
            Value::String(format!("{}{}", a, b.literal_text().unwrap_or_default()))
        }
        (a, Value::String(b)) if a.is_literal() => {
            Value::String(format!("{}{}", a.literal_text().unwrap_or_default(), b))
        }
        (Value::Array(a), Value::Array(b)) => {
            Value::Array(a.iter().chain(b.iter()).cloned().collect())
        }
        (Value::Array(items), item) if !item.is_empty() => {
            let mut items = items.clone();
            items.push(item.clone());
            Value::Array(items)
        }
        (item, Value::Array(items)) if !item.is_empty() => {
            let mut prepended = Vec::with_capacity(items.len() + 1);
            prepended.push(item.clone());
            prepended.extend(items.iter().cloned());
            Value::Array(prepended)
        }
        (Value::Object(_), Value::Object(_)) => merge(left, right),
        _ => return None,
    })
}

fn subtract(left: &Value, right: &Value) -> Option<Value> {
    Some(match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::number(a - b),
        (Value::String(text), Value::String(pattern)) => match Regex::new(pattern) {
            Ok(regex) => Value::String(regex.replace(text, "").into_owned()),
            Err(_) => Value::Empty,
        },
        (Value::Number(count), Value::Array(items)) => {
            Value::Array(items[skip_front(items.len(), *count)..].to_vec())
        }
        (Value::Number(count), Value::String(text)) => {
            let chars: Vec<char> = text.chars().collect();
            Value::String(chars[skip_front(chars.len(), *count)..].iter().collect())
        }
        (Value::Array(items), Value::Number(count)) => {
            Value::Array(items[..keep_front(items.len(), *count)].to_vec())
        }
        (Value::String(text), Value::Number(count)) => {
            let chars: Vec<char> = text.chars().collect();
            Value::String(chars[..keep_front(chars.len(), *count)].iter().collect())
        }
        (Value::Object(map), Value::String(key)) => {
            let mut map = map.clone();
            map.remove(key);
            Value::Object(map)
        }
        _ => return None,
    })
}

/// Start index after dropping `count` items from the front; a negative
/// count keeps that many items from the back
fn skip_front(length: usize, count: f64) -> usize {
    let count = count.trunc();
    let start = if count < 0.0 {
        length as f64 + count
    } else {
        count
    };
    start.clamp(0.0, length as f64) as usize
}

/// End index after dropping `count` items from the back
fn keep_front(length: usize, count: f64) -> usize {
    (length as f64 - count.trunc()).clamp(0.0, length as f64) as usize
}

fn divide(left: &Value, right: &Value) -> Option<Value> {
    Some(match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::number(a / b),
        (Value::String(text), Value::String(pattern)) => split(text, pattern),
        (Value::String(text), Value::Number(number)) => {
            split(text, &regex::escape(&format_number(*number)))
        }
        _ => return None,
    })
}

fn split(text: &str, pattern: &str) -> Value {
    if pattern.is_empty() {
        return Value::Array(text.chars().map(|c| Value::String(c.to_string())).collect());
    }
    match Regex::new(pattern) {
        Ok(regex) => Value::Array(
            regex
                .split(text)
                .map(|part| Value::String(part.to_string()))
                .collect(),
        ),
        Err(_) => Value::Empty,
    }
}

/// Longest string `*` will build, in bytes
pub const MAX_REPEAT_LENGTH: usize = 1 << 24;

fn multiply(left: &Value, right: &Value) -> Option<Value> {
    Some(match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::number(a * b),
        (Value::Array(items), Value::String(separator))
        | (Value::String(separator), Value::Array(items)) => Value::String(
            items
                .iter()
                .map(Value::join_text)
                .collect::<Vec<_>>()
                .join(separator),
        ),
        (Value::String(text), Value::Number(count))
        | (Value::Number(count), Value::String(text)) => {
            if !count.is_finite() {
                return Some(Value::Empty);
            }
            let times = if *count > 0.0 { count.ceil() as usize } else { 0 };
            match text.len().checked_mul(times) {
                Some(length) if length <= MAX_REPEAT_LENGTH => Value::String(text.repeat(times)),
                _ => Value::Empty,
            }
        }
        _ => return None,
    })
}

fn arithmetic(left: &Value, right: &Value, apply: impl Fn(f64, f64) -> f64) -> Option<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Some(Value::number(apply(*a, *b))),
        _ => None,
    }
}

fn member(left: &Value, right: &Value) -> Option<Value> {
    Some(match (left, right) {
        (Value::Object(map), Value::String(key)) => map.get(key).cloned().unwrap_or_default(),
        (Value::Object(map), Value::Number(key)) => {
            map.get(&format_number(*key)).cloned().unwrap_or_default()
        }
        (Value::Array(items), key) => match position(key) {
            Position::Length => Value::number(items.len() as f64),
            Position::Index(index) => items.get(index).cloned().unwrap_or_default(),
            Position::None => Value::Empty,
        },
        (Value::String(text), key) => {
            let length = text.chars().count();
            match position(key) {
                Position::Length => Value::number(length as f64),
                Position::Index(index) => text
                    .chars()
                    .nth(index)
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or_default(),
                Position::None => Value::Empty,
            }
        }
        _ => return None,
    })
}

enum Position {
    Length,
    Index(usize),
    None,
}

fn position(key: &Value) -> Position {
    match key {
        Value::String(name) if name == "length" => Position::Length,
        Value::String(name) => name
            .parse::<usize>()
            .map(Position::Index)
            .unwrap_or(Position::None),
        Value::Number(index) if *index >= 0.0 && index.fract() == 0.0 => {
            Position::Index(*index as usize)
        }
        _ => Position::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::resolve_expression;
    use crate::scope::ScopeChain;
    use serde_json::json;

    fn op(left: serde_json::Value, operator: char, right: serde_json::Value) -> Value {
        let source = operator.to_string();
        let token = reformulator_parser::lex(&source)
            .next()
            .and_then(|r| r.ok())
            .map(|t| t.token)
            .unwrap();
        let operator = Operator::from_token(&token).unwrap();
        resolve_operation(&Value::from(left), operator, &Value::from(right))
    }

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_fallback_and_guard() {
        assert_eq!(op(json!(null), '|', json!("b")), v(json!("b")));
        assert_eq!(op(json!(false), '|', json!("b")), v(json!("b")));
        assert_eq!(op(json!("a"), '|', json!("b")), v(json!("a")));
        assert_eq!(op(json!("a"), '&', json!("b")), v(json!("b")));
        assert_eq!(op(json!(false), '&', json!("value")), Value::Empty);
    }

    #[test]
    fn test_equality_returns_left() {
        assert_eq!(op(json!({"a": 1}), '=', json!({"a": 1})), v(json!({"a": 1})));
        assert_eq!(op(json!(2), '=', json!("2")), Value::Empty);
        assert_eq!(op(json!(1), '!', json!(2)), v(json!(1)));
        assert_eq!(op(json!(1), '!', json!(1)), Value::Empty);
        assert_eq!(op(json!(null), '!', json!(2)), Value::Empty);
    }

    #[test]
    fn test_proper_containment() {
        let parent = json!({"parent": {"child": 2}});
        assert_eq!(op(parent.clone(), '<', parent.clone()), Value::Empty);
        assert_eq!(op(parent.clone(), '>', parent.clone()), Value::Empty);
        assert_eq!(
            op(json!({"a": 1, "b": 2}), '>', json!({"a": 1})),
            v(json!({"a": 1, "b": 2}))
        );
        assert_eq!(op(json!([1]), '<', json!([1, 2])), v(json!([1])));
        assert_eq!(op(json!(1), '<', json!(2)), v(json!(1)));
        assert_eq!(op(json!(2), '<', json!(1)), Value::Empty);
    }

    #[test]
    fn test_rounding_truncates() {
        assert_eq!(op(json!(1.666), '#', json!(0)), v(json!("1")));
        assert_eq!(op(json!(1.666), '#', json!(2)), v(json!("1.66")));
        assert_eq!(op(json!(2.25), '#', json!(1)), v(json!("2.2")));
        assert_eq!(op(json!(1.5), '#', json!(-1)), Value::Empty);
        assert_eq!(op(json!("1"), '#', json!(1)), Value::Empty);
        assert_eq!(
            resolve_expression("(1 / 0) # 2", ScopeChain::new()),
            v(json!("Infinity"))
        );
        assert_eq!(
            resolve_operation(
                &Value::Number(f64::NEG_INFINITY),
                Operator::Round,
                &Value::Number(0.0)
            ),
            v(json!("-Infinity"))
        );
    }

    #[test]
    fn test_repeat_is_bounded() {
        assert_eq!(op(json!("ab"), '*', json!(2.5)), v(json!("ababab")));
        assert_eq!(op(json!(0), '*', json!("ab")), v(json!("")));
        assert_eq!(
            resolve_expression("'ab' * (1 / 0)", ScopeChain::new()),
            Value::Empty
        );
        assert_eq!(op(json!("a"), '*', json!(1e13)), Value::Empty);
        assert_eq!(op(json!("ab"), '*', json!(1e300)), Value::Empty);
    }

    #[test]
    fn test_addition_family() {
        assert_eq!(op(json!(1), '+', json!(2)), v(json!(3)));
        assert_eq!(op(json!("a"), '+', json!(2)), v(json!("a2")));
        assert_eq!(op(json!(2), '+', json!("a")), v(json!("2a")));
        assert_eq!(op(json!([1]), '+', json!([2])), v(json!([1, 2])));
        assert_eq!(op(json!([1]), '+', json!(2)), v(json!([1, 2])));
        assert_eq!(op(json!(0), '+', json!([1])), v(json!([0, 1])));
        assert_eq!(
            op(json!({"a": 1}), '+', json!({"b": 2})),
            v(json!({"a": 1, "b": 2}))
        );
        assert_eq!(op(json!(true), '+', json!(1)), Value::Empty);
    }

    #[test]
    fn test_subtraction_family() {
        assert_eq!(op(json!("asdf"), '-', json!("df")), v(json!("as")));
        assert_eq!(op(json!("asdf"), '-', json!("^a.d")), v(json!("f")));
        assert_eq!(op(json!("asdf"), '-', json!("x")), v(json!("asdf")));
        assert_eq!(op(json!(2), '-', json!([2, 3, 4, 5])), v(json!([4, 5])));
        assert_eq!(op(json!([2, 3, 4, 5]), '-', json!(2)), v(json!([2, 3])));
        assert_eq!(op(json!([1, 2, 3, 4, 5, 6]), '-', json!(2)), v(json!([1, 2, 3, 4])));
        assert_eq!(op(json!(2), '-', json!("asdf")), v(json!("df")));
        assert_eq!(op(json!("asdf"), '-', json!(2)), v(json!("as")));
        assert_eq!(op(json!({"a": 1, "b": 2}), '-', json!("a")), v(json!({"b": 2})));
        assert_eq!(op(json!("a"), '-', json!("(")), Value::Empty);
    }

    #[test]
    fn test_division_family() {
        assert_eq!(op(json!(6), '/', json!(4)), v(json!(1.5)));
        assert_eq!(op(json!(0), '/', json!(0)), Value::Empty);
        assert_eq!(op(json!("a, b,c"), '/', json!(", ?")), v(json!(["a", "b", "c"])));
        assert_eq!(op(json!("a2b"), '/', json!(2)), v(json!(["a", "b"])));
        assert_eq!(op(json!("abc"), '/', json!("")), v(json!(["a", "b", "c"])));
        assert_eq!(op(json!("a"), '/', json!(false)), Value::Empty);
    }

    #[test]
    fn test_multiplication_family() {
        assert_eq!(op(json!(2), '*', json!(3)), v(json!(6)));
        assert_eq!(op(json!(["a", "b"]), '*', json!(", ")), v(json!("a, b")));
        assert_eq!(op(json!("-"), '*', json!([1, 2])), v(json!("1-2")));
        assert_eq!(op(json!("0"), '*', json!(4)), v(json!("0000")));
        assert_eq!(op(json!(2), '*', json!("ab")), v(json!("abab")));
        assert_eq!(op(json!("a"), '*', json!("b")), Value::Empty);
    }

    #[test]
    fn test_modulo_and_power() {
        assert_eq!(op(json!(7), '%', json!(3)), v(json!(1)));
        assert_eq!(op(json!(2), '^', json!(10)), v(json!(1024)));
        assert_eq!(op(json!("2"), '^', json!(2)), Value::Empty);
    }

    #[test]
    fn test_member_access() {
        assert_eq!(op(json!({"a": "b", "b": 2}), '.', json!("b")), v(json!(2)));
        assert_eq!(op(json!({"0": 2}), '.', json!(0)), v(json!(2)));
        assert_eq!(op(json!([4, 5]), '.', json!(1)), v(json!(5)));
        assert_eq!(op(json!([4, 5]), '.', json!("length")), v(json!(2)));
        assert_eq!(op(json!("asdf"), '.', json!(2)), v(json!("d")));
        assert_eq!(op(json!("asdf"), '.', json!("length")), v(json!(4)));
        assert_eq!(op(json!(2), '.', json!("a")), Value::Empty);
    }

    #[test]
    fn test_existence_ignores_left() {
        assert_eq!(op(json!(null), '?', json!("")), v(json!(false)));
        assert_eq!(op(json!(1), '?', json!([1])), v(json!(true)));
        assert_eq!(negate(&v(json!({}))), v(json!(true)));
    }

    #[test]
    fn test_group_boundaries() {
        assert_eq!(op(json!(null), '(', json!(3)), v(json!(3)));
        assert_eq!(op(json!(1), '(', json!(3)), Value::Empty);
        assert_eq!(op(json!(3), ')', json!(null)), v(json!(3)));
        assert_eq!(op(json!(3), ')', json!(1)), Value::Empty);
    }
}

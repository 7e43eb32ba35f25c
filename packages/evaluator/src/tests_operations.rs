/// Operator families exercised through whole expressions
use crate::*;
use serde_json::json;

fn resolve(expression: &str, data: serde_json::Value) -> Value {
    let data = Value::from(data);
    ScopeChain::new().push(&data, |chain| resolve_expression(expression, chain))
}

#[test]
fn test_subtraction_forms() {
    assert_eq!(resolve("2 - [2, 3, 4, 5]", json!(null)), Value::from(json!([4, 5])));
    assert_eq!(resolve("items - 1", json!({"items": [1, 2, 3]})), Value::from(json!([1, 2])));
    assert_eq!(resolve("2 - 'asdf'", json!(null)), Value::from("df"));
    assert_eq!(resolve("'asdf' - '^a.d'", json!(null)), Value::from("f"));
    assert_eq!(
        resolve("user - 'password'", json!({"user": {"name": "a", "password": "b"}})),
        Value::from(json!({"name": "a"}))
    );
}

#[test]
fn test_addition_merges_objects() {
    assert_eq!(
        resolve("a + {b: 3, c: 4}", json!({"a": {"b": 1, "d": {"e": 1}}})),
        Value::from(json!({"b": 3, "c": 4, "d": {"e": 1}}))
    );
    assert_eq!(resolve("a + 1", json!({"a": {"b": 1}})), Value::Empty);
}

#[test]
fn test_split_and_join() {
    assert_eq!(
        resolve("text / ', ?' * '-'", json!({"text": "a, b,c"})),
        Value::from("a-b-c")
    );
    assert_eq!(resolve("'ab' * 2", json!(null)), Value::from("abab"));
}

#[test]
fn test_comparisons_return_the_left_side() {
    let data = json!({"small": {"a": 1}, "large": {"a": 1, "b": 2}});
    assert_eq!(resolve("small < large", data.clone()), Value::from(json!({"a": 1})));
    assert_eq!(resolve("large > small", data.clone()), Value::from(json!({"a": 1, "b": 2})));
    assert_eq!(resolve("small > large", data.clone()), Value::Empty);
    assert_eq!(resolve("small = {a: 1}", data), Value::from(json!({"a": 1})));
    assert_eq!(resolve("3 < 2", json!(null)), Value::Empty);
}

#[test]
fn test_rounding_is_text() {
    assert_eq!(resolve("price # 2", json!({"price": 1.666})), Value::from("1.66"));
    assert_eq!(resolve("price # 0", json!({"price": 1.666})), Value::from("1"));
    assert_eq!(resolve("'1.5' # 0", json!(null)), Value::Empty);
}

#[test]
fn test_comparisons_combine_with_guards() {
    let expression = "count > 1 & 'many' | count = 1 & 'one' | 'none'";
    assert_eq!(resolve(expression, json!({"count": 3})), Value::from("many"));
    assert_eq!(resolve(expression, json!({"count": 1})), Value::from("one"));
    assert_eq!(resolve(expression, json!({"count": 0})), Value::from("none"));
}

#[test]
fn test_modulo_for_alternation() {
    assert_eq!(resolve("@ % 2 = 0 & 'even' | 'odd'", json!(4)), Value::from("even"));
    assert_eq!(resolve("@ % 2 = 0 & 'even' | 'odd'", json!(3)), Value::from("odd"));
}

#[test]
fn test_incompatible_operands_are_empty() {
    assert_eq!(resolve("'a' / false", json!(null)), Value::Empty);
    assert_eq!(resolve("true + 1", json!(null)), Value::Empty);
    assert_eq!(resolve("1 / 0 - 1 / 0", json!(null)), Value::Empty);
}

/// Expression and element literal resolution against real data
use crate::*;
use serde_json::json;

fn resolve(expression: &str, data: serde_json::Value) -> Value {
    let data = Value::from(data);
    ScopeChain::new().push(&data, |chain| resolve_expression(expression, chain))
}

#[test]
fn test_order_of_operations() {
    assert_eq!(resolve("1 + 2 * 3", json!(null)), Value::from(7.0));
    assert_eq!(resolve("1 + -a * 3", json!({"a": 2})), Value::from(-5.0));
    assert_eq!(resolve("2 * -(1 + 2)", json!(null)), Value::from(-6.0));
}

#[test]
fn test_negative_variable() {
    assert_eq!(resolve("-a", json!({"a": 2})), Value::from(-2.0));
}

#[test]
fn test_against_a_negated_value() {
    assert_eq!(resolve("true ! !@", json!(2)), Value::from(true));
}

#[test]
fn test_string_literals_and_concatenation() {
    assert_eq!(resolve("'a' + \"b\" + 1", json!(null)), Value::from("ab1"));
    assert_eq!(resolve("\"asdf\" - \"df\"", json!(null)), Value::from("as"));
}

#[test]
fn test_nested_member_access() {
    let data = json!({"user": {"name": "ann", "tags": ["x", "y"]}, "field": "name"});
    assert_eq!(resolve("user.name", data.clone()), Value::from("ann"));
    assert_eq!(resolve("user.(field)", data.clone()), Value::from("ann"));
    assert_eq!(resolve("user.tags.1", data.clone()), Value::from("y"));
    assert_eq!(resolve("user.tags.length", data.clone()), Value::from(2.0));
    assert_eq!(resolve("user.missing.name", data), Value::Empty);
}

#[test]
fn test_structure_literals() {
    assert_eq!(
        resolve("{name: a, size: 1 + 1}", json!({"a": "x"})),
        Value::from(json!({"name": "x", "size": 2}))
    );
    assert_eq!(resolve("[a, missing, 2]", json!({"a": 1})), Value::from(json!([1, 2])));
    assert_eq!(resolve("{name: missing}", json!({})), Value::Empty);
}

#[test]
fn test_variables_shadow_outer_layers() {
    let outer = Value::from(json!({"a": "outer", "b": "b"}));
    let inner = Value::from(json!({"a": "inner"}));
    let actual = ScopeChain::new().push(&outer, |chain| {
        chain.push(&inner, |chain| resolve_expression("a + b", chain))
    });
    assert_eq!(actual, Value::from("innerb"));
}

#[test]
fn test_element_entries() {
    let actual = resolve("<div [a] @, @ + 1, key: @, flag: true>", json!({"a": "a"}));
    let element = actual.as_element().unwrap();
    assert_eq!(element.tag, "div");
    assert_eq!(
        element.class_names.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["a", "a1"]
    );
    assert_eq!(element.key.as_deref(), Some("a"));
    assert_eq!(element.attributes.get("flag"), Some(&Value::from(true)));
    assert_eq!(element.scope, Value::from("a"));
}

#[test]
fn test_element_drops_empty_classes_and_attributes() {
    let actual = resolve("<img [] \"a\", b & \"b\", a: \"a\", b: b, alt: b>", json!(null));
    assert_eq!(
        render_value(&actual),
        r#"<img class="a" a="a" alt="">"#
    );
}

#[test]
fn test_element_per_scope_item() {
    let actual = resolve("<div [@] @>", json!(["a", "b"]));
    assert_eq!(
        render_value(&actual),
        r#"<div class="a">a</div><div class="b">b</div>"#
    );
}

#[test]
fn test_element_fails_with_its_scope() {
    assert_eq!(resolve("<div [a]>", json!({})), Value::Empty);
    assert_eq!(resolve("<div [] @: @ + 1: 1 + 2>", json!({})), Value::Empty);
}

#[test]
fn test_element_or_fallback() {
    assert_eq!(resolve("<a [url] href: url> | 'none'", json!({})), Value::from("none"));
    assert_eq!(
        render_value(&resolve("<a [url] href: url> | 'none'", json!({"url": "/x"}))),
        r#"<a href="/x">/x</a>"#
    );
}

#[test]
fn test_event_entries_record_variables() {
    let actual = resolve("<button [] onclick: open>", json!(null));
    let element = actual.as_element().unwrap();
    assert_eq!(element.events.get("onclick").map(String::as_str), Some("open"));
    assert!(element.variables.contains("open"));
    assert_eq!(render_value(&actual), "<button></button>");
}

#[test]
fn test_evaluate_reports_errors() {
    assert!(evaluate("a: b", ScopeChain::new()).is_err());
    assert_eq!(evaluate("1 + 2", ScopeChain::new()), Ok(Value::from(3.0)));
}

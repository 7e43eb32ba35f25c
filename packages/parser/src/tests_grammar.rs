//! Cross-module grammar tests: the scanners working together on
//! realistic template expressions

use crate::*;

#[test]
fn test_list_item_template_splits_into_element_and_fallback() {
    let expression = "<a [url & image & @] href: url> | @";
    let operations = split_operations(expression).unwrap();
    assert_eq!(operations.len(), 2);

    let element = match classify_operand(operations[0].operand) {
        Operand::Element(literal) => parse_element(literal).unwrap(),
        other => panic!("expected element, got {:?}", other),
    };
    assert_eq!(element.tag, "a");
    assert_eq!(element.scope, Some("url & image & @"));

    let entries = split_entries(element.entries).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, Some("href"));
    assert_eq!(entries[0].expression, "url");

    assert_eq!(operations[1].operator, Operator::Or);
    assert_eq!(classify_operand(operations[1].operand), Operand::SelfRef);
}

#[test]
fn test_nested_elements_inside_arrays() {
    let operations = split_operations("[<p [a]>, <p [b] 'x', 'y'>]").unwrap();
    assert_eq!(operations.len(), 1);

    let interior = match classify_operand(operations[0].operand) {
        Operand::Array(interior) => interior,
        other => panic!("expected array, got {:?}", other),
    };
    let entries = split_entries(interior).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].expression, "<p [b] 'x', 'y'>");
}

#[test]
fn test_event_entries_are_plain_text() {
    let element = parse_element("<input [] onkeyup: query, value: query>").unwrap();
    let entries = split_entries(element.entries).unwrap();
    let keys: Vec<_> = entries.iter().filter_map(|entry| entry.key).collect();
    assert_eq!(keys, vec!["onkeyup", "value"]);
}

#[test]
fn test_prefix_operators_in_context() {
    let operations = split_operations("2 * -(1 + 2)").unwrap();
    let shape: Vec<_> = operations
        .iter()
        .map(|op| (op.operator.symbol(), op.operand, op.prefix))
        .collect();
    assert_eq!(
        shape,
        vec![
            ('(', "2", false),
            ('*', "", false),
            ('-', "", true),
            ('(', "1", false),
            ('+', "2", false),
            (')', "", false),
        ]
    );
}

#[test]
fn test_validation_reports_through_the_whole_grammar() {
    assert!(validate_expression("<ul [items] x: <li [@] @>>").is_ok());
    assert!(validate_expression("<ul [items] 1a: 2>").is_err());
    assert!(validate_expression("(1 + 2").is_ok());
    assert!(validate_expression("{a: (1}").is_err());
}

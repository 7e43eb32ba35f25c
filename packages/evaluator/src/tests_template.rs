/// Nested templates resolved and rendered to markup
use crate::*;
use serde_json::json;

fn resolve(template: serde_json::Value, data: serde_json::Value) -> Value {
    let template: Template = serde_json::from_value(template).unwrap();
    let data = Value::from(data);
    ScopeChain::new().push(&data, |chain| resolve_template(&template, chain))
}

fn render(template: serde_json::Value, data: serde_json::Value) -> String {
    render_value(&resolve(template, data))
}

#[test]
fn test_empty_scope_still_builds_elements() {
    let actual = resolve(json!(["<div []>"]), json!(null));
    let element = actual.as_element().unwrap();
    assert_eq!(element.tag, "div");
    assert_eq!(element.scope, Value::Empty);
}

#[test]
fn test_each_element_is_scoped_and_wrapped() {
    assert_eq!(
        render(json!(["<p [x] @>", ["@"]]), json!({"x": ["a", "b"]})),
        r#"<p class="a">a</p><p class="b">b</p>"#
    );
}

#[test]
fn test_element_is_skipped_when_its_content_is_empty() {
    assert_eq!(resolve(json!(["<div>", ["a"]]), json!(null)), Value::Empty);
}

#[test]
fn test_element_renders_when_its_template_is_empty() {
    assert_eq!(render(json!(["<div>", []]), json!(null)), "<div></div>");
}

#[test]
fn test_object_template_output() {
    assert_eq!(
        resolve(json!({"total": "a + b", "missing": "c"}), json!({"a": 1, "b": 2})),
        Value::from(json!({"total": 3}))
    );
}

#[test]
fn test_object_selector_scopes_the_next_item() {
    let template = json!([{"label": "'Hello ' + name"}, "<h1 [label]>"]);
    assert_eq!(render(template, json!({"name": "Ann"})), "<h1>Hello Ann</h1>");
}

#[test]
fn test_nested_lists_with_fallbacks() {
    let template = json!([
        "<ul>", [
            "<li [links]>", [
                "<a [url & image & @] href: url> | @", [
                    "<img [image] \"image\", src: image, alt: alt>"
                ],
                "<p [(description | text) & @]>", [
                    "description",
                    "description & text & \" \"",
                    "<a [url & text] href: url>"
                ]
            ]
        ]
    ]);
    let data = json!({
        "links": [
            {
                "url": "/one",
                "text": "click one",
                "image": "/one.jpg",
                "alt": "image one",
                "description": "one one one"
            },
            {
                "url": "/two",
                "image": "/two.jpg",
                "alt": "image two",
                "description": "two two two"
            },
            {
                "image": "/three.jpg",
                "alt": "image three",
                "description": "three three three"
            },
            {
                "image": "/three.jpg",
                "alt": "image three"
            },
            {
                "url": "/two"
            }
        ]
    });

    let actual = resolve(template, data);
    let list = actual.as_element().unwrap();
    assert_eq!(list.tag, "ul");

    let items: Vec<String> = list.rendered_content().iter().map(render_value).collect();
    assert_eq!(
        items,
        vec![
            r#"<li><a href="/one"><img class="image" alt="image one" src="/one.jpg"></a><p>one one one <a href="/one">click one</a></p></li>"#,
            r#"<li><a href="/two"><img class="image" alt="image two" src="/two.jpg"></a><p>two two two</p></li>"#,
            r#"<li><img class="image" alt="image three" src="/three.jpg"><p>three three three</p></li>"#,
            r#"<li><img class="image" alt="image three" src="/three.jpg"></li>"#,
        ]
    );
}

#[test]
fn test_table_from_rows() {
    let template = json!([
        "<table>", [
            "<tr [rows] key: id>", [
                "<td [name]>",
                "<td [score # 1]>"
            ]
        ]
    ]);
    let data = json!({
        "rows": [
            {"id": 1, "name": "a", "score": 1.25},
            {"id": 2, "name": "b", "score": 3.75}
        ]
    });
    assert_eq!(
        render(template, data),
        "<table><tr><td>a</td><td>1.2</td></tr><tr><td>b</td><td>3.7</td></tr></table>"
    );
}

#[test]
fn test_escaping_in_rendered_text() {
    assert_eq!(
        render(json!(["<p>", ["text"]]), json!({"text": "<b>&</b>"})),
        "<p>&lt;b&gt;&amp;&lt;/b&gt;</p>"
    );
}

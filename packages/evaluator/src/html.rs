//! Markup rendering for element structures

use crate::element::ElementStructure;
use crate::value::{format_number, Value};

/// Render a value as markup. Elements render as tags, strings and
/// numbers as escaped text, arrays as their items in order; anything
/// else renders nothing.
pub fn render_value(value: &Value) -> String {
    let mut markup = Markup::default();
    markup.value(value);
    markup.finish()
}

pub fn render_element(element: &ElementStructure) -> String {
    let mut markup = Markup::default();
    markup.element(element);
    markup.finish()
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[derive(Default)]
struct Markup {
    buffer: String,
}

impl Markup {
    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::Element(element) => self.element(element),
            Value::String(text) => self.add(&escape_html(text)),
            Value::Number(number) => self.add(&format_number(*number)),
            Value::Array(items) => {
                for item in items {
                    self.value(item);
                }
            }
            _ => {}
        }
    }

    fn element(&mut self, element: &ElementStructure) {
        self.add("<");
        self.add(&element.tag);

        if !element.class_names.is_empty() {
            let classes: Vec<&str> = element.class_names.iter().map(String::as_str).collect();
            self.add(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
        }

        // Valued attributes first, then boolean flags; both in name order
        let attributes = element.rendered_attributes();
        let mut flags = Vec::new();
        for (name, value) in &attributes {
            match value {
                Value::String(_) | Value::Number(_) => {
                    let text = value.literal_text().unwrap_or_default();
                    self.add(&format!(" {}=\"{}\"", name, escape_html(&text)));
                }
                Value::Boolean(true) => flags.push(name.as_str()),
                _ => {}
            }
        }
        for flag in flags {
            self.add(" ");
            self.add(flag);
        }
        self.add(">");

        if element.is_singleton() {
            return;
        }

        for child in element.rendered_content() {
            self.value(child);
        }
        self.add(&format!("</{}>", element.tag));
    }

    fn finish(self) -> String {
        self.buffer
    }
}

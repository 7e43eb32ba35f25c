//! Element structures
//!
//! An element literal `<tag [scope] entries>` resolves to an
//! [`ElementStructure`]: tag, classes, attributes, event handlers, the
//! scope it was built in and any content appended by a template.

use crate::expression::resolve_expression;
use crate::scope::ScopeChain;
use crate::structure::{is_event_key, resolve_entries, StructureKind};
use crate::value::Value;
use reformulator_parser::{parse_element, ElementLiteral};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Elements that never take children
pub const SINGLETON_TAGS: &[&str] = &[
    "wbr", "track", "source", "param", "meta", "link", "keygen", "input", "img", "hr", "embed",
    "command", "col", "br", "base", "area", "!doctype",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStructure {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub class_names: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
    /// Event name (`onclick`) to the state variable it drives
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, String>,
    /// State variables driven by this element or any descendant
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub variables: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Value::is_empty")]
    pub scope: Value,
    /// Explicit identity among siblings (from the `key` entry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ElementStructure {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class_names: BTreeSet::new(),
            attributes: BTreeMap::new(),
            events: BTreeMap::new(),
            variables: BTreeSet::new(),
            content: None,
            scope: Value::Empty,
            key: None,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_names.insert(class_name.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_event(mut self, event: impl Into<String>, variable: impl Into<String>) -> Self {
        let variable = variable.into();
        self.variables.insert(variable.clone());
        self.events.insert(event.into(), variable);
        self
    }

    pub fn with_scope(mut self, scope: Value) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<Value>) -> Self {
        self.append(content.into());
        self
    }

    pub fn is_singleton(&self) -> bool {
        SINGLETON_TAGS.contains(&self.tag.as_str())
    }

    /// Append resolved content. Arrays are flattened; only elements,
    /// strings and numbers are kept. Appending anything, even nothing,
    /// marks the element as having explicit content.
    pub fn append(&mut self, value: Value) {
        if self.is_singleton() {
            return;
        }
        let content = self.content.get_or_insert_with(Vec::new);
        push_content(content, &mut self.variables, value);
    }

    /// Children as rendered. Without explicit content a textual scope
    /// stands in as the element's text, except for inputs where it
    /// becomes the value attribute.
    pub fn rendered_content(&self) -> &[Value] {
        match &self.content {
            Some(content) => content,
            None if self.has_literal_scope() && self.tag != "input" => {
                std::slice::from_ref(&self.scope)
            }
            None => &[],
        }
    }

    pub fn rendered_attributes(&self) -> BTreeMap<String, Value> {
        let mut attributes = self.attributes.clone();
        if self.tag == "input" && self.content.is_none() && self.has_literal_scope() {
            attributes
                .entry("value".to_string())
                .or_insert_with(|| self.scope.clone());
        }
        attributes
    }

    fn has_literal_scope(&self) -> bool {
        matches!(self.scope, Value::String(_) | Value::Number(_))
    }

    fn add_class_names(&mut self, value: &Value) {
        match value {
            Value::String(text) => {
                self.class_names
                    .extend(text.split_whitespace().map(str::to_string));
            }
            Value::Number(_) | Value::Boolean(_) => {
                self.class_names.extend(value.literal_text());
            }
            Value::Array(items) => {
                for item in items {
                    self.add_class_names(item);
                }
            }
            _ => {}
        }
    }

    fn apply_default_attributes(&mut self) {
        let default = match self.tag.as_str() {
            "img" => ("alt", ""),
            "a" => ("href", "javascript:void(0);"),
            _ => return,
        };
        self.attributes
            .entry(default.0.to_string())
            .or_insert_with(|| Value::string(default.1));
    }
}

fn push_content(content: &mut Vec<Value>, variables: &mut BTreeSet<String>, value: Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_content(content, variables, item);
            }
        }
        Value::Element(child) => {
            variables.extend(child.variables.iter().cloned());
            content.push(Value::Element(child));
        }
        Value::String(_) | Value::Number(_) => content.push(value),
        _ => {}
    }
}

/// Resolve an element literal. A bracketed scope that resolves to an
/// array builds one element per item; a scope that fails fails the
/// element.
pub fn resolve_element(literal: &str, chain: ScopeChain<'_>) -> Value {
    let parsed = match parse_element(literal) {
        Ok(parsed) => parsed,
        Err(error) => {
            debug!(%error, literal, "invalid element literal");
            return Value::Empty;
        }
    };

    let Some(scope_expression) = parsed.scope else {
        return ElementStructure::new(parsed.tag).into();
    };

    let scope = if scope_expression.trim().is_empty() {
        chain.scope().clone()
    } else {
        let scope = resolve_expression(scope_expression, chain);
        if scope.is_empty() {
            return Value::Empty;
        }
        scope
    };

    match scope {
        Value::Array(items) => {
            let elements: Vec<Value> = items
                .iter()
                .map(|item| build_element(&parsed, item, chain))
                .filter(|element| !element.is_empty())
                .collect();
            if elements.is_empty() {
                Value::Empty
            } else {
                Value::Array(elements)
            }
        }
        scope => build_element(&parsed, &scope, chain),
    }
}

fn build_element(literal: &ElementLiteral<'_>, scope: &Value, chain: ScopeChain<'_>) -> Value {
    let entries = chain.push(scope, |inner| {
        resolve_entries(literal.entries, StructureKind::Attributes, inner)
    });
    let Some(entries) = entries else {
        return Value::Empty;
    };

    let mut element = ElementStructure::new(literal.tag).with_scope(scope.clone());
    for value in &entries.positional {
        element.add_class_names(value);
    }
    for (name, value) in entries.keyed {
        match name.as_str() {
            "key" => element.key = value.literal_text(),
            "class" => element.add_class_names(&value),
            _ if is_event_key(&name) => {
                if let Value::String(variable) = value {
                    element = element.with_event(name, variable);
                }
            }
            _ => {
                element.attributes.insert(name, value);
            }
        }
    }
    element.apply_default_attributes();

    element.into()
}

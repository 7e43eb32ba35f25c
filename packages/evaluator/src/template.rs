//! Template resolution
//!
//! A template is an expression string, an object of templates or a
//! sequence. Sequences are read in groups: a group is a run of items of
//! strictly increasing stage (object selector, expression selector,
//! sub-template). Each group starts from the sequence's scope, narrows
//! it through its selectors (fanning out over arrays) and hands the
//! selected scopes to the sub-template, whose results become element
//! children or replace the selection.

use crate::error::{TemplateError, TemplateResult};
use crate::expression::resolve_expression;
use crate::merge::merge;
use crate::scope::ScopeChain;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{instrument, trace};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
    Expression(String),
    Sequence(Vec<Template>),
    Object(BTreeMap<String, Template>),
}

impl Template {
    pub fn from_json(json: &str) -> TemplateResult<Self> {
        serde_json::from_str(json).map_err(TemplateError::InvalidTemplate)
    }

    pub fn to_json(&self) -> TemplateResult<String> {
        serde_json::to_string(self).map_err(TemplateError::InvalidTemplate)
    }

    /// Position of an item within a sequence group
    pub fn stage(&self) -> u8 {
        match self {
            Template::Object(_) => 0,
            Template::Expression(_) => 1,
            Template::Sequence(_) => 2,
        }
    }

    /// Every expression string in the template, depth first
    pub fn expressions(&self) -> Vec<&str> {
        let mut expressions = Vec::new();
        self.collect_expressions(&mut expressions);
        expressions
    }

    fn collect_expressions<'t>(&'t self, expressions: &mut Vec<&'t str>) {
        match self {
            Template::Expression(expression) => expressions.push(expression),
            Template::Sequence(items) => {
                for item in items {
                    item.collect_expressions(expressions);
                }
            }
            Template::Object(entries) => {
                for template in entries.values() {
                    template.collect_expressions(expressions);
                }
            }
        }
    }
}

impl From<&str> for Template {
    fn from(expression: &str) -> Self {
        Template::Expression(expression.to_string())
    }
}

/// Resolve a template against a scope chain. An array scope resolves the
/// template once per item.
#[instrument(level = "trace", skip_all, fields(stage = template.stage()))]
pub fn resolve_template(template: &Template, chain: ScopeChain<'_>) -> Value {
    let Value::Array(items) = chain.scope() else {
        return resolve_single(template, chain);
    };

    trace!(items = items.len(), "resolving template per scope item");
    let mut results = Vec::new();
    for item in items {
        match chain.replace(item, |inner| resolve_single(template, inner)) {
            Value::Empty => {}
            Value::Array(values) if matches!(template, Template::Sequence(_)) => {
                results.extend(values)
            }
            result => results.push(result),
        }
    }

    if results.is_empty() {
        Value::Empty
    } else {
        Value::Array(results)
    }
}

fn resolve_single(template: &Template, chain: ScopeChain<'_>) -> Value {
    match template {
        Template::Expression(expression) => resolve_expression(expression, chain),
        Template::Object(entries) => resolve_object(entries, chain),
        Template::Sequence(items) => resolve_sequence(items, chain),
    }
}

/// Every key resolves against the same chain; empty results are left
/// out and an object with nothing left is empty
fn resolve_object(entries: &BTreeMap<String, Template>, chain: ScopeChain<'_>) -> Value {
    let resolved: BTreeMap<String, Value> = entries
        .iter()
        .filter_map(|(key, template)| {
            let value = resolve_template(template, chain);
            (!value.is_empty()).then(|| (key.clone(), value))
        })
        .collect();

    if resolved.is_empty() {
        Value::Empty
    } else {
        Value::Object(resolved)
    }
}

fn resolve_sequence(items: &[Template], chain: ScopeChain<'_>) -> Value {
    let mut local = chain.scope().clone();
    let mut output = Vec::new();

    for group in stage_groups(items) {
        let containers = chain.replace(&local, |inner| resolve_group(group, inner));

        // A group ending in an object template binds names for the
        // groups after it instead of producing output
        if matches!(group.last(), Some(Template::Object(_))) {
            for container in &containers {
                if let Value::Object(_) = container {
                    local = merge(&local, container);
                }
            }
            continue;
        }

        trace!(containers = containers.len(), "emitting sequence group");
        for container in containers {
            match container {
                Value::Empty => {}
                Value::Array(values) => output.extend(values),
                value => output.push(value),
            }
        }
    }

    match output.len() {
        0 => Value::Empty,
        1 => output.pop().unwrap_or_default(),
        _ => Value::Array(output),
    }
}

/// Split a sequence into maximal runs of strictly increasing stage
fn stage_groups(items: &[Template]) -> Vec<&[Template]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for index in 1..items.len() {
        if items[index].stage() <= items[index - 1].stage() {
            groups.push(&items[start..index]);
            start = index;
        }
    }
    if start < items.len() {
        groups.push(&items[start..]);
    }
    groups
}

fn resolve_group(group: &[Template], chain: ScopeChain<'_>) -> Vec<Value> {
    let mut containers = vec![chain.scope().clone()];

    for item in group {
        let mut next = Vec::with_capacity(containers.len());
        for container in containers {
            let scope = scope_of(&container);
            match item {
                Template::Sequence(sub) => {
                    let content = chain.push(&scope, |inner| resolve_sequence(sub, inner));
                    if content.is_empty() && !sub.is_empty() {
                        continue;
                    }
                    match container {
                        Value::Element(mut element) => {
                            element.append(content);
                            next.push(Value::Element(element));
                        }
                        _ if content.is_empty() => {}
                        _ => next.push(content),
                    }
                }
                Template::Object(entries) => {
                    let selected = chain.push(&scope, |inner| resolve_object(entries, inner));
                    select(selected, &mut next);
                }
                Template::Expression(expression) => {
                    let selected =
                        chain.push(&scope, |inner| resolve_expression(expression, inner));
                    select(selected, &mut next);
                }
            }
        }
        containers = next;
    }

    containers
}

/// Scope a container passes on: an element's own scope, nothing for a
/// bare `true`, otherwise the container itself
fn scope_of(container: &Value) -> Value {
    match container {
        Value::Element(element) => element.scope.clone(),
        Value::Boolean(true) => Value::Empty,
        other => other.clone(),
    }
}

fn select(selected: Value, containers: &mut Vec<Value>) {
    match selected {
        Value::Empty | Value::Boolean(false) => {}
        Value::Array(items) => {
            trace!(items = items.len(), "selector fans out");
            containers.extend(items.into_iter().filter(|item| !item.is_empty()));
        }
        value => containers.push(value),
    }
}

//! Object, array and element-attribute literals
//!
//! Every entry is its own expression evaluated against the chain the
//! literal was found in. Entries resolving to `Empty` are dropped, so a
//! literal can never hold an absent value.

use crate::expression::resolve_expression;
use crate::scope::ScopeChain;
use crate::value::Value;
use reformulator_parser::split_entries;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    /// `{...}`: keyed entries only
    Object,
    /// `[...]`: positional entries only
    Array,
    /// Entries after an element's scope: both, with `on*` handlers kept
    /// as raw text
    Attributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEntries {
    pub keyed: BTreeMap<String, Value>,
    pub positional: Vec<Value>,
}

/// Event handler keys such as `onclick` or `onappear`
pub fn is_event_key(key: &str) -> bool {
    key.strip_prefix("on").map_or(false, |event| !event.is_empty())
}

/// Resolve the entries of a literal. `None` when the interior does not
/// split into valid entries.
pub fn resolve_entries(
    interior: &str,
    kind: StructureKind,
    chain: ScopeChain<'_>,
) -> Option<ResolvedEntries> {
    let entries = match split_entries(interior) {
        Ok(entries) => entries,
        Err(error) => {
            debug!(%error, interior, "invalid structure literal");
            return None;
        }
    };

    let mut resolved = ResolvedEntries::default();
    for entry in entries {
        match (entry.key, kind) {
            (Some(key), StructureKind::Attributes) if is_event_key(key) => {
                if !entry.expression.is_empty() {
                    resolved
                        .keyed
                        .insert(key.to_string(), Value::string(entry.expression));
                }
            }
            (Some(key), StructureKind::Object | StructureKind::Attributes) => {
                let value = resolve_expression(entry.expression, chain);
                if !value.is_empty() {
                    resolved.keyed.insert(key.to_string(), value);
                }
            }
            (None, StructureKind::Array | StructureKind::Attributes) => {
                let value = resolve_expression(entry.expression, chain);
                if !value.is_empty() {
                    resolved.positional.push(value);
                }
            }
            _ => {}
        }
    }

    Some(resolved)
}

/// Resolve an object or array literal's interior into a value
pub fn resolve_structure(interior: &str, kind: StructureKind, chain: ScopeChain<'_>) -> Value {
    let Some(resolved) = resolve_entries(interior, kind, chain) else {
        return Value::Empty;
    };
    match kind {
        StructureKind::Object => Value::Object(resolved.keyed),
        StructureKind::Array | StructureKind::Attributes => Value::Array(resolved.positional),
    }
}

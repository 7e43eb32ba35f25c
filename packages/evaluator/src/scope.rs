//! Scope chain for variable lookup
//!
//! A chain is an optional state layer followed by data layers, nearest
//! first. Layers are borrowed and linked on the stack, so pushing a new
//! scope for a nested template never copies the data underneath.

use crate::value::Value;
use std::iter;

static EMPTY: Value = Value::Empty;

#[derive(Debug)]
struct Layer<'a> {
    value: &'a Value,
    below: Option<&'a Layer<'a>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeChain<'a> {
    state: Option<&'a Value>,
    top: Option<&'a Layer<'a>>,
}

impl<'a> ScopeChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain whose nearest layer is a live template's state map
    pub fn with_state(state: &'a Value) -> Self {
        Self {
            state: Some(state),
            top: None,
        }
    }

    /// The current scope, i.e. what `@` refers to. The state layer is
    /// never the current scope.
    pub fn scope(&self) -> &'a Value {
        self.top.map_or(&EMPTY, |layer| layer.value)
    }

    pub fn data_layers(&self) -> impl Iterator<Item = &'a Value> {
        iter::successors(self.top, |layer| layer.below).map(|layer| layer.value)
    }

    /// Walk state then data layers; the first object that has the key
    /// wins even if the value there is empty
    pub fn lookup(&self, name: &str) -> &'a Value {
        self.state
            .into_iter()
            .chain(self.data_layers())
            .find_map(|layer| match layer {
                Value::Object(map) => map.get(name),
                _ => None,
            })
            .unwrap_or(&EMPTY)
    }

    /// Evaluate `f` with `value` as the new current scope
    pub fn push<R>(&self, value: &Value, f: impl FnOnce(ScopeChain<'_>) -> R) -> R {
        let layer = Layer {
            value,
            below: self.top,
        };
        f(ScopeChain {
            state: self.state,
            top: Some(&layer),
        })
    }

    /// Evaluate `f` with the current scope swapped for `value`
    pub fn replace<R>(&self, value: &Value, f: impl FnOnce(ScopeChain<'_>) -> R) -> R {
        let layer = Layer {
            value,
            below: self.top.and_then(|top| top.below),
        };
        f(ScopeChain {
            state: self.state,
            top: Some(&layer),
        })
    }

    /// Push a whole data stack so that `layers[0]` becomes the current scope
    pub fn extend<R>(&self, layers: &[Value], f: impl FnOnce(ScopeChain<'_>) -> R) -> R {
        match layers.split_last() {
            Some((farthest, nearer)) => {
                self.push(farthest, |chain| chain.extend(nearer, f))
            }
            None => f(*self),
        }
    }
}

//! Resolution engine for reformulator templates
//!
//! Expressions resolve against a [`ScopeChain`] to a [`Value`]; templates
//! thread those values through nested fragments; [`LiveTemplate`] keeps a
//! resolved template on a page in sync with its state.

pub mod compare;
pub mod dom;
pub mod element;
pub mod error;
pub mod expression;
pub mod html;
pub mod live;
pub mod merge;
pub mod operand;
pub mod operation;
pub mod path;
pub mod reconciler;
pub mod scope;
pub mod structure;
pub mod template;
pub mod value;

#[cfg(test)]
mod tests_expressions;

#[cfg(test)]
mod tests_operations;

#[cfg(test)]
mod tests_template;

pub use compare::{deep_equal, is_proper_superset};
pub use dom::{Dom, DomEvent, MemoryDom, NodeId};
pub use element::{resolve_element, ElementStructure, SINGLETON_TAGS};
pub use error::{ExpressionError, ExpressionResult, TemplateError, TemplateResult};
pub use expression::{evaluate, resolve_expression};
pub use html::{escape_html, render_element, render_value};
pub use live::{LiveTemplate, Rendered, ViewportEvent, ViewportSurvey};
pub use merge::merge;
pub use operand::resolve_value;
pub use operation::resolve_operation;
pub use path::{PathSegment, TreePath};
pub use reconciler::update_children;
pub use scope::ScopeChain;
pub use structure::{resolve_structure, StructureKind};
pub use template::{resolve_template, Template};
pub use value::{format_number, Value, ValueCategory, ValueKind};

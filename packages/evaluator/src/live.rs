//! Live templates
//!
//! A [`LiveTemplate`] owns a template, a stack of data layers and a state
//! map. Every state change re-resolves the whole template. On the server
//! the result is rendered to markup; against a [`Dom`] it is patched into
//! live nodes, reusing the node rendered at the same tree path on the
//! previous pass.

use crate::dom::{Dom, DomEvent, NodeId};
use crate::element::ElementStructure;
use crate::html::{escape_html, render_element};
use crate::path::TreePath;
use crate::reconciler::update_children;
use crate::scope::ScopeChain;
use crate::template::{resolve_template, Template};
use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info, instrument, trace};

/// Scroll-position events, measured by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    Appear,
    Above,
    Below,
}

impl ViewportEvent {
    pub fn from_handler(handler: &str) -> Option<Self> {
        match handler {
            "onappear" => Some(ViewportEvent::Appear),
            "onabove" => Some(ViewportEvent::Above),
            "onbelow" => Some(ViewportEvent::Below),
            _ => None,
        }
    }
}

/// Host collaborator that watches nodes against the viewport and calls
/// back into the live template when one fires
pub trait ViewportSurvey {
    fn register(&mut self, event: ViewportEvent, node: NodeId, variable: &str);
}

/// Server-side rendering result
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    pub html: String,
    /// State variables the markup depends on; non-empty means the page
    /// needs re-hydration to stay live
    pub variables: BTreeSet<String>,
}

impl Rendered {
    pub fn needs_rehydration(&self) -> bool {
        !self.variables.is_empty()
    }
}

/// What the previous pass left at a tree path
#[derive(Debug, Clone)]
struct Shadow {
    node: NodeId,
    tag: String,
    class_names: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
}

impl Shadow {
    fn new(node: NodeId, tag: &str) -> Self {
        Self {
            node,
            tag: tag.to_string(),
            class_names: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }
}

enum Root {
    Elements {
        doctype: Option<ElementStructure>,
        root: ElementStructure,
    },
    Text(Value),
}

pub struct LiveTemplate {
    template: Template,
    data: Vec<Value>,
    state: BTreeMap<String, Value>,
    shadows: HashMap<TreePath, Shadow>,
    mount: Option<NodeId>,
    initialized: bool,
    listeners: HashMap<(NodeId, DomEvent), String>,
    survey: Option<Box<dyn ViewportSurvey>>,
}

impl LiveTemplate {
    /// `data[0]` is the nearest layer, i.e. what `@` refers to
    pub fn new(template: Template, data: Vec<Value>) -> Self {
        Self {
            template,
            data,
            state: BTreeMap::new(),
            shadows: HashMap::new(),
            mount: None,
            initialized: false,
            listeners: HashMap::new(),
            survey: None,
        }
    }

    /// Reuse an existing node for the first rendered root
    pub fn with_mount(mut self, node: NodeId) -> Self {
        self.mount = Some(node);
        self
    }

    pub fn with_survey(mut self, survey: impl ViewportSurvey + 'static) -> Self {
        self.survey = Some(Box::new(survey));
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    pub fn state(&self) -> &BTreeMap<String, Value> {
        &self.state
    }

    pub fn resolve(&self) -> Value {
        let state = Value::Object(self.state.clone());
        ScopeChain::with_state(&state)
            .extend(&self.data, |chain| resolve_template(&self.template, chain))
    }

    /// Store `value` under `variable`, or flip its truthiness when there
    /// is no value, and re-resolve
    pub fn update(&mut self, variable: &str, value: Option<Value>) -> Value {
        self.set_state(variable, value);
        self.resolve()
    }

    fn set_state(&mut self, variable: &str, value: Option<Value>) {
        let value = value.unwrap_or_else(|| {
            let current = self.state.get(variable).map_or(false, Value::is_truthy);
            Value::Boolean(!current)
        });
        info!(variable, value = ?value, "state updated");
        self.state.insert(variable.to_string(), value);
    }

    #[instrument(skip(self))]
    pub fn render_markup(&self) -> Rendered {
        match split_root(self.resolve()) {
            Root::Text(value) => Rendered {
                html: escape_html(&text_of(&value)),
                variables: BTreeSet::new(),
            },
            Root::Elements { doctype, root } => {
                let mut html = doctype.as_ref().map(render_element).unwrap_or_default();
                html.push_str(&render_element(&root));
                Rendered {
                    html,
                    variables: root.variables,
                }
            }
        }
    }

    /// Patch the resolved elements into `dom` and return the root node.
    /// Results without elements leave the page alone.
    #[instrument(skip_all)]
    pub fn render_into<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Option<NodeId> {
        let Root::Elements { root, .. } = split_root(self.resolve()) else {
            debug!("result has no elements, nothing to patch");
            return None;
        };

        let mut next = HashMap::new();
        let node = self.patch(dom, &root, TreePath::root(), &mut next);

        let stale: HashSet<NodeId> = self.shadows.values().map(|shadow| shadow.node).collect();
        self.listeners.retain(|(node, _), _| !stale.contains(node));
        self.shadows = next;

        Some(node)
    }

    /// Update state from outside (e.g. a viewport survey) and re-patch
    pub fn update_into<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        variable: &str,
        value: Option<Value>,
    ) -> Option<NodeId> {
        self.set_state(variable, value);
        self.render_into(dom)
    }

    /// Route a host event to the state variable bound to it. Clicks
    /// toggle; key events store the input's current value. Returns
    /// whether anything was bound.
    pub fn dispatch<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        event: DomEvent,
        input: Option<&str>,
    ) -> bool {
        let Some(variable) = self.listeners.get(&(node, event)).cloned() else {
            debug!(?node, ?event, "no listener bound");
            return false;
        };
        let value = match event {
            DomEvent::Click => None,
            DomEvent::KeyDown | DomEvent::KeyUp | DomEvent::KeyPress => {
                Some(Value::string(input.unwrap_or_default()))
            }
        };
        self.update_into(dom, &variable, value);
        true
    }

    fn patch<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        element: &ElementStructure,
        path: TreePath,
        next: &mut HashMap<TreePath, Shadow>,
    ) -> NodeId {
        let previous = self
            .shadows
            .remove(&path)
            .filter(|shadow| shadow.tag == element.tag);
        let created = previous.is_none();
        let mut shadow = match previous {
            Some(shadow) => shadow,
            None => {
                let mount = if self.initialized { None } else { self.mount.take() };
                self.initialized = true;
                trace!(path = %path, tag = %element.tag, hydrated = mount.is_some(), "creating node");
                let node = mount.unwrap_or_else(|| dom.create_element(&element.tag));
                Shadow::new(node, &element.tag)
            }
        };
        let node = shadow.node;

        self.bind_events(dom, node, element, created);

        if shadow.class_names != element.class_names {
            if element.class_names.is_empty() {
                dom.remove_attribute(node, "class");
            } else {
                let classes: Vec<&str> = element.class_names.iter().map(String::as_str).collect();
                dom.set_attribute(node, "class", &classes.join(" "));
            }
            shadow.class_names = element.class_names.clone();
        }

        let attributes: BTreeMap<String, String> = element
            .rendered_attributes()
            .into_iter()
            .filter_map(|(name, value)| attribute_text(&value).map(|text| (name, text)))
            .collect();
        if shadow.attributes != attributes {
            for name in shadow.attributes.keys() {
                if !attributes.contains_key(name) {
                    dom.remove_attribute(node, name);
                }
            }
            for (name, value) in &attributes {
                if shadow.attributes.get(name) != Some(value) {
                    dom.set_attribute(node, name, value);
                }
            }
            shadow.attributes = attributes;
        }

        if !element.is_singleton() {
            self.patch_children(dom, node, element, &path, next);
        }

        next.insert(path, shadow);
        node
    }

    fn patch_children<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        element: &ElementStructure,
        path: &TreePath,
        next: &mut HashMap<TreePath, Shadow>,
    ) {
        let content = element.rendered_content();

        if let [single] = content {
            if let Some(text) = single.literal_text() {
                let current = dom.children(node);
                let is_plain = current.len() == 1 && dom.tag(current[0]).is_none();
                if !is_plain || dom.text_content(node) != text {
                    dom.set_text_content(node, &text);
                }
                return;
            }
        }

        let mut children = Vec::with_capacity(content.len());
        for (index, child) in content.iter().enumerate() {
            match child {
                Value::Element(child_element) => {
                    let child_path = path.child(index, child_element.key.as_deref());
                    children.push(self.patch(dom, child_element, child_path, next));
                }
                other => {
                    if let Some(text) = other.literal_text() {
                        children.push(dom.create_text(&text));
                    }
                }
            }
        }
        update_children(dom, node, &children);
    }

    fn bind_events<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        element: &ElementStructure,
        created: bool,
    ) {
        for (handler, variable) in &element.events {
            if let Some(event) = DomEvent::from_handler(handler) {
                if self
                    .listeners
                    .insert((node, event), variable.clone())
                    .is_none()
                {
                    dom.listen(node, event);
                }
            } else if let Some(kind) = ViewportEvent::from_handler(handler) {
                if let (true, Some(survey)) = (created, self.survey.as_mut()) {
                    survey.register(kind, node, variable);
                }
            } else {
                debug!(handler = handler.as_str(), "unsupported event handler");
            }
        }
    }
}

fn split_root(result: Value) -> Root {
    match result {
        Value::Element(root) => Root::Elements {
            doctype: None,
            root: *root,
        },
        Value::Array(mut items) if items.iter().any(|item| item.as_element().is_some()) => {
            let leading_doctype = items.len() > 1
                && matches!(items.first(), Some(Value::Element(first)) if first.tag == "!doctype");
            let doctype = if leading_doctype {
                match items.remove(0) {
                    Value::Element(doctype) => Some(*doctype),
                    _ => None,
                }
            } else {
                None
            };

            let root = match (items.len(), items.pop()) {
                (1, Some(Value::Element(only))) => *only,
                (_, last) => {
                    items.extend(last);
                    ElementStructure::new("div").with_content(Value::Array(items))
                }
            };
            Root::Elements { doctype, root }
        }
        other => Root::Text(other),
    }
}

/// Text for results without elements: literals as text, structures as
/// JSON, nothing as nothing
fn text_of(value: &Value) -> String {
    match value {
        Value::Empty => String::new(),
        literal if literal.is_literal() => literal.literal_text().unwrap_or_default(),
        structure => serde_json::to_string(structure).unwrap_or_default(),
    }
}

fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Number(_) => value.literal_text(),
        Value::Boolean(true) => Some(String::new()),
        _ => None,
    }
}

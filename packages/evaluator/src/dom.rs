//! Host DOM abstraction
//!
//! The live template drives a page through [`Dom`]. [`MemoryDom`] is an
//! arena implementation used for server-side hydration checks and tests.

use crate::element::SINGLETON_TAGS;
use crate::html::escape_html;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Host events a live element can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Click,
    KeyDown,
    KeyUp,
    KeyPress,
}

impl DomEvent {
    /// Map an `on*` handler key to its host event
    pub fn from_handler(handler: &str) -> Option<Self> {
        match handler {
            "onclick" => Some(DomEvent::Click),
            "onkeydown" => Some(DomEvent::KeyDown),
            "onkeyup" => Some(DomEvent::KeyUp),
            "onkeypress" => Some(DomEvent::KeyPress),
            _ => None,
        }
    }
}

pub trait Dom {
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn create_text(&mut self, text: &str) -> NodeId;
    /// Tag of an element node; `None` for text nodes
    fn tag(&self, node: NodeId) -> Option<&str>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    /// Insert `child` before `reference`, or at the end. A child that is
    /// already attached somewhere is moved.
    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>);
    fn remove_child(&mut self, parent: NodeId, child: NodeId);
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);
    /// Replace all children with a single text node
    fn set_text_content(&mut self, node: NodeId, text: &str);
    fn text_content(&self, node: NodeId) -> String;
    fn listen(&mut self, node: NodeId, event: DomEvent);
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Debug, Clone)]
struct MemoryNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<MemoryNode>,
    listeners: HashSet<(NodeId, DomEvent)>,
    /// Number of insertions performed, moves included
    pub inserts: usize,
    pub removals: usize,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)
            .and_then(|node| node.attributes.get(name))
            .map(String::as_str)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|node| node.parent)
    }

    pub fn is_listening(&self, node: NodeId, event: DomEvent) -> bool {
        self.listeners.contains(&(node, event))
    }

    /// Serialize a node and its subtree
    pub fn to_html(&self, node: NodeId) -> String {
        let mut html = String::new();
        self.write_html(node, &mut html);
        html
    }

    fn write_html(&self, node: NodeId, html: &mut String) {
        let Some(memory_node) = self.nodes.get(node.0) else {
            return;
        };
        match &memory_node.kind {
            NodeKind::Text(text) => html.push_str(&escape_html(text)),
            NodeKind::Element(tag) => {
                html.push('<');
                html.push_str(tag);
                for (name, value) in &memory_node.attributes {
                    html.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
                }
                html.push('>');
                if SINGLETON_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for child in &memory_node.children {
                    self.write_html(*child, html);
                }
                html.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(MemoryNode {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.retain(|existing| *existing != child);
        }
        if let Some(child_node) = self.nodes.get_mut(child.0) {
            child_node.parent = None;
        }
    }
}

impl Dom for MemoryDom {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(tag.to_string()))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || parent == child {
            return;
        }
        self.detach(child);

        let siblings = &mut self.nodes[parent.0].children;
        let position = reference
            .and_then(|reference| siblings.iter().position(|existing| *existing == reference))
            .unwrap_or(siblings.len());
        siblings.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        self.inserts += 1;
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
            self.removals += 1;
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.attributes.remove(name);
        }
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        let Some(memory_node) = self.nodes.get_mut(node.0) else {
            return;
        };
        if let NodeKind::Text(existing) = &mut memory_node.kind {
            *existing = text.to_string();
            return;
        }
        for child in self.children(node) {
            self.detach(child);
        }
        let text_node = self.create_text(text);
        self.nodes[text_node.0].parent = Some(node);
        self.nodes[node.0].children.push(text_node);
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(memory_node) = self.nodes.get(node.0) else {
            return String::new();
        };
        match &memory_node.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => memory_node
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    fn listen(&mut self, node: NodeId, event: DomEvent) {
        self.listeners.insert((node, event));
    }
}

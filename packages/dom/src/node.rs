//! # Document Tree
//!
//! Arena-backed HTML tree. Nodes are addressed by [`NodeId`] and never
//! freed: replacing an element's children detaches the old subtree, which
//! keeps ids handed out earlier valid (they just stop being reachable).

use serde::{Deserialize, Serialize};

use crate::html;
use crate::serializer;

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Tree root
    Document,

    /// `<!DOCTYPE ...>` (content is everything between `<!` and `>`)
    Doctype { content: String },

    /// HTML element; attributes keep source order
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },

    /// Text run, stored exactly as written in the source (entities undecoded)
    Text { content: String },

    /// Comment node
    Comment { content: String },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Parsed HTML document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    /// Arena slots of replaced subtrees, reused by `append`
    free: Vec<NodeId>,
}

impl Document {
    /// Empty document containing only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            free: Vec::new(),
        }
    }

    /// Parse a full HTML page. Parsing is lenient and never fails.
    pub fn parse(source: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        html::parse_into(&mut doc, root, source);
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    /// Child nodes that are elements
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.is_element(*child))
    }

    /// Lowercase tag name, `None` for non-elements
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            let value = value.into();
            match attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value,
                None => attributes.push((name.to_string(), value)),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            attributes.retain(|(key, _)| key != name);
        }
    }

    /// Non-empty `id` attribute
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attr(id, "id").filter(|value| !value.is_empty())
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.attr(id, "class")
            .unwrap_or_default()
            .split_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// 1-based position of `id` among its parent's children with the same
    /// tag, and how many such siblings there are
    pub fn type_position(&self, id: NodeId) -> (usize, usize) {
        let Some(parent) = self.parent(id) else {
            return (1, 1);
        };
        let tag = self.tag_name(id);
        let mut position = 1;
        let mut count = 0;
        for sibling in self.element_children(parent) {
            if self.tag_name(sibling) != tag {
                continue;
            }
            count += 1;
            if sibling == id {
                position = count;
            }
        }
        (position, count.max(1))
    }

    /// Parent chain, nearest first (excluding `id` itself)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// All nodes below `id` in document order (excluding `id` itself)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// True when `node` sits somewhere below `ancestor`
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// First element in document order with the given tag
    pub fn find_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|node| self.tag_name(*node) == Some(tag))
    }

    /// `<body>` element, if the page has one
    pub fn body(&self) -> Option<NodeId> {
        self.find_tag("body")
    }

    /// First element with the given id attribute
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|node| self.element_id(*node) == Some(element_id))
    }

    /// Serialized children of `id`
    pub fn inner_html(&self, id: NodeId) -> String {
        serializer::inner_html(self, id)
    }

    /// Serialized node including its own tag
    pub fn outer_html(&self, id: NodeId) -> String {
        serializer::outer_html(self, id)
    }

    /// Whole document back to markup
    pub fn to_html(&self) -> String {
        serializer::inner_html(self, self.root())
    }

    /// Replace the children of `id` with the parsed fragment.
    ///
    /// Ids of the replaced nodes become invalid; their slots are reused.
    pub fn set_inner_html(&mut self, id: NodeId, fragment: &str) {
        let old = std::mem::take(&mut self.nodes[id.0].children);
        let mut stack = old;
        while let Some(node) = stack.pop() {
            let data = &mut self.nodes[node.0];
            data.parent = None;
            data.kind = NodeKind::Comment { content: String::new() };
            stack.append(&mut data.children);
            self.free.push(node);
        }
        html::parse_into(self, id, fragment);
    }

    /// Number of nodes currently in the tree, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Unlink `id` (and its subtree) from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    /// Concatenated raw text below `id` (entities are left as written)
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text { content } = self.kind(node) {
                out.push_str(content);
            }
        }
        out
    }

    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot.0] = data;
                slot
            }
            None => {
                self.nodes.push(data);
                NodeId(self.nodes.len() - 1)
            }
        };
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Extend the last text child of `parent` or start a new one
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text { content } = &mut self.nodes[last.0].kind {
                content.push_str(text);
                return;
            }
        }
        self.append(
            parent,
            NodeKind::Text {
                content: text.to_string(),
            },
        );
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Document::ancestors`]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

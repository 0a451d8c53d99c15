//! Arena-based DOM for HTML parsing.
//!
//! html5ever parses into this tree through [`ArenaSink`](super::ArenaSink).
//! Nodes live in one vector and link to each other by index, so a whole
//! document can be borrowed immutably by the conversion engine while its
//! classification lives in a separate side table indexed by [`ArenaNodeId`].

use std::collections::HashMap;

use html5ever::{LocalName, QualName};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    /// Index into the arena vector.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    fn into_option(self) -> Option<ArenaNodeId> {
        self.is_some().then_some(self)
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    /// Document root.
    Document,
    /// Detached container of sibling nodes.
    Fragment,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    /// Text content.
    Text(String),
    /// Comment.
    Comment(String),
    /// Document type declaration.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

impl ArenaNodeData {
    /// Human readable node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ArenaNodeData::Document => "document",
            ArenaNodeData::Fragment => "document fragment",
            ArenaNodeData::Element { .. } => "element",
            ArenaNodeData::Text(_) => "text",
            ArenaNodeData::Comment(_) => "comment",
            ArenaNodeData::Doctype { .. } => "doctype",
        }
    }
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Attribute name without namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.local.as_ref()
    }
}

/// A node in the arena DOM.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
///
/// All nodes are stored in a contiguous vector. Parent/child/sibling links
/// use indices into this vector; detached nodes stay allocated.
#[derive(Debug, Clone)]
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
    /// Map from id attribute to node ID for fast lookup.
    id_map: HashMap<String, ArenaNodeId>,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
            id_map: HashMap::new(),
        };
        dom.document = dom.alloc(ArenaNode::new(ArenaNodeData::Document));
        dom
    }

    fn alloc(&mut self, node: ArenaNode) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        let id_attr = attrs
            .iter()
            .find(|a| a.local_name() == "id")
            .map(|a| a.value.clone());

        let node_id = self.alloc(ArenaNode::new(ArenaNodeData::Element { name, attrs }));

        if let Some(id_str) = id_attr {
            self.id_map.entry(id_str).or_insert(node_id);
        }

        node_id
    }

    /// Create an HTML element from a tag name and `(name, value)` attribute pairs.
    pub fn create_html_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> ArenaNodeId {
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: QualName::new(None, html5ever::ns!(), LocalName::from(*name)),
                value: (*value).to_string(),
            })
            .collect();
        self.create_element(
            QualName::new(None, html5ever::ns!(html), LocalName::from(tag)),
            attrs,
        )
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Text(text.into())))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Comment(text.into())))
    }

    /// Create a new, detached document fragment.
    pub fn create_fragment(&mut self) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Fragment))
    }

    /// Create a doctype node.
    pub fn create_doctype(
        &mut self,
        name: String,
        public_id: String,
        system_id: String,
    ) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = ArenaNodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings. The node stays allocated.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    /// Move every child of `node` to the end of `new_parent`.
    pub fn reparent_children(&mut self, node: ArenaNodeId, new_parent: ArenaNodeId) {
        let children: Vec<_> = self.children(node).collect();
        for child in children {
            self.detach(child);
            self.append(new_parent, child);
        }
    }

    /// Replace the data of a text node.
    pub fn set_text(&mut self, id: ArenaNodeId, text: String) {
        if let Some(node) = self.get_mut(id)
            && let ArenaNodeData::Text(ref mut existing) = node.data
        {
            *existing = text;
        }
    }

    /// Get node by id attribute.
    pub fn get_by_id(&self, id: &str) -> Option<ArenaNodeId> {
        self.id_map.get(id).copied()
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        ChildrenIter {
            dom: self,
            current: self.first_child(parent).unwrap_or(ArenaNodeId::NONE),
        }
    }

    pub fn parent(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.parent.into_option())
    }

    pub fn first_child(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.first_child.into_option())
    }

    pub fn next_sibling(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.next_sibling.into_option())
    }

    pub fn prev_sibling(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.prev_sibling.into_option())
    }

    /// Find the first node matching a predicate (DFS from the document).
    pub fn find<F>(&self, predicate: F) -> Option<ArenaNodeId>
    where
        F: Fn(&ArenaNode) -> bool,
    {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    return Some(id);
                }
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        None
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.find(|node| {
            if let ArenaNodeData::Element { name, .. } = &node.data {
                name.local.as_ref() == tag
            } else {
                false
            }
        })
    }

    /// Deep-copy the subtree rooted at `id` into a fresh arena.
    ///
    /// Returns the new arena and the id of the copied root. A document is
    /// copied onto the new arena's own document node; any other root is
    /// appended under it.
    pub fn clone_subtree(&self, id: ArenaNodeId) -> (ArenaDom, ArenaNodeId) {
        let mut copy = ArenaDom::new();
        let root = match self.get(id).map(|n| &n.data) {
            Some(ArenaNodeData::Document) | None => copy.document(),
            Some(_) => {
                let root = copy.copy_node(self, id);
                copy.append(copy.document(), root);
                root
            }
        };

        let mut stack = vec![(id, root)];
        while let Some((source, target)) = stack.pop() {
            for child in self.children(source) {
                let copied = copy.copy_node(self, child);
                copy.append(target, copied);
                stack.push((child, copied));
            }
        }

        (copy, root)
    }

    fn copy_node(&mut self, source: &ArenaDom, id: ArenaNodeId) -> ArenaNodeId {
        match source.get(id).map(|n| n.data.clone()) {
            Some(ArenaNodeData::Element { name, attrs }) => self.create_element(name, attrs),
            Some(data) => self.alloc(ArenaNode::new(data)),
            None => self.create_fragment(),
        }
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Convenience methods for element and text nodes.
impl ArenaDom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get an element's attributes (empty for other nodes).
    pub fn attrs(&self, id: ArenaNodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.local_name().eq_ignore_ascii_case(attr_name))
            .map(|a| a.value.as_str())
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: ArenaNodeId) -> impl Iterator<Item = &str> {
        self.get_attr(id, "class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Text(_)))
    }

    /// Get the data of a text node.
    pub fn text(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text_content(&self, id: ArenaNodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        let mut out = String::new();
        let mut stack: Vec<ArenaNodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            if let Some(text) = self.text(node) {
                out.push_str(text);
                continue;
            }
            let start = stack.len();
            stack.extend(self.children(node));
            stack[start..].reverse();
        }
        out
    }
}

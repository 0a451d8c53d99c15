//! Read-only view of a node during conversion.

use crate::classify::{Classification, Classifications, FlankingWhitespace};
use crate::dom::{self, ArenaDom, ArenaNodeData, ArenaNodeId, Attribute};

/// A node of the tree being converted, together with its classification.
///
/// Handed to filters and replacement functions. Cheap to copy.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
    facts: &'a Classifications,
}

static UNCLASSIFIED: Classification = Classification {
    is_block: false,
    is_code: false,
    is_blank: false,
    flanking: FlankingWhitespace {
        leading: String::new(),
        trailing: String::new(),
    },
};

impl<'a> NodeRef<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId, facts: &'a Classifications) -> Self {
        Self { dom, id, facts }
    }

    pub fn id(&self) -> ArenaNodeId {
        self.id
    }

    pub fn dom(&self) -> &'a ArenaDom {
        self.dom
    }

    fn at(&self, id: ArenaNodeId) -> NodeRef<'a> {
        NodeRef { id, ..*self }
    }

    fn facts(&self) -> &'a Classification {
        self.facts.get(self.id).unwrap_or(&UNCLASSIFIED)
    }

    pub fn data(&self) -> Option<&'a ArenaNodeData> {
        self.dom.get(self.id).map(|n| &n.data)
    }

    /// Lowercase tag name, or `None` for non-elements.
    pub fn tag(&self) -> Option<&'a str> {
        self.dom.element_name(self.id).map(|n| n.as_ref())
    }

    /// Whether this is an element with the given tag (case-insensitive).
    pub fn is(&self, tag: &str) -> bool {
        self.tag().is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_element(&self) -> bool {
        self.dom.is_element(self.id)
    }

    pub fn is_text(&self) -> bool {
        self.dom.is_text(self.id)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.dom.get_attr(self.id, name)
    }

    pub fn attrs(&self) -> &'a [Attribute] {
        self.dom.attrs(self.id)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.dom.parent(self.id).map(|id| self.at(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        let this = *self;
        self.dom.children(self.id).map(move |id| this.at(id))
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.dom.first_child(self.id).map(|id| self.at(id))
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.dom.next_sibling(self.id).map(|id| self.at(id))
    }

    pub fn prev_sibling(&self) -> Option<NodeRef<'a>> {
        self.dom.prev_sibling(self.id).map(|id| self.at(id))
    }

    pub fn next_element_sibling(&self) -> Option<NodeRef<'a>> {
        let mut current = self.next_sibling();
        while let Some(node) = current {
            if node.is_element() {
                return Some(node);
            }
            current = node.next_sibling();
        }
        None
    }

    pub fn prev_element_sibling(&self) -> Option<NodeRef<'a>> {
        let mut current = self.prev_sibling();
        while let Some(node) = current {
            if node.is_element() {
                return Some(node);
            }
            current = node.prev_sibling();
        }
        None
    }

    /// Data of a text node.
    pub fn text(&self) -> Option<&'a str> {
        self.dom.text(self.id)
    }

    pub fn text_content(&self) -> String {
        self.dom.text_content(self.id)
    }

    pub fn is_block(&self) -> bool {
        self.facts().is_block
    }

    pub fn is_code(&self) -> bool {
        self.facts().is_code
    }

    pub fn is_blank(&self) -> bool {
        self.facts().is_blank
    }

    pub fn flanking_whitespace(&self) -> &'a FlankingWhitespace {
        &self.facts().flanking
    }

    pub fn outer_html(&self) -> String {
        dom::outer_html(self.dom, self.id)
    }

    pub fn open_tag(&self, extra: &[(&str, &str)]) -> String {
        dom::open_tag(self.dom, self.id, extra)
    }

    pub fn close_tag(&self) -> String {
        dom::close_tag(self.dom, self.id)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.data().map(ArenaNodeData::kind))
            .field("tag", &self.tag())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn test_navigation_and_facts() {
        let (dom, root) = ArenaDom::parse_fragment("<ul><li>a</li> <li>b</li></ul>");
        let facts = Classifications::build(&dom, root, &Options::default());
        let node = NodeRef::new(&dom, root, &facts);

        let ul = node.first_child().unwrap();
        assert!(ul.is("UL"));
        assert!(ul.is_block());

        let first = ul.first_child().unwrap();
        let second = first.next_element_sibling().unwrap();
        assert_eq!(second.text_content(), "b");
        assert_eq!(second.prev_element_sibling().unwrap().id(), first.id());
        assert!(second.next_element_sibling().is_none());
        assert_eq!(second.parent().unwrap().id(), ul.id());
    }

    #[test]
    fn test_unclassified_nodes_have_default_facts() {
        let (dom, root) = ArenaDom::parse_fragment("<p>x</p>");
        let facts = Classifications::default();
        let node = NodeRef::new(&dom, root, &facts);
        let p = node.first_child().unwrap();

        assert!(!p.is_block());
        assert!(p.flanking_whitespace().is_empty());
        assert_eq!(p.outer_html(), "<p>x</p>");
    }
}

//! Element tree produced by block parsing.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Ids stay valid for the lifetime of the document, which lets
//! block processors keep non-owning references to elements across calls.

use crate::tags::is_void;

/// Identifier of an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Text content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Raw text value.
    pub value: String,
    /// Atomic text is final and must not receive span-level processing.
    pub atomic: bool,
}

/// Element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Direct text content.
    pub text: Option<Text>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }
}

/// Element tree with a `div` root.
///
/// # Example
///
/// ```
/// use rw_blocks::Document;
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let p = doc.append(root, "p");
/// doc.set_text(p, "Hello & welcome");
///
/// assert_eq!(doc.render(), "<p>Hello &amp; welcome</p>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("div")],
        }
    }

    /// Root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    /// Mutably borrow an element.
    pub fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    /// Append a new element as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let index = self.nodes[parent.0].children.len();
        self.insert(parent, index, tag)
    }

    /// Insert a new element as child number `index` of `parent`.
    ///
    /// An index past the end appends.
    pub fn insert(&mut self, parent: NodeId, index: usize, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element::new(tag));
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, id);
        id
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    /// Attribute value, if set.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any previous value in place.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let attrs = &mut self.nodes[id.0].attrs;
        if let Some(slot) = attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            attrs.push((name.to_owned(), value));
        }
    }

    /// Check whether the space-separated `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }

    /// Text value of an element.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].text.as_ref().map(|t| t.value.as_str())
    }

    /// Whether the element's text is atomic.
    #[must_use]
    pub fn is_atomic(&self, id: NodeId) -> bool {
        self.nodes[id.0].text.as_ref().is_some_and(|t| t.atomic)
    }

    /// Set regular text.
    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        self.nodes[id.0].text = Some(Text {
            value: value.into(),
            atomic: false,
        });
    }

    /// Set atomic text.
    pub fn set_atomic_text(&mut self, id: NodeId, value: impl Into<String>) {
        self.nodes[id.0].text = Some(Text {
            value: value.into(),
            atomic: true,
        });
    }

    /// Remove and return the element's text.
    pub fn take_text(&mut self, id: NodeId) -> Option<Text> {
        self.nodes[id.0].text.take()
    }

    /// Children of an element.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Last child of an element.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    /// Children with the given tag, in document order.
    pub fn children_with_tag<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.tag(child) == tag)
    }

    /// Serialize the children of the root element.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_children(self.root())
    }

    /// Serialize one element including its own tag.
    #[must_use]
    pub fn render_node(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.write_node(id, &mut output);
        output
    }

    fn render_children(&self, id: NodeId) -> String {
        let mut output = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut output);
        }
        output
    }

    fn write_node(&self, id: NodeId, output: &mut String) {
        let element = self.element(id);
        output.push('<');
        output.push_str(&element.tag);
        for (name, value) in &element.attrs {
            output.push(' ');
            output.push_str(name);
            output.push_str("=\"");
            output.push_str(&escape_html(value));
            output.push('"');
        }

        if element.children.is_empty() && element.text.is_none() && is_void(&element.tag) {
            output.push_str(" />");
            return;
        }

        output.push('>');
        if let Some(text) = &element.text {
            output.push_str(&escape_html(&text.value));
        }
        for &child in &element.children {
            self.write_node(child, output);
        }
        output.push_str("</");
        output.push_str(&element.tag);
        output.push('>');
    }
}

/// Escape HTML special characters in text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

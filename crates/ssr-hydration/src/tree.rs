//! Tree abstraction used by the navigator, and an arena implementation.

/// Forward-only view of a node tree.
///
/// Only the links needed to move forward in document order.
pub trait NodeTree {
    /// Node handle. Equality must be identity.
    type Node: Copy + Eq;

    /// Enclosing element of `node`, or `None` at the top of the element tree.
    fn parent_element(&self, node: Self::Node) -> Option<Self::Node>;

    /// First child of `node`, if any.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Next sibling of `node`, if any.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Human-readable description for diagnostics (tag name, else node type).
    fn describe(&self, node: Self::Node) -> String;
}

/// Handle to a node inside a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root.
    Document,
    /// Element with a tag name.
    Element(String),
    /// Text node.
    Text(String),
    /// Comment node.
    Comment(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// Arena-allocated node tree.
///
/// Nodes are only ever appended, so a [`NodeId`] stays valid for the life of
/// the document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only its root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                first_child: None,
                last_child: None,
                next_sibling: None,
            }],
        }
    }

    /// Document root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append(parent, NodeKind::Element(tag.to_ascii_lowercase()))
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Text(text.to_owned()))
    }

    /// Append a comment node as the last child of `parent`.
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Comment(text.to_owned()))
    }

    /// Payload of `node`.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.data(node).kind
    }

    /// Parent of `node`, including the document root.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a document holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            first_child: None,
            last_child: None,
            next_sibling: None,
        });

        match self.data(parent).last_child {
            Some(last) => self.data_mut(last).next_sibling = Some(id),
            None => self.data_mut(parent).first_child = Some(id),
        }
        self.data_mut(parent).last_child = Some(id);
        id
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }
}

impl NodeTree for Document {
    type Node = NodeId;

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
            .filter(|&p| matches!(self.kind(p), NodeKind::Element(_)))
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).next_sibling
    }

    fn describe(&self, node: NodeId) -> String {
        match self.kind(node) {
            NodeKind::Element(tag) => tag.clone(),
            NodeKind::Text(_) => "#text".to_owned(),
            NodeKind::Comment(_) => "#comment".to_owned(),
            NodeKind::Document => "#document".to_owned(),
        }
    }
}

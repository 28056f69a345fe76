//! The element tree interactivity tests walk.
//!
//! This is a deliberately small document model: enough structure (kind,
//! role, attributes, classes, parent links) for an ancestor-walking matcher
//! to decide whether a pointer target counts as interactive. Trees are
//! loadable from JSON as a flat node list.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Identifier of a node within one element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// What kind of element a node is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Anchor,
    Button,
    Input,
    Select,
    TextArea,
    Summary,
    Label,
    Image,
    Paragraph,
    Span,
    Div,
    Section,
    /// Any other element, stored by tag name.
    Custom(String),
}

impl ElementKind {
    /// Map an HTML-style tag name to a kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "a" => Self::Anchor,
            "button" => Self::Button,
            "input" => Self::Input,
            "select" => Self::Select,
            "textarea" => Self::TextArea,
            "summary" => Self::Summary,
            "label" => Self::Label,
            "img" => Self::Image,
            "p" => Self::Paragraph,
            "span" => Self::Span,
            "div" => Self::Div,
            "section" => Self::Section,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The HTML-style tag name for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Anchor => "a",
            Self::Button => "button",
            Self::Input => "input",
            Self::Select => "select",
            Self::TextArea => "textarea",
            Self::Summary => "summary",
            Self::Label => "label",
            Self::Image => "img",
            Self::Paragraph => "p",
            Self::Span => "span",
            Self::Div => "div",
            Self::Section => "section",
            Self::Custom(tag) => tag,
        }
    }
}

/// One element in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Parent element; `None` for the root.
    #[serde(default)]
    pub parent: Option<NodeId>,

    pub kind: ElementKind,

    /// Explicit ARIA-style role, if any.
    #[serde(default)]
    pub role: Option<String>,

    /// Attribute map (e.g. `href`, `type`, `data-cursor`).
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    /// Class list.
    #[serde(default)]
    pub classes: Vec<String>,
}

impl Node {
    pub fn new(id: NodeId, kind: ElementKind) -> Self {
        Self {
            id,
            parent: None,
            kind,
            role: None,
            attrs: BTreeMap::new(),
            classes: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Whether the node carries the given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Errors from building or walking an element tree.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    /// A walk referenced a node id the tree does not contain. This is the
    /// detached-node case: the chain points at an element that is gone.
    #[error("node {0:?} is not in the tree")]
    Detached(NodeId),

    /// An ancestor chain exceeded the depth limit, which means the parent
    /// links form a cycle or the tree is corrupt.
    #[error("ancestor chain from {0:?} exceeds depth limit")]
    DepthExceeded(NodeId),

    /// Two nodes in the input shared an id.
    #[error("duplicate node id {0:?}")]
    DuplicateId(NodeId),
}

/// Parent links deeper than this are treated as corrupt.
const MAX_WALK_DEPTH: usize = 256;

/// A flat element tree with id lookup and ancestor walking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Node>", try_from = "Vec<Node>")]
pub struct NodeTree {
    nodes: HashMap<NodeId, Node>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a node list, rejecting duplicate ids.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, TreeError> {
        let mut map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id;
            if map.insert(id, node).is_some() {
                return Err(TreeError::DuplicateId(id));
            }
        }
        Ok(Self { nodes: map })
    }

    /// Insert a node, replacing any existing node with the same id.
    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    /// Remove a node. Children keep their parent link, becoming detached.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from `start` up through its ancestors, yielding the node itself
    /// first. The walk is lazy: callers that stop at a match never observe
    /// problems further up the chain.
    pub fn walk_up(&self, start: NodeId) -> AncestorWalk<'_> {
        AncestorWalk {
            tree: self,
            next: Some(start),
            start,
            depth: 0,
            done: false,
        }
    }
}

impl From<NodeTree> for Vec<Node> {
    fn from(tree: NodeTree) -> Self {
        let mut nodes: Vec<Node> = tree.nodes.into_values().collect();
        nodes.sort_by_key(|node| node.id);
        nodes
    }
}

impl TryFrom<Vec<Node>> for NodeTree {
    type Error = TreeError;

    fn try_from(nodes: Vec<Node>) -> Result<Self, Self::Error> {
        Self::from_nodes(nodes)
    }
}

/// Lazy self-then-ancestors iterator over a tree.
pub struct AncestorWalk<'a> {
    tree: &'a NodeTree,
    next: Option<NodeId>,
    start: NodeId,
    depth: usize,
    done: bool,
}

impl<'a> Iterator for AncestorWalk<'a> {
    type Item = Result<&'a Node, TreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let id = self.next?;

        if self.depth >= MAX_WALK_DEPTH {
            self.done = true;
            return Some(Err(TreeError::DepthExceeded(self.start)));
        }

        match self.tree.get(id) {
            Some(node) => {
                self.depth += 1;
                self.next = node.parent;
                Some(Ok(node))
            }
            None => {
                self.done = true;
                Some(Err(TreeError::Detached(id)))
            }
        }
    }
}

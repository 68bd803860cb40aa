//! Command tree
//!
//!     The parser produces a forest: the top-level nodes of a document plus everything
//!     nested under them. Nodes live in one arena owned by [`Forest`] and refer to each
//!     other by [`NodeId`]. Children are owned through their parent's `children` list;
//!     the `parent` field is a plain back-reference and never keeps anything alive.
//!
//!     Command nodes always carry a (possibly empty) child list. Text and whitespace
//!     nodes are leaves.

use crate::richtext::commands::names_equal;
use crate::richtext::lexing::tokens::serialize_text;
use bstr::{BStr, BString, ByteSlice};
use serde::Serialize;
use std::ops::Index;

/// Index of a node inside its [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Command,
    Text,
    Whitespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstNode {
    pub byte_offset: usize,
    pub codepoint_offset: usize,
    /// Index of the token this node was built from.
    pub token_index: usize,
    pub kind: NodeKind,
    /// Command name, or the text of a text/whitespace node.
    #[serde(serialize_with = "serialize_text")]
    pub text: BString,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Forest {
    nodes: Vec<AstNode>,
    roots: Vec<NodeId>,
    #[serde(skip)]
    case_insensitive_commands: bool,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty forest whose command names compare ASCII case-insensitively when
    /// `case_insensitive_commands` is set.
    pub fn with_command_case(case_insensitive_commands: bool) -> Self {
        Forest {
            case_insensitive_commands,
            ..Self::default()
        }
    }

    /// The command name comparison this forest was parsed with.
    pub fn case_insensitive_commands(&self) -> bool {
        self.case_insensitive_commands
    }

    /// Adds `node` as the last child of `parent`, or as a new root.
    pub fn attach(&mut self, mut node: AstNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        self.nodes.push(node);
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes, at any depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { forest: self, id }
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().map(move |&id| self.node(id))
    }

    /// Pre-order walk over every node, roots in order.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            forest: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

impl Index<NodeId> for Forest {
    type Output = AstNode;

    fn index(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }
}

pub struct DepthFirst<'a> {
    forest: &'a Forest,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.forest[id].children.iter().rev().copied());
        Some(self.forest.node(id))
    }
}

/// Borrowed handle to one node of a forest.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn forest(&self) -> &'a Forest {
        self.forest
    }

    pub fn data(&self) -> &'a AstNode {
        &self.forest[self.id]
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is_command(&self) -> bool {
        self.kind() == NodeKind::Command
    }

    /// The command name for command nodes, the content otherwise.
    pub fn text(&self) -> &'a BStr {
        self.data().text.as_bstr()
    }

    pub fn is_named(&self, name: &str, case_insensitive: bool) -> bool {
        self.is_command() && names_equal(self.text(), name.as_bytes(), case_insensitive)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.data().parent.map(|id| self.forest.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let forest = self.forest;
        self.data().children.iter().map(move |&id| forest.node(id))
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    pub fn has_ancestor_named(&self, name: &str, case_insensitive: bool) -> bool {
        self.ancestors()
            .any(|ancestor| ancestor.is_named(name, case_insensitive))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: NodeKind, text: &str) -> AstNode {
        AstNode {
            byte_offset: 0,
            codepoint_offset: 0,
            token_index: 0,
            kind,
            text: text.into(),
            parent: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_attach_builds_parent_links() {
        let mut forest = Forest::new();
        let bold = forest.attach(node(NodeKind::Command, "Bold"), None);
        let text = forest.attach(node(NodeKind::Text, "hi"), Some(bold));

        assert_eq!(forest.roots(), &[bold]);
        assert_eq!(forest[bold].children, vec![text]);
        assert_eq!(forest.node(text).parent().map(|p| p.id()), Some(bold));
        assert!(forest.node(text).has_ancestor_named("bold", true));
        assert!(!forest.node(text).has_ancestor_named("bold", false));
    }

    #[test]
    fn test_depth_first_order() {
        let mut forest = Forest::new();
        let a = forest.attach(node(NodeKind::Command, "a"), None);
        forest.attach(node(NodeKind::Text, "1"), Some(a));
        let b = forest.attach(node(NodeKind::Command, "b"), Some(a));
        forest.attach(node(NodeKind::Text, "2"), Some(b));
        forest.attach(node(NodeKind::Text, "3"), None);

        let order: Vec<String> = forest
            .depth_first()
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(order, vec!["a", "1", "b", "2", "3"]);
    }
}

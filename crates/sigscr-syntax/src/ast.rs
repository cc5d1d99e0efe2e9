use crate::operator::OperatorToken;
use serde::Serialize;
use std::ops::Index;

/// Index of a node inside its owning [`Script`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Script,
    Statement,
    Block,
    Enclosure,
    Conditional(ConditionalBlock),
    Value { text: String },
    Operator(OperatorToken),
}

impl NodeKind {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Value { .. } | Self::Operator(_))
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::Conditional(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Statement => "statement",
            Self::Block => "block",
            Self::Enclosure => "enclosure",
            Self::Conditional(_) => "conditional",
            Self::Value { .. } => "value",
            Self::Operator(_) => "operator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalPhase {
    AwaitingCondition,
    AwaitingBody,
    BodyComplete,
    AwaitingAlternate,
    Complete,
}

/// `IF (condition) body [ELSE alternate]`. Children are, in order, the
/// condition enclosure, the body and the optional alternate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalBlock {
    pub phase: ConditionalPhase,
    /// Set when this conditional is the `IF` of an `ELSE IF`.
    pub is_alternate_condition: bool,
}

impl ConditionalBlock {
    pub(crate) fn new(is_alternate_condition: bool) -> Self {
        Self {
            phase: ConditionalPhase::AwaitingCondition,
            is_alternate_condition,
        }
    }

    pub fn has_condition(&self) -> bool {
        self.phase != ConditionalPhase::AwaitingCondition
    }

    pub fn has_body(&self) -> bool {
        matches!(
            self.phase,
            ConditionalPhase::BodyComplete
                | ConditionalPhase::AwaitingAlternate
                | ConditionalPhase::Complete
        )
    }

    pub fn has_alternate(&self) -> bool {
        self.phase == ConditionalPhase::Complete
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Container child still open for insertion, cleared once it completes.
    /// Following these links from the root traces the builder's cursor; the
    /// builder itself never reads them back.
    #[serde(skip)]
    pub current: Option<NodeId>,
    pub line: usize,
    #[serde(skip)]
    pub(crate) alternate_return: bool,
}

/// One parsed `SCRIPT` region. Owns every node of its tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    name: String,
    line: usize,
    nodes: Vec<Node>,
}

impl Script {
    pub fn new(line: usize) -> Self {
        Self {
            name: String::new(),
            line,
            nodes: vec![Node {
                kind: NodeKind::Script,
                parent: None,
                children: Vec::new(),
                current: None,
                line,
                alternate_return: false,
            }],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn push_name(&mut self, part: &str) {
        self.name.push_str(part);
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the script holds no statements or blocks.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn top_level(&self) -> &[NodeId] {
        self.children(self.root())
    }

    pub fn conditional(&self, id: NodeId) -> Option<&ConditionalBlock> {
        match &self.nodes[id.0].kind {
            NodeKind::Conditional(conditional) => Some(conditional),
            _ => None,
        }
    }

    pub(crate) fn conditional_mut(&mut self, id: NodeId) -> Option<&mut ConditionalBlock> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Conditional(conditional) => Some(conditional),
            _ => None,
        }
    }

    pub fn condition(&self, id: NodeId) -> Option<NodeId> {
        self.conditional_child(id, 0)
    }

    pub fn body(&self, id: NodeId) -> Option<NodeId> {
        self.conditional_child(id, 1)
    }

    pub fn alternate(&self, id: NodeId) -> Option<NodeId> {
        self.conditional_child(id, 2)
    }

    fn conditional_child(&self, id: NodeId, slot: usize) -> Option<NodeId> {
        self.conditional(id)?;
        self.children(id).get(slot).copied()
    }

    /// Text of a value or operator leaf.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Value { text } => Some(text),
            NodeKind::Operator(operator) => Some(&operator.text),
            _ => None,
        }
    }

    /// Every node below the root, depth-first in source order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut pending = self
            .top_level()
            .iter()
            .rev()
            .copied()
            .collect::<Vec<_>>();
        while let Some(id) = pending.pop() {
            out.push(id);
            pending.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn count(&self, predicate: impl Fn(&NodeKind) -> bool) -> usize {
        self.descendants()
            .into_iter()
            .filter(|id| predicate(self.kind(*id)))
            .count()
    }

    /// Number of ancestors between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.parent(parent);
        }
        depth
    }

    /// Appends a node under `parent`. Container nodes become the parent's
    /// current child; leaves never do.
    pub(crate) fn push(&mut self, parent: NodeId, kind: NodeKind, line: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let is_leaf = kind.is_leaf();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            current: None,
            line,
            alternate_return: false,
        });
        let parent_node = &mut self.nodes[parent.0];
        parent_node.children.push(id);
        if !is_leaf {
            parent_node.current = Some(id);
        }
        id
    }
}

impl Index<NodeId> for Script {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

#[cfg(test)]
#[path = "ast_test.rs"]
mod tests;

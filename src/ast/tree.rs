use crate::ast::{Category, Operation, Sample};
use std::fmt;

/// Index of a node inside its [`DerivationTree`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node of the derivation tree.
///
/// Children fill `first` before `second`, in the order their operands were
/// read from the token stream. The parent link is only an index; ownership
/// lives in the tree's arena.
#[derive(Debug, Clone)]
pub struct Node {
    sample: Sample<Operation>,
    parent: Option<NodeId>,
    first: Option<NodeId>,
    second: Option<NodeId>,
}

impl Node {
    pub fn sample(&self) -> &Sample<Operation> {
        &self.sample
    }

    pub fn operation(&self) -> &Operation {
        self.sample.payload()
    }

    pub fn category(&self) -> Category {
        self.sample.category()
    }

    pub fn weight(&self) -> i64 {
        self.sample.weight()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    pub fn second(&self) -> Option<NodeId> {
        self.second
    }

    fn child_count(&self) -> usize {
        self.first.is_some() as usize + self.second.is_some() as usize
    }
}

/// Rooted tree of at most two children per node, built from a validated
/// token sequence.
///
/// Only the compiler constructs trees, and it never hands out an empty one.
/// Nothing mutates a tree once it is built.
#[derive(Debug, Clone)]
pub struct DerivationTree {
    nodes: Vec<Node>,
}

impl DerivationTree {
    /// Starts a tree whose root holds `sample`.
    pub(crate) fn with_root(sample: Sample<Operation>) -> Self {
        Self {
            nodes: vec![Node {
                sample,
                parent: None,
                first: None,
                second: None,
            }],
        }
    }

    /// Appends `sample` as the next free child of `parent`.
    ///
    /// Returns `None` when the parent already holds as many children as its
    /// operation consumes.
    pub(crate) fn attach(&mut self, parent: NodeId, sample: Sample<Operation>) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        let slot = {
            let node = &mut self.nodes[parent.0];
            if node.child_count() >= node.operation().arity() {
                return None;
            }
            if node.first.is_none() {
                &mut node.first
            } else {
                &mut node.second
            }
        };
        *slot = Some(id);
        self.nodes.push(Node {
            sample,
            parent: Some(parent),
            first: None,
            second: None,
        });
        Some(id)
    }

    /// Whether every node holds exactly as many children as it consumes.
    pub(crate) fn is_saturated(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| node.child_count() == node.operation().arity())
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of `id` in slot order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = self.node(id);
        node.first.into_iter().chain(node.second)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes; a compiled tree always has a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels, counting the root as one.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self.root(), 1)];
        while let Some((id, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(self.children(id).map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Left-to-right in-order traversal: first subtree, node, second subtree.
    pub fn in_order(&self) -> Vec<&Sample<Operation>> {
        let mut output = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut current = Some(self.root());

        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).first;
            }
            if let Some(id) = stack.pop() {
                output.push(self.node(id).sample());
                current = self.node(id).second;
            }
        }
        output
    }

    /// Node before its children.
    pub fn pre_order(&self) -> Vec<&Sample<Operation>> {
        let mut output = Vec::with_capacity(self.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            output.push(node.sample());
            stack.extend(node.second);
            stack.extend(node.first);
        }
        output
    }

    /// Children before their node, the order a value stack consumes them in.
    pub fn post_order(&self) -> Vec<&Sample<Operation>> {
        let mut output = Vec::with_capacity(self.len());
        let mut stack = vec![(self.root(), false)];
        while let Some((id, expanded)) = stack.pop() {
            let node = self.node(id);
            if expanded {
                output.push(node.sample());
            } else {
                stack.push((id, true));
                stack.extend(node.second.map(|child| (child, false)));
                stack.extend(node.first.map(|child| (child, false)));
            }
        }
        output
    }

    fn write_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node(id);
        if node.first.is_none() {
            return write!(f, "{}", node.operation());
        }
        write!(f, "({}", node.operation())?;
        for child in self.children(id) {
            write!(f, " ")?;
            self.write_node(child, f)?;
        }
        write!(f, ")")
    }
}

/// Renders the tree back to fully-parenthesized prefix notation.
impl fmt::Display for DerivationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(self.root(), f)
    }
}

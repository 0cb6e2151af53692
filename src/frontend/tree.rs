//! The traversable syntax tree the indexer walks.
//!
//! Nodes live in an arena (`Vec` + dense ids); the root is always the first
//! node. Traversal is pre-order and driven by a visitor closure that
//! returns an explicit "visit children: yes/no" decision per node. No
//! callback ABI, no shared client-data pointer.

use smol_str::SmolStr;

use crate::base::SourceLocation;

/// Identifies one node within its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntactic role of a node. The kind *name* is what gets interned into the
/// index's `kind` string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SourceFile,
    FunctionDecl,
    VarDecl,
    TypeDecl,
    CallExpr,
    DeclRefExpr,
    CompoundStmt,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::SourceFile => "SourceFile",
            NodeKind::FunctionDecl => "FunctionDecl",
            NodeKind::VarDecl => "VarDecl",
            NodeKind::TypeDecl => "TypeDecl",
            NodeKind::CallExpr => "CallExpr",
            NodeKind::DeclRefExpr => "DeclRefExpr",
            NodeKind::CompoundStmt => "CompoundStmt",
        }
    }
}

/// One syntax-tree node.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    /// The node's own symbol identifier. `None` for nodes that do not name
    /// a symbol themselves (statements, blocks, unresolved uses).
    pub usr: Option<SmolStr>,
    /// The declaration this node refers to, if it is a use site.
    pub referenced: Option<NodeId>,
    /// Resolved position in the file that physically contains the node.
    pub loc: SourceLocation,
    children: Vec<NodeId>,
}

impl NodeData {
    pub fn new(kind: NodeKind, usr: Option<SmolStr>, loc: SourceLocation) -> Self {
        Self {
            kind,
            usr,
            referenced: None,
            loc,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Per-node traversal decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Recurse into the node's children.
    Children,
    /// Do not descend below this node.
    Skip,
}

/// Arena-backed syntax tree for one translation unit.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node; the first node pushed becomes the root.
    pub fn push(&mut self, node: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Appends `child` to `parent`'s child list.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
    }

    /// Marks `node` as referring to the declaration `target`.
    pub fn set_referenced(&mut self, node: NodeId, target: NodeId) {
        self.nodes[node.index()].referenced = Some(target);
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The identifier a node should be indexed under.
    ///
    /// If the node refers to a declaration, the declaration's identifier
    /// wins; this is what collapses every use of a symbol onto one
    /// identifier. A self-referential link counts as no substitution.
    /// Absent identifiers normalize to the empty string, which downstream
    /// means "do not index this node".
    pub fn effective_usr(&self, id: NodeId) -> &str {
        let node = self.node(id);
        let source = match node.referenced {
            Some(target) if target != id => self.node(target),
            _ => node,
        };
        source.usr.as_deref().unwrap_or("")
    }

    /// Pre-order traversal from the root.
    ///
    /// The visitor decides per node whether to descend; siblings are always
    /// visited in document order regardless.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&SyntaxTree, NodeId) -> Visit,
    {
        if self.nodes.is_empty() {
            return;
        }
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if visit(self, id) == Visit::Children {
                for &child in self.node(id).children().iter().rev() {
                    stack.push(child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("test.x", line, 1)
    }

    /// root ── fn ── block ── use(fn)
    ///      └─ var
    fn small_tree() -> (SyntaxTree, NodeId, NodeId) {
        let mut tree = SyntaxTree::new();
        let root = tree.push(NodeData::new(NodeKind::SourceFile, None, loc(1)));
        let func = tree.push(NodeData::new(
            NodeKind::FunctionDecl,
            Some("f:main".into()),
            loc(1),
        ));
        tree.add_child(root, func);
        let block = tree.push(NodeData::new(NodeKind::CompoundStmt, None, loc(1)));
        tree.add_child(func, block);
        let use_site = tree.push(NodeData::new(NodeKind::DeclRefExpr, None, loc(2)));
        tree.set_referenced(use_site, func);
        tree.add_child(block, use_site);
        let var = tree.push(NodeData::new(NodeKind::VarDecl, Some("v:x".into()), loc(3)));
        tree.add_child(root, var);
        (tree, func, use_site)
    }

    #[test]
    fn test_walk_is_preorder_document_order() {
        let (tree, _, _) = small_tree();
        let mut kinds = Vec::new();
        tree.walk(|tree, id| {
            kinds.push(tree.node(id).kind);
            Visit::Children
        });
        assert_eq!(
            kinds,
            vec![
                NodeKind::SourceFile,
                NodeKind::FunctionDecl,
                NodeKind::CompoundStmt,
                NodeKind::DeclRefExpr,
                NodeKind::VarDecl,
            ]
        );
    }

    #[test]
    fn test_walk_skip_prunes_subtree() {
        let (tree, _, _) = small_tree();
        let mut kinds = Vec::new();
        tree.walk(|tree, id| {
            kinds.push(tree.node(id).kind);
            if tree.node(id).kind == NodeKind::FunctionDecl {
                Visit::Skip
            } else {
                Visit::Children
            }
        });
        // The block and the use below the function are pruned; the sibling
        // var is still visited.
        assert_eq!(
            kinds,
            vec![NodeKind::SourceFile, NodeKind::FunctionDecl, NodeKind::VarDecl]
        );
    }

    #[test]
    fn test_effective_usr_substitutes_referenced_decl() {
        let (tree, _, use_site) = small_tree();
        assert_eq!(tree.effective_usr(use_site), "f:main");
    }

    #[test]
    fn test_effective_usr_own_when_no_reference() {
        let (tree, func, _) = small_tree();
        assert_eq!(tree.effective_usr(func), "f:main");
        assert_eq!(tree.effective_usr(tree.root()), "");
    }

    #[test]
    fn test_effective_usr_self_reference_is_no_substitution() {
        let mut tree = SyntaxTree::new();
        let node = tree.push(NodeData::new(
            NodeKind::VarDecl,
            Some("v:x".into()),
            loc(1),
        ));
        tree.set_referenced(node, node);
        assert_eq!(tree.effective_usr(node), "v:x");
    }

    #[test]
    fn test_walk_empty_tree_is_noop() {
        let tree = SyntaxTree::new();
        let mut visited = 0;
        tree.walk(|_, _| {
            visited += 1;
            Visit::Children
        });
        assert_eq!(visited, 0);
    }
}

//! AST storage: arena, composites and leaves
//!
//! All nodes of one lowering pass live in an [`Ast`] arena and are addressed
//! by [`NodeId`]. A composite exclusively owns the ids in its slots; the
//! parent back-reference is informational only (dumps, error messages) and is
//! never followed for ownership or traversal.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::{LowerError, LowerResult, Span};

use super::NodeKind;

// Serial numbers are unique per process, not stable across runs.
static SERIAL: AtomicU64 = AtomicU64::new(0);

fn next_serial() -> u64 {
    SERIAL.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a node inside an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
enum NodeBody {
    Composite { slots: Vec<Vec<NodeId>> },
    Leaf { lexeme: String, span: Span },
}

/// A single AST node: kind tag, debug name, serial number, optional parent
/// back-reference and either child slots or a lexeme.
#[derive(Debug)]
pub struct AstNode {
    kind: NodeKind,
    name: String,
    serial: u64,
    parent: Option<NodeId>,
    body: NodeBody,
}

impl AstNode {
    fn new(kind: NodeKind, body: NodeBody) -> Self {
        let serial = next_serial();
        Self {
            kind,
            name: format!("{kind:?}_{serial}"),
            serial,
            parent: None,
            body,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Debug name, `{Kind}_{serial}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// The node this one was attached under. Diagnostics only.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Literal text of a leaf; `None` for composites.
    pub fn lexeme(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Leaf { lexeme, .. } => Some(lexeme),
            NodeBody::Composite { .. } => None,
        }
    }

    /// Source span of a leaf's lexeme; `None` for composites.
    pub fn span(&self) -> Option<Span> {
        match &self.body {
            NodeBody::Leaf { span, .. } => Some(*span),
            NodeBody::Composite { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

/// Arena owning every node of one lowered translation unit.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composite node of `kind` with its fixed set of empty slots.
    pub fn add_composite(&mut self, kind: NodeKind) -> NodeId {
        debug_assert!(!kind.is_leaf(), "composite constructor used for leaf kind {kind:?}");
        let slots = vec![Vec::new(); kind.slot_count()];
        self.push(AstNode::new(kind, NodeBody::Composite { slots }))
    }

    /// Create a leaf node of `kind` carrying `lexeme`.
    pub fn add_leaf(&mut self, kind: NodeKind, lexeme: impl Into<String>, span: Span) -> NodeId {
        debug_assert!(kind.is_leaf(), "leaf constructor used for composite kind {kind:?}");
        self.push(AstNode::new(
            kind,
            NodeBody::Leaf {
                lexeme: lexeme.into(),
                span,
            },
        ))
    }

    fn push(&mut self, node: AstNode) -> NodeId {
        let index = u32::try_from(self.nodes.len()).expect("AST arena exceeds u32::MAX nodes");
        self.nodes.push(node);
        NodeId(index)
    }

    /// Append `child` to `parent`'s slot. Fails fast when the slot does not
    /// exist for the parent's kind or the parent is a leaf; slots are
    /// append-only and insertion order is preserved.
    pub fn attach(&mut self, parent: NodeId, slot: usize, child: NodeId) -> LowerResult<()> {
        let limit = match &self.node(parent).body {
            NodeBody::Composite { slots } => slots.len(),
            NodeBody::Leaf { .. } => {
                return Err(LowerError::AttachToLeaf {
                    node: self.node(parent).name().to_string(),
                });
            }
        };
        if slot >= limit {
            return Err(LowerError::SlotOutOfRange {
                node: self.node(parent).name().to_string(),
                slot,
                limit,
            });
        }

        self.nodes[child.index()].parent = Some(parent);
        match &mut self.nodes[parent.index()].body {
            NodeBody::Composite { slots } => slots[slot].push(child),
            NodeBody::Leaf { .. } => unreachable!("checked above"),
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn slot_count(&self, id: NodeId) -> usize {
        self.node(id).kind.slot_count()
    }

    /// Children of `id`'s `slot`, in insertion order. Empty for leaves and
    /// out-of-range slots (read access does not fail fast; attachment does).
    pub fn children(&self, id: NodeId, slot: usize) -> &[NodeId] {
        match &self.node(id).body {
            NodeBody::Composite { slots } => slots.get(slot).map_or(&[], |children| children),
            NodeBody::Leaf { .. } => &[],
        }
    }

    /// First child of a slot, when exactly that is expected.
    pub fn first_child(&self, id: NodeId, slot: usize) -> Option<NodeId> {
        self.children(id, slot).first().copied()
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first search for the first leaf of `kind` in the subtree under
    /// `id` (including `id` itself). Used to recover declared names from
    /// lowered declarator subtrees.
    pub fn find_leaf(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        if self.kind(id) == kind {
            return Some(id);
        }
        for slot in 0..self.slot_count(id) {
            for &child in self.children(id, slot) {
                if let Some(found) = self.find_leaf(child, kind) {
                    return Some(found);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::slots;

    #[test]
    fn test_attach_preserves_insertion_order() {
        let mut ast = Ast::new();
        let tu = ast.add_composite(NodeKind::TranslationUnit);
        let first = ast.add_composite(NodeKind::Declaration);
        let second = ast.add_composite(NodeKind::Declaration);
        ast.attach(tu, slots::translation_unit::DECLARATIONS, first).unwrap();
        ast.attach(tu, slots::translation_unit::DECLARATIONS, second).unwrap();

        assert_eq!(
            ast.children(tu, slots::translation_unit::DECLARATIONS),
            &[first, second]
        );
        assert!(ast.children(tu, slots::translation_unit::FUNCTION_DEFINITION).is_empty());
    }

    #[test]
    fn test_attach_out_of_range_slot_fails() {
        let mut ast = Ast::new();
        let ptr = ast.add_composite(NodeKind::PointerType);
        let child = ast.add_leaf(NodeKind::Identifier, "x", Span::default());

        let err = ast.attach(ptr, 1, child).unwrap_err();
        assert!(matches!(err, LowerError::SlotOutOfRange { slot: 1, limit: 1, .. }));
    }

    #[test]
    fn test_attach_to_leaf_fails() {
        let mut ast = Ast::new();
        let leaf = ast.add_leaf(NodeKind::IntegerConstant, "42", Span::default());
        let child = ast.add_leaf(NodeKind::Identifier, "x", Span::default());

        let err = ast.attach(leaf, 0, child).unwrap_err();
        assert!(matches!(err, LowerError::AttachToLeaf { .. }));
    }

    #[test]
    fn test_parent_back_reference_is_recorded() {
        let mut ast = Ast::new();
        let stmt = ast.add_composite(NodeKind::ExpressionStatement);
        let expr = ast.add_leaf(NodeKind::Identifier, "x", Span::default());
        assert_eq!(ast.node(expr).parent(), None);

        ast.attach(stmt, slots::expression_statement::EXPRESSION, expr).unwrap();
        assert_eq!(ast.node(expr).parent(), Some(stmt));
    }

    #[test]
    fn test_serials_are_unique_and_name_carries_kind() {
        let mut ast = Ast::new();
        let a = ast.add_composite(NodeKind::Addition);
        let b = ast.add_composite(NodeKind::Addition);
        assert_ne!(ast.node(a).serial(), ast.node(b).serial());
        assert!(ast.node(a).name().starts_with("Addition_"));
    }

    #[test]
    fn test_find_leaf_searches_depth_first() {
        let mut ast = Ast::new();
        let outer = ast.add_composite(NodeKind::PointerType);
        let inner = ast.add_composite(NodeKind::PointerType);
        let id = ast.add_leaf(NodeKind::Identifier, "p", Span::default());
        ast.attach(outer, slots::pointer_type::TARGET, inner).unwrap();
        ast.attach(inner, slots::pointer_type::TARGET, id).unwrap();

        assert_eq!(ast.find_leaf(outer, NodeKind::Identifier), Some(id));
        assert_eq!(ast.find_leaf(outer, NodeKind::IntegerConstant), None);
    }
}

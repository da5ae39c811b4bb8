//! Read-only declaration search
//!
//! Traversal collects before lowering mutates; the two phases are kept
//! separate so mutation behavior never depends on traversal order.

use rustc_hash::FxHashSet;

use crate::arena::{IrArena, NodeId};
use crate::node::{Node, NodeKind};

/// Visit `root` and every declaration it transitively owns, in preorder
pub fn walk_declarations<F>(arena: &IrArena, root: NodeId, visit: &mut F)
where
    F: FnMut(NodeId, &Node),
{
    let node = arena.get(root);
    visit(root, node);
    for &child in node.children() {
        walk_declarations(arena, child, visit);
    }
}

/// Collect the declarations a selector maps visited nodes to
///
/// The selector may return the visited node itself or another declaration it
/// references (an accessor's corresponding property, say). Results keep
/// first-encountered order and are deduplicated, so a declaration reachable
/// through several visited nodes is reported once.
pub fn collect_referenced<F>(arena: &IrArena, root: NodeId, mut select: F) -> Vec<NodeId>
where
    F: FnMut(NodeId, &Node) -> Option<NodeId>,
{
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    walk_declarations(arena, root, &mut |id, node| {
        if let Some(target) = select(id, node) {
            if seen.insert(target) {
                out.push(target);
            }
        }
    });
    out
}

/// Collect the declarations matching a predicate, in first-encountered order
pub fn collect_declarations<F>(arena: &IrArena, root: NodeId, mut pred: F) -> Vec<NodeId>
where
    F: FnMut(NodeId, &Node) -> bool,
{
    collect_referenced(arena, root, |id, node| pred(id, node).then_some(id))
}

/// Collect the properties declared directly in a unit, in declaration order
///
/// Reaches properties both directly and through their accessor functions'
/// `corresponding_property` back-references; a property with both a getter
/// and a setter is still reported once. Properties nested inside classes are
/// excluded.
pub fn unit_properties(arena: &IrArena, unit: NodeId) -> Vec<NodeId> {
    collect_referenced(arena, unit, |id, node| match &node.kind {
        NodeKind::Property(_) if node.parent() == Some(unit) => Some(id),
        NodeKind::Function(f) => f.corresponding_property.and_then(|sym| {
            let prop = arena.resolve(sym);
            (prop.parent() == Some(unit)).then_some(sym.node())
        }),
        _ => None,
    })
}

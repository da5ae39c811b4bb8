//! Declaration synthesis
//!
//! Factory operations for the declarations lowering passes create, and the
//! per-unit deterministic name allocator they draw names from. Every
//! synthesized declaration is tagged `Origin::Synthesized` and carries no
//! source position; factories return detached nodes the caller attaches.

use rustc_hash::FxHashMap;

use crate::arena::{IrArena, NodeId};
use crate::node::{ConstructorDecl, FieldDecl, FunctionDecl, Node, NodeKind, Visibility};
use crate::ty::Ty;

/// Per-unit allocator for synthesized declaration names
///
/// Names are a pure function of (unit identity, claim order); the pipeline
/// creates one allocator per unit and hands it to every pass in fixed order,
/// so repeated builds of identical input produce byte-identical names and no
/// two passes can collide. The `$` separator cannot appear in a source
/// identifier, which makes synthesized names injective against source names
/// by construction.
#[derive(Debug, Clone)]
pub struct SyntheticNames {
    unit: String,
    claimed: FxHashMap<String, u32>,
}

impl SyntheticNames {
    /// Create the allocator for a unit
    pub fn for_unit(unit_name: &str) -> Self {
        Self {
            unit: unit_name.to_string(),
            claimed: FxHashMap::default(),
        }
    }

    /// The unit identity names are derived from
    pub fn unit_name(&self) -> &str {
        &self.unit
    }

    /// Claim the next name for a stem
    ///
    /// The first claim of a stem yields `stem$unit`; later claims of the
    /// same stem yield `stem$unit$1`, `stem$unit$2`, ...
    pub fn claim(&mut self, stem: &str) -> String {
        let count = self.claimed.entry(stem.to_string()).or_insert(0);
        let name = if *count == 0 {
            format!("{}${}", stem, self.unit)
        } else {
            format!("{}${}${}", stem, self.unit, count)
        };
        *count += 1;
        name
    }
}

/// Factory for synthesized declarations
pub struct DeclFactory;

impl DeclFactory {
    /// Create a detached synthesized field
    pub fn create_field(
        arena: &mut IrArena,
        name: impl Into<String>,
        ty: Ty,
        is_static: bool,
        visibility: Visibility,
    ) -> NodeId {
        arena.alloc(Node::synthesized(NodeKind::Field(FieldDecl {
            name: name.into(),
            ty,
            is_static,
            visibility,
            initializer: None,
        })))
    }

    /// Create a detached synthesized parameterless function with an empty body
    pub fn create_function(
        arena: &mut IrArena,
        name: impl Into<String>,
        return_ty: Ty,
    ) -> NodeId {
        arena.alloc(Node::synthesized(NodeKind::Function(FunctionDecl {
            name: name.into(),
            return_ty,
            params: Vec::new(),
            body: Vec::new(),
            corresponding_property: None,
            external_name: None,
        })))
    }

    /// Create a detached synthesized constructor with an empty body
    pub fn create_constructor(arena: &mut IrArena, visibility: Visibility) -> NodeId {
        arena.alloc(Node::synthesized(NodeKind::Constructor(ConstructorDecl {
            visibility,
            params: Vec::new(),
            body: Vec::new(),
        })))
    }

    /// Private-convention backing-field name for a property
    pub fn backing_field_name(property_name: &str) -> String {
        format!("_{}", property_name)
    }
}

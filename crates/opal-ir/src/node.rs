//! Declaration nodes
//!
//! The closed set of declaration kinds the middle end operates on. Each node
//! carries provenance (source-written vs. synthesized) and an optional source
//! position; ownership bookkeeping lives on the node but is mutated only
//! through the arena's tree operations.

use crate::arena::{NodeId, Symbol};
use crate::expr::{Expr, Stmt};
use crate::ty::Ty;

/// Byte range in the unit's source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Where a declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Written in source
    Source,
    /// Created by a lowering pass
    Synthesized,
}

/// Declaration visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

/// Property modifier flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyFlags {
    /// Value is provided by a delegate object; no lowering-relevant backing
    /// field exists
    pub is_delegated: bool,
    /// Compile-time constant; the initializer is side-effect-free and never
    /// deferred
    pub is_const: bool,
}

/// Compilation unit root
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDecl {
    pub name: String,
}

/// Class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    /// Supertype reference; `None` means the implicit root supertype
    pub supertype: Option<Symbol>,
}

/// Property declaration bundling storage and accessors
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub flags: PropertyFlags,
    /// Storage slot implementing the property's value, if any
    pub backing_field: Option<Symbol>,
    pub getter: Option<Symbol>,
    pub setter: Option<Symbol>,
}

/// Typed storage slot
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Ty,
    /// Unit-scoped (static) rather than instance-scoped
    pub is_static: bool,
    pub visibility: Visibility,
    /// Expression evaluated once to produce the initial value; fields
    /// without one start at the target's zero value for their type
    pub initializer: Option<Expr>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

/// Executable declaration with a statement body
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_ty: Ty,
    pub params: Vec<Param>,
    /// Ordered statement sequence; empty for abstract accessors
    pub body: Vec<Stmt>,
    /// Back-reference to the property this function is an accessor of
    pub corresponding_property: Option<Symbol>,
    /// Externally visible name under target-runtime mangling, when it
    /// differs from the declared name
    pub external_name: Option<String>,
}

/// Constructor declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub visibility: Visibility,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// The closed set of declaration kinds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Unit(UnitDecl),
    Class(ClassDecl),
    Property(PropertyDecl),
    Field(FieldDecl),
    Function(FunctionDecl),
    Constructor(ConstructorDecl),
}

/// A declaration in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub origin: Origin,
    pub span: Option<Span>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Create a source-written declaration
    pub fn source(kind: NodeKind) -> Self {
        Self {
            kind,
            origin: Origin::Source,
            span: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a compiler-synthesized declaration
    pub fn synthesized(kind: NodeKind) -> Self {
        Self {
            origin: Origin::Synthesized,
            ..Self::source(kind)
        }
    }

    /// Attach a source position
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_synthesized(&self) -> bool {
        self.origin == Origin::Synthesized
    }

    /// The declared name, for kinds that have one
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Unit(u) => Some(&u.name),
            NodeKind::Class(c) => Some(&c.name),
            NodeKind::Property(p) => Some(&p.name),
            NodeKind::Field(f) => Some(&f.name),
            NodeKind::Function(f) => Some(&f.name),
            NodeKind::Constructor(_) => None,
        }
    }

    /// Short kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Unit(_) => "unit",
            NodeKind::Class(_) => "class",
            NodeKind::Property(_) => "property",
            NodeKind::Field(_) => "field",
            NodeKind::Function(_) => "function",
            NodeKind::Constructor(_) => "constructor",
        }
    }

    pub fn as_unit(&self) -> Option<&UnitDecl> {
        match &self.kind {
            NodeKind::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            NodeKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyDecl> {
        match &self.kind {
            NodeKind::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut PropertyDecl> {
        match &mut self.kind {
            NodeKind::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDecl> {
        match &self.kind {
            NodeKind::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut FieldDecl> {
        match &mut self.kind {
            NodeKind::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            NodeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionDecl> {
        match &mut self.kind {
            NodeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_constructor(&self) -> Option<&ConstructorDecl> {
        match &self.kind {
            NodeKind::Constructor(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_constructor_mut(&mut self) -> Option<&mut ConstructorDecl> {
        match &mut self.kind {
            NodeKind::Constructor(c) => Some(c),
            _ => None,
        }
    }
}

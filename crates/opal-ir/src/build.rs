//! Unit construction helper
//!
//! Builds the declaration shapes the frontend hands to lowering: unit-level
//! properties wired to their backing fields and accessors, classes with
//! abstract properties. Used by integration points and heavily by tests.

use crate::arena::{IrArena, NodeId, Symbol};
use crate::expr::{Expr, Stmt};
use crate::node::{
    ClassDecl, FieldDecl, FunctionDecl, Node, NodeKind, PropertyDecl, PropertyFlags, UnitDecl,
    Visibility,
};
use crate::ty::Ty;

/// Helper for building compilation unit trees
pub struct UnitBuilder {
    arena: IrArena,
    unit: NodeId,
}

impl UnitBuilder {
    pub fn new(name: &str) -> Self {
        let mut arena = IrArena::new();
        let unit = arena.alloc(Node::source(NodeKind::Unit(UnitDecl {
            name: name.to_string(),
        })));
        Self { arena, unit }
    }

    pub fn unit(&self) -> NodeId {
        self.unit
    }

    pub fn arena(&self) -> &IrArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut IrArena {
        &mut self.arena
    }

    /// Add a unit-level property with a backing field and a getter
    pub fn add_property(&mut self, name: &str, ty: Ty, initializer: Option<Expr>) -> NodeId {
        self.add_property_flagged(name, ty, initializer, PropertyFlags::default())
    }

    /// Add a unit-level property with explicit modifier flags
    pub fn add_property_flagged(
        &mut self,
        name: &str,
        ty: Ty,
        initializer: Option<Expr>,
        flags: PropertyFlags,
    ) -> NodeId {
        let prop = self.arena.alloc(Node::source(NodeKind::Property(PropertyDecl {
            name: name.to_string(),
            flags,
            backing_field: None,
            getter: None,
            setter: None,
        })));
        self.arena.attach(prop, self.unit);

        let field = self.arena.alloc(Node::source(NodeKind::Field(FieldDecl {
            name: name.to_string(),
            ty: ty.clone(),
            is_static: true,
            visibility: Visibility::Private,
            initializer,
        })));
        self.arena.attach(field, prop);

        let getter = self.arena.alloc(Node::source(NodeKind::Function(FunctionDecl {
            name: format!("<get-{}>", name),
            return_ty: ty,
            params: Vec::new(),
            body: vec![Stmt::Return(Some(Expr::get_static_field(Symbol::new(field))))],
            corresponding_property: Some(Symbol::new(prop)),
            external_name: None,
        })));
        self.arena.attach(getter, prop);

        let decl = self
            .arena
            .get_mut(prop)
            .as_property_mut()
            .expect("just allocated a property");
        decl.backing_field = Some(Symbol::new(field));
        decl.getter = Some(Symbol::new(getter));
        prop
    }

    /// Add a setter accessor to an existing property
    pub fn add_setter(&mut self, prop: NodeId) -> NodeId {
        let name = self
            .arena
            .get(prop)
            .as_property()
            .expect("setter target must be a property")
            .name
            .clone();
        let setter = self.arena.alloc(Node::source(NodeKind::Function(FunctionDecl {
            name: format!("<set-{}>", name),
            return_ty: Ty::Unit,
            params: Vec::new(),
            body: Vec::new(),
            corresponding_property: Some(Symbol::new(prop)),
            external_name: None,
        })));
        self.arena.attach(setter, prop);
        self.arena
            .get_mut(prop)
            .as_property_mut()
            .expect("setter target must be a property")
            .setter = Some(Symbol::new(setter));
        setter
    }

    /// Add a bare unit-level field (no owning property)
    pub fn add_field(&mut self, name: &str, ty: Ty, initializer: Option<Expr>) -> NodeId {
        let field = self.arena.alloc(Node::source(NodeKind::Field(FieldDecl {
            name: name.to_string(),
            ty,
            is_static: true,
            visibility: Visibility::Private,
            initializer,
        })));
        self.arena.attach(field, self.unit);
        field
    }

    /// Add a class to the unit
    pub fn add_class(&mut self, name: &str, supertype: Option<Symbol>) -> NodeId {
        let class = self.arena.alloc(Node::source(NodeKind::Class(ClassDecl {
            name: name.to_string(),
            supertype,
        })));
        self.arena.attach(class, self.unit);
        class
    }

    /// Add an abstract property to a class: a getter but no backing field
    pub fn add_abstract_property(&mut self, class: NodeId, name: &str, ty: Ty) -> NodeId {
        let prop = self.arena.alloc(Node::source(NodeKind::Property(PropertyDecl {
            name: name.to_string(),
            flags: PropertyFlags::default(),
            backing_field: None,
            getter: None,
            setter: None,
        })));
        self.arena.attach(prop, class);

        let getter = self.arena.alloc(Node::source(NodeKind::Function(FunctionDecl {
            name: format!("<get-{}>", name),
            return_ty: ty,
            params: Vec::new(),
            body: Vec::new(),
            corresponding_property: Some(Symbol::new(prop)),
            external_name: None,
        })));
        self.arena.attach(getter, prop);
        self.arena
            .get_mut(prop)
            .as_property_mut()
            .expect("just allocated a property")
            .getter = Some(Symbol::new(getter));
        prop
    }

    pub fn finish(self) -> (IrArena, NodeId) {
        (self.arena, self.unit)
    }
}

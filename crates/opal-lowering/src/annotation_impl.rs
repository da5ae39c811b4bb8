//! Annotation-implementation synthesis
//!
//! An annotation-like class declares only abstract properties; targets that
//! need a runtime-representable value get a concrete implementation
//! synthesized here: a private backing field per property, getters rewritten
//! to read them, and a public positional constructor that stores its
//! parameters into the fields after delegating to the supertype constructor.
//!
//! Which classes need this is decided by an external oracle; this pass only
//! consumes the classification.
//!
//! Properties typed as a reflective class reference (or an array of one) are
//! unsupported: the synthesized getter's signature would collide with the
//! runtime's own representation under target mangling. The whole class is
//! skipped with a diagnostic, because a constructor missing one positional
//! parameter would silently shift every caller's arguments.

use opal_ir::search;
use opal_ir::{
    DeclFactory, Expr, IrArena, IrError, NodeId, NodeKind, Origin, Param, Stmt, Symbol,
    SyntheticNames, Ty, Visibility,
};

use crate::{LowerDiagnostic, LowerResult, UnitLoweringPass};

/// Decides which classes require a synthesized runtime implementation
pub trait AnnotationOracle {
    fn requires_implementation(&self, arena: &IrArena, class: NodeId) -> bool;
}

impl<F> AnnotationOracle for F
where
    F: Fn(&IrArena, NodeId) -> bool,
{
    fn requires_implementation(&self, arena: &IrArena, class: NodeId) -> bool {
        self(arena, class)
    }
}

/// Per-property synthesis plan, fixed before any mutation
struct PropertyPlan {
    prop: NodeId,
    name: String,
    getter: Symbol,
    ty: Ty,
}

/// Per-class synthesis plan
struct ClassPlan {
    class: NodeId,
    supertype: Option<Symbol>,
    properties: Vec<PropertyPlan>,
}

pub struct AnnotationImplLowering<O> {
    oracle: O,
    diagnostics: Vec<LowerDiagnostic>,
}

impl<O: AnnotationOracle> AnnotationImplLowering<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            diagnostics: Vec::new(),
        }
    }

    /// Findings recovered from so far
    pub fn diagnostics(&self) -> &[LowerDiagnostic] {
        &self.diagnostics
    }

    /// Drain the recorded findings
    pub fn take_diagnostics(&mut self) -> Vec<LowerDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Validate a class and fix its synthesis plan; read-only
    ///
    /// Returns `None` when the class needs no work: no properties, already
    /// lowered (a backing field exists), or skipped with a diagnostic.
    fn plan_class(&mut self, arena: &IrArena, class_id: NodeId) -> LowerResult<Option<ClassPlan>> {
        let mut prop_ids = Vec::new();
        for &child in arena.children(class_id) {
            if arena.get(child).as_property().is_some() {
                prop_ids.push(child);
            }
        }
        if prop_ids.is_empty() {
            return Ok(None);
        }
        // Synthesis is keyed off abstract properties; any backing field
        // means a previous run already produced the implementation.
        if prop_ids
            .iter()
            .any(|&p| arena.get(p).as_property().unwrap().backing_field.is_some())
        {
            return Ok(None);
        }

        let mut properties = Vec::with_capacity(prop_ids.len());
        for prop_id in prop_ids {
            let node = arena.get(prop_id);
            let prop = node.as_property().unwrap();
            let getter = prop.getter.ok_or_else(|| IrError::MissingAccessor {
                property: prop.name.clone(),
            })?;
            let ty = arena
                .resolve(getter)
                .as_function()
                .expect("getter symbol must refer to a function")
                .return_ty
                .clone();
            if ty.is_reflective() {
                let class = arena
                    .get(class_id)
                    .name()
                    .unwrap_or("<class>")
                    .to_string();
                self.diagnostics
                    .push(LowerDiagnostic::UnsupportedReflectiveProperty {
                        class,
                        property: prop.name.clone(),
                        span: node.span,
                    });
                return Ok(None);
            }
            properties.push(PropertyPlan {
                prop: prop_id,
                name: prop.name.clone(),
                getter,
                ty,
            });
        }

        let supertype = arena
            .get(class_id)
            .as_class()
            .expect("plan target must be a class")
            .supertype;
        Ok(Some(ClassPlan {
            class: class_id,
            supertype,
            properties,
        }))
    }

    /// Apply a fixed plan to the tree
    fn apply_plan(&mut self, arena: &mut IrArena, plan: ClassPlan) {
        let ctor = DeclFactory::create_constructor(arena, Visibility::Public);
        let mut params = Vec::with_capacity(plan.properties.len());
        let mut body = Vec::with_capacity(plan.properties.len() + 1);
        body.push(Stmt::DelegatingCall {
            target: plan.supertype,
        });

        for (index, prop) in plan.properties.into_iter().enumerate() {
            let field = DeclFactory::create_field(
                arena,
                DeclFactory::backing_field_name(&prop.name),
                prop.ty.clone(),
                false,
                Visibility::Private,
            );
            let field_sym = Symbol::new(field);
            arena.attach(field, prop.prop);
            arena
                .get_mut(prop.prop)
                .as_property_mut()
                .expect("plan holds property handles")
                .backing_field = Some(field_sym);

            let getter = arena.resolve_mut(prop.getter);
            getter.origin = Origin::Synthesized;
            let getter_decl = getter
                .as_function_mut()
                .expect("getter symbol must refer to a function");
            getter_decl.body = vec![Stmt::Return(Some(Expr::GetField {
                field: field_sym,
                receiver: Some(Box::new(Expr::This)),
            }))];
            // The explicit backing field changes the accessor's automatic
            // external name under target mangling; record the original so
            // callers keep seeing the property's declared name.
            getter_decl.external_name = Some(prop.name.clone());

            params.push(Param {
                name: prop.name,
                ty: prop.ty,
            });
            body.push(Stmt::SetField {
                field: field_sym,
                receiver: Some(Expr::This),
                value: Expr::GetParam {
                    index: index as u16,
                },
            });
        }

        let ctor_decl = arena
            .get_mut(ctor)
            .as_constructor_mut()
            .expect("just created a constructor");
        ctor_decl.params = params;
        ctor_decl.body = body;
        arena.attach(ctor, plan.class);
    }
}

impl<O: AnnotationOracle> UnitLoweringPass for AnnotationImplLowering<O> {
    fn name(&self) -> &'static str {
        "annotation-impl-synthesis"
    }

    fn lower_unit(
        &mut self,
        arena: &mut IrArena,
        unit: NodeId,
        _names: &mut SyntheticNames,
    ) -> LowerResult<()> {
        let classes = search::collect_declarations(arena, unit, |_, node| {
            matches!(node.kind, NodeKind::Class(_))
        });

        // Plan every selected class before mutating anything, so a
        // precondition failure in one class leaves the whole unit untouched.
        let mut plans = Vec::new();
        for class_id in classes {
            if !self.oracle.requires_implementation(arena, class_id) {
                continue;
            }
            if let Some(plan) = self.plan_class(arena, class_id)? {
                plans.push(plan);
            }
        }
        for plan in plans {
            self.apply_plan(arena, plan);
        }
        Ok(())
    }
}

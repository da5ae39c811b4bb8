//! Deferred property initialization
//!
//! Rewrites eager unit-level property initializers into one guarded,
//! synthesized initializer function. Selected fields lose their initializer
//! expressions; the expressions move, in declaration order, into the body of
//! a function that runs them at most once behind a boolean guard field.
//!
//! The guard flips to `true` before the first assignment runs: an
//! initializer that transitively reads a property of this unit re-enters the
//! generated function, sees the guard already set, and falls through instead
//! of recursing forever. A re-entrant read observing a not-yet-assigned
//! property's zero value is accepted source semantics.

use opal_ir::search;
use opal_ir::{
    Const, DeclFactory, Expr, IrArena, IrError, NodeId, NodeKind, Stmt, Symbol, SyntheticNames,
    Ty, Visibility,
};

use crate::{LowerResult, UnitLoweringPass};

/// Stem for the synthesized guard field name
const GUARD_STEM: &str = "properties_initialized";
/// Stem for the synthesized initializer function name
const INIT_FN_STEM: &str = "init_properties";

pub struct DeferredInitLowering;

impl DeferredInitLowering {
    pub fn new() -> Self {
        Self
    }

    /// Select the backing fields to defer, in declaration order
    ///
    /// Read-only. Eligible: a non-delegated, non-const property declared
    /// directly in the unit whose backing field carries an initializer.
    fn collect_eligible_fields(
        &self,
        arena: &IrArena,
        unit: NodeId,
    ) -> LowerResult<Vec<Symbol>> {
        // A unit-level field carrying an initializer without an owning
        // property violates the frontend's output contract.
        for &child in arena.children(unit) {
            if let NodeKind::Field(field) = &arena.get(child).kind {
                if field.initializer.is_some() {
                    return Err(IrError::OrphanedInitializer {
                        field: field.name.clone(),
                    }
                    .into());
                }
            }
        }

        let mut selected = Vec::new();
        for prop_id in search::unit_properties(arena, unit) {
            let prop = arena
                .get(prop_id)
                .as_property()
                .expect("property search returned a non-property");
            if prop.flags.is_delegated || prop.flags.is_const {
                continue;
            }
            let Some(field_sym) = prop.backing_field else {
                continue;
            };
            let field = arena
                .resolve(field_sym)
                .as_field()
                .expect("backing field symbol must refer to a field");
            if field.initializer.is_none() {
                continue;
            }
            selected.push(field_sym);
        }
        Ok(selected)
    }
}

impl Default for DeferredInitLowering {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitLoweringPass for DeferredInitLowering {
    fn name(&self) -> &'static str {
        "deferred-property-init"
    }

    fn lower_unit(
        &mut self,
        arena: &mut IrArena,
        unit: NodeId,
        names: &mut SyntheticNames,
    ) -> LowerResult<()> {
        let selected = self.collect_eligible_fields(arena, unit)?;
        if selected.is_empty() {
            return Ok(());
        }

        // The guard has no initializer expression of its own: static boolean
        // storage starts at the target's zero value, and a synthesized
        // initializer here would re-trigger this pass on the next run.
        let guard = DeclFactory::create_field(
            arena,
            names.claim(GUARD_STEM),
            Ty::Bool,
            true,
            Visibility::Private,
        );
        let guard_sym = Symbol::new(guard);

        let mut then_branch = Vec::with_capacity(selected.len() + 1);
        then_branch.push(Stmt::SetField {
            field: guard_sym,
            receiver: None,
            value: Expr::Const(Const::Bool(true)),
        });
        for field_sym in selected {
            let field = arena
                .resolve_mut(field_sym)
                .as_field_mut()
                .expect("backing field symbol must refer to a field");
            let init = field
                .initializer
                .take()
                .expect("selected field lost its initializer");
            then_branch.push(Stmt::SetField {
                field: field_sym,
                receiver: None,
                value: init,
            });
        }

        let init_fn = DeclFactory::create_function(arena, names.claim(INIT_FN_STEM), Ty::Unit);
        arena
            .get_mut(init_fn)
            .as_function_mut()
            .expect("just created a function")
            .body = vec![Stmt::If {
            cond: Expr::not(Expr::get_static_field(guard_sym)),
            then_branch,
        }];

        arena.attach(guard, unit);
        arena.attach(init_fn, unit);
        Ok(())
    }
}

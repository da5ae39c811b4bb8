//! Opal Lowering - Middle-End Lowering Passes
//!
//! Structural rewrites between type checking and code generation: eager
//! unit-level property initializers become one guarded initializer function,
//! and annotation-like classes gain a concrete runtime implementation.
//! Passes mutate the unit tree in place and synthesize declarations through
//! the shared per-unit name allocator.

pub mod annotation_impl;
pub mod deferred_init;
mod diagnostic;
mod error;

pub use annotation_impl::{AnnotationImplLowering, AnnotationOracle};
pub use deferred_init::DeferredInitLowering;
pub use diagnostic::LowerDiagnostic;
pub use error::{LowerError, LowerResult};

use opal_ir::{IrArena, NodeId, SyntheticNames};

/// A lowering pass invoked once per compilation unit
///
/// Invoked strictly after resolution and type checking are final and
/// strictly before code generation. Each pass validates its preconditions
/// during a read-only collection phase before the first mutation, so an
/// `Err` leaves the unit's tree untouched.
pub trait UnitLoweringPass {
    /// Stable pass name for reporting
    fn name(&self) -> &'static str;

    /// Rewrite the unit's tree in place
    fn lower_unit(
        &mut self,
        arena: &mut IrArena,
        unit: NodeId,
        names: &mut SyntheticNames,
    ) -> LowerResult<()>;
}

/// Runs registered passes over units in a fixed total order
///
/// Registration order is execution order. All passes over a unit share one
/// `SyntheticNames` allocator, so synthesized names cannot collide across
/// passes. The first pass error aborts that unit; other units are
/// unaffected.
pub struct LoweringPipeline {
    passes: Vec<Box<dyn UnitLoweringPass>>,
    stats: PipelineStats,
}

/// Per-pipeline unit counts
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineStats {
    /// Units every registered pass completed on
    pub units_lowered: usize,
    /// Units abandoned after a pass error
    pub units_skipped: usize,
}

impl LoweringPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Append a pass to the fixed execution order
    pub fn register(&mut self, pass: Box<dyn UnitLoweringPass>) -> &mut Self {
        self.passes.push(pass);
        self
    }

    /// Run every registered pass over one unit
    pub fn run_unit(&mut self, arena: &mut IrArena, unit: NodeId) -> LowerResult<()> {
        let unit_name = arena
            .get(unit)
            .as_unit()
            .expect("pipeline root must be a unit")
            .name
            .clone();
        let mut names = SyntheticNames::for_unit(&unit_name);
        for pass in &mut self.passes {
            if let Err(err) = pass.lower_unit(arena, unit, &mut names) {
                self.stats.units_skipped += 1;
                return Err(err);
            }
        }
        self.stats.units_lowered += 1;
        Ok(())
    }

    /// Unit counts accumulated so far
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}

impl Default for LoweringPipeline {
    fn default() -> Self {
        Self::new()
    }
}

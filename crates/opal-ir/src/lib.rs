//! Opal IR - Tree Model for the Middle End
//!
//! This crate defines the declaration tree lowering passes operate on: an
//! arena of declarations addressed by stable handles, non-owning `Symbol`
//! references, read-only search, and factories for synthesized declarations.

pub mod arena;
pub mod build;
pub mod diag;
pub mod error;
pub mod expr;
pub mod node;
pub mod pretty;
pub mod search;
pub mod synth;
pub mod ty;

pub use arena::{IrArena, NodeId, Symbol};
pub use build::UnitBuilder;
pub use diag::{Diagnostic, ErrorCode};
pub use error::{IrError, IrResult};
pub use expr::{BinOp, Const, Expr, Stmt};
pub use node::{
    ClassDecl, ConstructorDecl, FieldDecl, FunctionDecl, Node, NodeKind, Origin, Param,
    PropertyDecl, PropertyFlags, Span, UnitDecl, Visibility,
};
pub use synth::{DeclFactory, SyntheticNames};
pub use ty::Ty;

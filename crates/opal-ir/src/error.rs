//! Tree consistency errors

use thiserror::Error;

pub type IrResult<T> = Result<T, IrError>;

/// Malformed-input findings a pass reports before mutating anything
///
/// These describe trees that violate the frontend's output contract. Misuse
/// of the tree model itself (stale symbol resolve, attach of an owned node)
/// is a programming error and panics instead.
#[derive(Debug, Error)]
pub enum IrError {
    #[error("internal consistency error: field '{field}' carries an initializer but has no owning property")]
    OrphanedInitializer { field: String },

    #[error("internal consistency error: property '{property}' has no getter")]
    MissingAccessor { property: String },

    #[error("internal consistency error: {message}")]
    MalformedTree { message: String },
}

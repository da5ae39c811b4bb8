//! Lowering errors

use opal_ir::IrError;
use thiserror::Error;

pub type LowerResult<T> = Result<T, LowerError>;

#[derive(Debug, Error)]
pub enum LowerError {
    #[error(transparent)]
    Ir(#[from] IrError),

    #[error("internal lowering error: {message}")]
    Internal { message: String },
}

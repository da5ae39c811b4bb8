//! Recoverable lowering findings
//!
//! Unsupported constructs skip the affected declaration and report through
//! the diagnostic channel; the rest of the unit keeps compiling.

use opal_ir::diag::{Diagnostic, ErrorCode};
use opal_ir::Span;

/// A finding lowering recovered from
#[derive(Debug, Clone, PartialEq)]
pub enum LowerDiagnostic {
    /// Annotation-implementation synthesis met a property typed as a
    /// reflective class reference (or an array of one)
    UnsupportedReflectiveProperty {
        class: String,
        property: String,
        span: Option<Span>,
    },
}

impl LowerDiagnostic {
    /// The finding's message
    pub fn message(&self) -> String {
        match self {
            Self::UnsupportedReflectiveProperty {
                class, property, ..
            } => format!(
                "cannot synthesize an implementation for annotation class '{}': \
                 property '{}' is typed as a reflective class reference",
                class, property
            ),
        }
    }

    /// Convert to a renderable diagnostic
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic {
        match self {
            Self::UnsupportedReflectiveProperty { property, span, .. } => {
                let mut diag = Diagnostic::warning(self.message())
                    .with_code(ErrorCode("L0401"))
                    .with_note(
                        "reflective class references cannot be represented in a \
                         synthesized implementation; the class is left abstract",
                    );
                if let Some(span) = span {
                    diag = diag.with_primary_label(
                        file_id,
                        *span,
                        format!("property '{}' declared here", property),
                    );
                }
                diag
            }
        }
    }
}

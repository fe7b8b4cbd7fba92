use miette::Diagnostic;
use thiserror::Error;

/// Result type for analysis and lowering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error types for the switch lowering core
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Code {operation} is not implemented for {kind} constants")]
    #[diagnostic(code(jswitch::not_implemented_for_kind))]
    NotImplementedForKind {
        kind: &'static str,
        operation: &'static str,
    },

    #[error("Code emission failed: {message}")]
    #[diagnostic(code(jswitch::emit_error))]
    Emit { message: String },
}

impl Error {
    /// Create a coercion fault for a (kind, accessor) pair with no conversion
    pub fn not_implemented(kind: &'static str, operation: &'static str) -> Self {
        Error::NotImplementedForKind { kind, operation }
    }

    /// Create an emission failure
    pub fn emit(message: impl Into<String>) -> Self {
        Error::Emit {
            message: message.into(),
        }
    }
}

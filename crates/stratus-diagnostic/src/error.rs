//! Error types for the diagnostic lifecycle and factory.

use std::error::Error;
use std::fmt;

use stratus_core::ParameterError;
use stratus_exec::ExecError;
use stratus_field::FieldError;
use stratus_grid::GridError;

use crate::diagnostic::DiagnosticState;

/// Contract violations and failures from diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticError {
    /// The field is not among the diagnostic's declared inputs.
    UnexpectedField {
        /// Diagnostic name.
        diagnostic: String,
        /// Offending field.
        field: String,
    },
    /// The field is already registered as an input and cannot also be
    /// the output.
    RoleConflict {
        /// Diagnostic name.
        diagnostic: String,
        /// Offending field.
        field: String,
    },
    /// A declared input was never supplied.
    MissingRequiredField {
        /// Diagnostic name.
        diagnostic: String,
        /// The missing field.
        field: String,
    },
    /// The operation needs an initialized diagnostic.
    NotInitialized {
        /// Diagnostic name.
        diagnostic: String,
    },
    /// The diagnostic has been finalized.
    AlreadyFinalized {
        /// Diagnostic name.
        diagnostic: String,
    },
    /// No constructor is registered under the name.
    UnknownDiagnostic {
        /// The requested name.
        name: String,
        /// Registered names.
        available: Vec<String>,
    },
    /// The operation needs `set_grids` to have been called.
    GridsNotSet {
        /// Diagnostic name.
        diagnostic: String,
    },
    /// The operation is not valid in the current state.
    InvalidTransition {
        /// Diagnostic name.
        diagnostic: String,
        /// Current state.
        from: DiagnosticState,
        /// The attempted operation.
        operation: &'static str,
    },
    /// A field operation failed.
    Field(FieldError),
    /// A grid lookup failed.
    Grid(GridError),
    /// Construction parameters were missing or malformed.
    Parameter(ParameterError),
    /// A kernel launch failed.
    Exec(ExecError),
    /// The kernel reported a failure.
    ComputeFailed {
        /// Diagnostic name.
        diagnostic: String,
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedField { diagnostic, field } => {
                write!(f, "diagnostic '{diagnostic}' does not expect field '{field}'")
            }
            Self::RoleConflict { diagnostic, field } => write!(
                f,
                "diagnostic '{diagnostic}': field '{field}' is a required input and cannot be computed"
            ),
            Self::MissingRequiredField { diagnostic, field } => {
                write!(f, "diagnostic '{diagnostic}' is missing required field '{field}'")
            }
            Self::NotInitialized { diagnostic } => {
                write!(f, "diagnostic '{diagnostic}' is not initialized")
            }
            Self::AlreadyFinalized { diagnostic } => {
                write!(f, "diagnostic '{diagnostic}' is already finalized")
            }
            Self::UnknownDiagnostic { name, available } => {
                write!(f, "unknown diagnostic '{name}' (registered: {available:?})")
            }
            Self::GridsNotSet { diagnostic } => {
                write!(f, "diagnostic '{diagnostic}' has no grid; call set_grids first")
            }
            Self::InvalidTransition {
                diagnostic,
                from,
                operation,
            } => write!(f, "diagnostic '{diagnostic}': cannot {operation} while {from}"),
            Self::Field(e) => write!(f, "field error: {e}"),
            Self::Grid(e) => write!(f, "grid error: {e}"),
            Self::Parameter(e) => write!(f, "parameter error: {e}"),
            Self::Exec(e) => write!(f, "execution error: {e}"),
            Self::ComputeFailed { diagnostic, reason } => {
                write!(f, "diagnostic '{diagnostic}' failed: {reason}")
            }
        }
    }
}

impl Error for DiagnosticError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Parameter(e) => Some(e),
            Self::Exec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for DiagnosticError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<GridError> for DiagnosticError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ParameterError> for DiagnosticError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

impl From<ExecError> for DiagnosticError {
    fn from(e: ExecError) -> Self {
        Self::Exec(e)
    }
}

//! The [`Diagnostic`] trait and its lifecycle states.

use std::fmt;

use stratus_core::{RunType, TimeStamp};
use stratus_field::Field;
use stratus_grid::GridsManager;

use crate::error::DiagnosticError;
use crate::request::FieldRequest;

/// Lifecycle position of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticState {
    /// Built by the factory; no grid yet.
    Constructed,
    /// Grid bound; inputs may be supplied.
    GridBound,
    /// Output allocated; ready to compute.
    Initialized,
    /// At least one compute has run.
    Computed,
    /// Resources released; terminal.
    Finalized,
}

impl fmt::Display for DiagnosticState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Constructed => "constructed",
            Self::GridBound => "grid-bound",
            Self::Initialized => "initialized",
            Self::Computed => "computed",
            Self::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

/// A plugin that computes one derived field from declared inputs.
///
/// # Contract
///
/// - `set_grids` precedes `get_required_field_requests`, since the
///   requested layouts depend on grid extents.
/// - Every required request must be satisfied through
///   `set_required_field` before `initialize`.
/// - `compute_diagnostic` is idempotent given unchanged inputs.
/// - The output field is owned by the diagnostic; callers only ever see
///   read-only handles from `get_diagnostic`.
///
/// # Object safety
///
/// The driver stores diagnostics as `Box<dyn Diagnostic>`.
pub trait Diagnostic: Send {
    /// Name used for registration and error reporting.
    fn name(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> DiagnosticState;

    /// Bind to a grid from `grids`. `Constructed → GridBound`.
    fn set_grids(&mut self, grids: &dyn GridsManager) -> Result<(), DiagnosticError>;

    /// Inputs the diagnostic needs. Available once grid-bound.
    fn get_required_field_requests(&self) -> Result<&[FieldRequest], DiagnosticError>;

    /// Supply an input. The diagnostic keeps a read-only handle.
    fn set_required_field(&mut self, field: Field) -> Result<(), DiagnosticError>;

    /// Supply a field for the diagnostic to write. Diagnostics own their
    /// output, so this always fails; see [`DiagnosticError::RoleConflict`]
    /// and [`DiagnosticError::UnexpectedField`].
    fn set_computed_field(&mut self, field: Field) -> Result<(), DiagnosticError>;

    /// Allocate the output and check inputs. `GridBound → Initialized`.
    fn initialize(&mut self, t0: TimeStamp, run_type: RunType) -> Result<(), DiagnosticError>;

    /// Recompute the output from the current inputs.
    fn compute_diagnostic(&mut self) -> Result<(), DiagnosticError>;

    /// Read-only handle to the output field.
    fn get_diagnostic(&self) -> Result<Field, DiagnosticError>;

    /// Release the output and inputs. Terminal.
    fn finalize(&mut self) -> Result<(), DiagnosticError>;
}

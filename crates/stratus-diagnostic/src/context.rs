//! Execution context passed to kernels during compute.

use indexmap::IndexMap;
use stratus_core::TimeStamp;
use stratus_exec::ExecSpace;
use stratus_field::Field;
use stratus_grid::Grid;

use crate::error::DiagnosticError;

/// What a [`DiagnosticKernel`](crate::DiagnosticKernel) sees while
/// computing: read-only inputs by name, the writable output, the bound
/// grid and the execution space.
pub struct ComputeContext<'a> {
    diagnostic: &'a str,
    inputs: &'a IndexMap<String, Field>,
    output: &'a Field,
    grid: &'a dyn Grid,
    exec: &'a ExecSpace,
    t0: TimeStamp,
}

impl<'a> ComputeContext<'a> {
    /// Assemble a context.
    ///
    /// Normally built by [`KernelDiagnostic`](crate::KernelDiagnostic);
    /// public so kernels can be driven directly in tests.
    pub fn new(
        diagnostic: &'a str,
        inputs: &'a IndexMap<String, Field>,
        output: &'a Field,
        grid: &'a dyn Grid,
        exec: &'a ExecSpace,
        t0: TimeStamp,
    ) -> Self {
        Self {
            diagnostic,
            inputs,
            output,
            grid,
            exec,
            t0,
        }
    }

    /// A supplied input by field name.
    pub fn input(&self, name: &str) -> Result<&'a Field, DiagnosticError> {
        self.inputs
            .get(name)
            .ok_or_else(|| DiagnosticError::MissingRequiredField {
                diagnostic: self.diagnostic.to_string(),
                field: name.to_string(),
            })
    }

    /// All supplied inputs, in supply order.
    pub fn inputs(&self) -> impl Iterator<Item = &'a Field> {
        self.inputs.values()
    }

    /// The output field (writable).
    pub fn output(&self) -> &'a Field {
        self.output
    }

    /// The bound grid.
    pub fn grid(&self) -> &'a dyn Grid {
        self.grid
    }

    /// The execution space kernels launch on.
    pub fn exec(&self) -> &'a ExecSpace {
        self.exec
    }

    /// Time passed to `initialize`.
    pub fn start_time(&self) -> TimeStamp {
        self.t0
    }

    /// A [`DiagnosticError::ComputeFailed`] for this diagnostic.
    pub fn failure(&self, reason: impl Into<String>) -> DiagnosticError {
        DiagnosticError::ComputeFailed {
            diagnostic: self.diagnostic.to_string(),
            reason: reason.into(),
        }
    }
}

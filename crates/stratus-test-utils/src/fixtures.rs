//! Fixture diagnostics for framework tests.
//!
//! - [`ConstDiagnostic`]: writes a constant, reads nothing.
//! - [`IdentityDiagnostic`]: copies one input into its output.
//! - [`FailingDiagnostic`]: fails deterministically after N computes.
//!
//! All use the `<COL,LEV>` midpoint layout of the bound grid.

use std::sync::atomic::{AtomicUsize, Ordering};

use stratus_core::{Communicator, FieldIdentifier, ParameterList, Real, Units};
use stratus_diagnostic::{
    create_kernel_diagnostic, ComputeContext, DiagnosticError, DiagnosticFactory,
    DiagnosticKernel, FieldRequest,
};
use stratus_field::Device;
use stratus_grid::{Grid, LayoutKind};

fn midpoint_identifier(
    grid: &dyn Grid,
    name: &str,
    units: Units,
) -> Result<FieldIdentifier, DiagnosticError> {
    let layout = grid.layout(LayoutKind::Scalar3DMid)?;
    Ok(FieldIdentifier::new(name, layout, units, grid.name()))
}

fn bound(
    output: &Option<FieldIdentifier>,
    diagnostic: &str,
) -> Result<FieldIdentifier, DiagnosticError> {
    output.clone().ok_or_else(|| DiagnosticError::GridsNotSet {
        diagnostic: diagnostic.to_string(),
    })
}

/// Writes `value` to every element (no inputs).
///
/// Parameters: `value` (real, default 0).
pub struct ConstDiagnostic {
    pub value: Real,
    output: Option<FieldIdentifier>,
}

impl ConstDiagnostic {
    pub const NAME: &'static str = "Const";

    pub fn new(value: Real) -> Self {
        Self {
            value,
            output: None,
        }
    }
}

impl DiagnosticKernel for ConstDiagnostic {
    fn from_params(_: &dyn Communicator, params: &ParameterList) -> Result<Self, DiagnosticError> {
        Ok(Self::new(params.get_or("value", 0.0)?))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
        self.output = Some(midpoint_identifier(grid, Self::NAME, Units::nondimensional())?);
        Ok(Vec::new())
    }

    fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
        bound(&self.output, Self::NAME)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
        ctx.output().deep_copy::<Real, Device>(self.value)?;
        Ok(())
    }
}

/// Copies input `input` into output `output`.
///
/// Parameters: `input` (string, default `"x"`), `output` (string,
/// default `"<input>_copy"`).
pub struct IdentityDiagnostic {
    pub input: String,
    pub output_name: String,
    fields: Option<(FieldIdentifier, FieldIdentifier)>,
}

impl IdentityDiagnostic {
    pub const NAME: &'static str = "Identity";

    pub fn new(input: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output_name: output_name.into(),
            fields: None,
        }
    }
}

impl DiagnosticKernel for IdentityDiagnostic {
    fn from_params(_: &dyn Communicator, params: &ParameterList) -> Result<Self, DiagnosticError> {
        let input = params.get_or("input", "x".to_string())?;
        let output = params.get_or("output", format!("{input}_copy"))?;
        Ok(Self::new(input, output))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
        let input = midpoint_identifier(grid, &self.input, Units::nondimensional())?;
        let output = midpoint_identifier(grid, &self.output_name, Units::nondimensional())?;
        self.fields = Some((input.clone(), output));
        Ok(vec![FieldRequest::required(input)])
    }

    fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
        bound(&self.fields.as_ref().map(|(_, out)| out.clone()), Self::NAME)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
        ctx.output().deep_copy_from(ctx.input(&self.input)?)?;
        Ok(())
    }
}

/// Succeeds `succeed_count` times, then fails every call.
///
/// A successful call fills the output with its call index. Parameters:
/// `succeed_count` (int, default 0).
pub struct FailingDiagnostic {
    pub succeed_count: usize,
    call_count: AtomicUsize,
    output: Option<FieldIdentifier>,
}

impl FailingDiagnostic {
    pub const NAME: &'static str = "Failing";

    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            call_count: AtomicUsize::new(0),
            output: None,
        }
    }

    /// How many times `compute` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl DiagnosticKernel for FailingDiagnostic {
    fn from_params(_: &dyn Communicator, params: &ParameterList) -> Result<Self, DiagnosticError> {
        let n = params.get_or("succeed_count", 0i64)?;
        Ok(Self::new(usize::try_from(n).unwrap_or(0)))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
        self.output = Some(midpoint_identifier(grid, Self::NAME, Units::nondimensional())?);
        Ok(Vec::new())
    }

    fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
        bound(&self.output, Self::NAME)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(ctx.failure(format!(
                "deliberate failure after {} successful calls",
                self.succeed_count
            )));
        }
        ctx.output().deep_copy::<Real, Device>(n as Real)?;
        Ok(())
    }
}

/// Register every fixture under its `NAME`.
pub fn register_fixtures(factory: &mut DiagnosticFactory) {
    factory.register(ConstDiagnostic::NAME, create_kernel_diagnostic::<ConstDiagnostic>);
    factory.register(
        IdentityDiagnostic::NAME,
        create_kernel_diagnostic::<IdentityDiagnostic>,
    );
    factory.register(
        FailingDiagnostic::NAME,
        create_kernel_diagnostic::<FailingDiagnostic>,
    );
}

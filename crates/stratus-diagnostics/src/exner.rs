//! Exner function of midpoint pressure.

use stratus_core::{Communicator, FieldIdentifier, ParameterList, Units};
use stratus_diagnostic::{ComputeContext, DiagnosticError, DiagnosticKernel, FieldRequest};
use stratus_grid::{Grid, LayoutKind};

use crate::columnwise::apply_columnwise;
use crate::constants::exner_function;

/// `Exner = (p_mid / P0)^(RAIR / CPAIR)`.
#[derive(Debug, Default)]
pub struct Exner {
    output: Option<FieldIdentifier>,
}

impl Exner {
    /// Registered name and output field name.
    pub const NAME: &'static str = "Exner";
}

impl DiagnosticKernel for Exner {
    fn from_params(_comm: &dyn Communicator, _params: &ParameterList) -> Result<Self, DiagnosticError> {
        Ok(Self::default())
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
        let layout = grid.layout(LayoutKind::Scalar3DMid)?;
        let p_mid = FieldIdentifier::new("p_mid", layout.clone(), Units::pascal(), grid.name());
        self.output = Some(FieldIdentifier::new(
            Self::NAME,
            layout,
            Units::nondimensional(),
            grid.name(),
        ));
        Ok(vec![FieldRequest::required(p_mid)])
    }

    fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
        self.output
            .clone()
            .ok_or_else(|| DiagnosticError::GridsNotSet {
                diagnostic: Self::NAME.to_string(),
            })
    }

    fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
        apply_columnwise(ctx, Self::NAME, ["p_mid"], |[p]| exner_function(p))
    }
}

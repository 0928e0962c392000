//! Potential temperature from temperature and pressure.

use stratus_core::{Communicator, FieldIdentifier, ParameterList, Units};
use stratus_diagnostic::{ComputeContext, DiagnosticError, DiagnosticKernel, FieldRequest};
use stratus_grid::{Grid, LayoutKind};

use crate::columnwise::apply_columnwise;
use crate::constants::potential_temperature;

/// `PotentialTemperature = T_mid / exner(p_mid)`.
#[derive(Debug, Default)]
pub struct PotentialTemperature {
    output: Option<FieldIdentifier>,
}

impl PotentialTemperature {
    /// Registered name and output field name.
    pub const NAME: &'static str = "PotentialTemperature";
}

impl DiagnosticKernel for PotentialTemperature {
    fn from_params(_comm: &dyn Communicator, _params: &ParameterList) -> Result<Self, DiagnosticError> {
        Ok(Self::default())
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
        let layout = grid.layout(LayoutKind::Scalar3DMid)?;
        let gn = grid.name();
        let t_mid = FieldIdentifier::new("T_mid", layout.clone(), Units::kelvin(), gn);
        let p_mid = FieldIdentifier::new("p_mid", layout.clone(), Units::pascal(), gn);
        self.output = Some(FieldIdentifier::new(Self::NAME, layout, Units::kelvin(), gn));
        Ok(vec![
            FieldRequest::required(t_mid),
            FieldRequest::required(p_mid),
        ])
    }

    fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
        self.output
            .clone()
            .ok_or_else(|| DiagnosticError::GridsNotSet {
                diagnostic: Self::NAME.to_string(),
            })
    }

    fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
        apply_columnwise(ctx, Self::NAME, ["T_mid", "p_mid"], |[t, p]| {
            potential_temperature(t, p)
        })
    }
}

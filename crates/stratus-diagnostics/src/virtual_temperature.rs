//! Virtual temperature from temperature and vapor mixing ratio.

use stratus_core::{Communicator, FieldIdentifier, ParameterList, Units};
use stratus_diagnostic::{ComputeContext, DiagnosticError, DiagnosticKernel, FieldRequest};
use stratus_grid::{Grid, LayoutKind};

use crate::columnwise::apply_columnwise;
use crate::constants::virtual_temperature;

/// `VirtualTemperature = T_mid (qv + EP_2) / (EP_2 (1 + qv))`.
#[derive(Debug, Default)]
pub struct VirtualTemperature {
    output: Option<FieldIdentifier>,
}

impl VirtualTemperature {
    /// Registered name and output field name.
    pub const NAME: &'static str = "VirtualTemperature";
}

impl DiagnosticKernel for VirtualTemperature {
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
        let qv = FieldIdentifier::new("qv", layout.clone(), Units::kg_per_kg(), gn);
        self.output = Some(FieldIdentifier::new(Self::NAME, layout, Units::kelvin(), gn));
        Ok(vec![FieldRequest::required(t_mid), FieldRequest::required(qv)])
    }

    fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
        self.output
            .clone()
            .ok_or_else(|| DiagnosticError::GridsNotSet {
                diagnostic: Self::NAME.to_string(),
            })
    }

    fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
        apply_columnwise(ctx, Self::NAME, ["T_mid", "qv"], |[t, qv]| {
            virtual_temperature(t, qv)
        })
    }
}

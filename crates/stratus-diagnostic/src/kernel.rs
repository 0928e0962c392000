//! The [`DiagnosticKernel`] trait and the [`KernelDiagnostic`] wrapper
//! that runs any kernel through the [`Diagnostic`] lifecycle.

use std::sync::Arc;

use indexmap::IndexMap;
use stratus_core::{
    Communicator, FieldIdentifier, ParameterList, RunType, TimeStamp, DEFAULT_PACK_SIZE,
};
use stratus_exec::ExecSpace;
use stratus_field::Field;
use stratus_grid::{Grid, GridsManager};

use crate::context::ComputeContext;
use crate::diagnostic::{Diagnostic, DiagnosticState};
use crate::error::DiagnosticError;
use crate::request::FieldRequest;

/// Parameter selecting the grid a diagnostic binds to.
pub const GRID_NAME_PARAM: &str = "grid_name";

const DEFAULT_GRID_NAME: &str = "physics";

/// The formula part of a diagnostic.
///
/// # Contract
///
/// - `bind_grid` is called once per `set_grids` and returns every input
///   the kernel reads. Layouts come from the grid.
/// - `output_identifier` is only called after `bind_grid`.
/// - `compute` must be deterministic and must write every logical
///   element of `ctx.output()`.
///
/// # Examples
///
/// ```
/// use stratus_core::{Communicator, FieldIdentifier, ParameterList, Real, Units};
/// use stratus_diagnostic::{ComputeContext, DiagnosticError, DiagnosticKernel, FieldRequest};
/// use stratus_field::Host;
/// use stratus_grid::{Grid, LayoutKind};
///
/// /// Column-constant field of ones.
/// struct Ones {
///     output: Option<FieldIdentifier>,
/// }
///
/// impl DiagnosticKernel for Ones {
///     fn from_params(_: &dyn Communicator, _: &ParameterList) -> Result<Self, DiagnosticError> {
///         Ok(Self { output: None })
///     }
///
///     fn name(&self) -> &str { "Ones" }
///
///     fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
///         let layout = grid.layout(LayoutKind::Scalar2D)?;
///         self.output = Some(FieldIdentifier::new("Ones", layout, Units::nondimensional(), grid.name()));
///         Ok(vec![])
///     }
///
///     fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
///         self.output.clone().ok_or(DiagnosticError::GridsNotSet { diagnostic: "Ones".into() })
///     }
///
///     fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
///         ctx.output().deep_copy::<Real, Host>(1.0)?;
///         Ok(())
///     }
/// }
/// ```
pub trait DiagnosticKernel: Send + 'static {
    /// Build from construction parameters.
    fn from_params(comm: &dyn Communicator, params: &ParameterList) -> Result<Self, DiagnosticError>
    where
        Self: Sized;

    /// Diagnostic name; also the default output field name.
    fn name(&self) -> &str;

    /// Record grid-dependent state and declare inputs.
    fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError>;

    /// Identifier of the output field.
    fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError>;

    /// Pack width the output is allocated with.
    fn output_pack_size(&self) -> usize {
        DEFAULT_PACK_SIZE
    }

    /// Write the output from the inputs.
    fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError>;
}

/// Lifecycle state machine around a [`DiagnosticKernel`].
pub struct KernelDiagnostic<K> {
    kernel: K,
    name: String,
    grid_name: String,
    exec: Arc<ExecSpace>,
    state: DiagnosticState,
    grid: Option<Arc<dyn Grid>>,
    requests: Vec<FieldRequest>,
    inputs: IndexMap<String, Field>,
    output: Option<Field>,
    t0: Option<TimeStamp>,
}

impl<K: DiagnosticKernel> KernelDiagnostic<K> {
    /// Wrap `kernel`. Reads [`GRID_NAME_PARAM`] (default `"physics"`).
    pub fn new(
        kernel: K,
        params: &ParameterList,
        exec: Arc<ExecSpace>,
    ) -> Result<Self, DiagnosticError> {
        let grid_name = params.get_or(GRID_NAME_PARAM, DEFAULT_GRID_NAME.to_string())?;
        Ok(Self {
            name: kernel.name().to_string(),
            kernel,
            grid_name,
            exec,
            state: DiagnosticState::Constructed,
            grid: None,
            requests: Vec::new(),
            inputs: IndexMap::new(),
            output: None,
            t0: None,
        })
    }

    /// The wrapped kernel.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Name of the grid this diagnostic binds to.
    pub fn grid_name(&self) -> &str {
        &self.grid_name
    }

    fn transition_error(&self, operation: &'static str) -> DiagnosticError {
        match self.state {
            DiagnosticState::Finalized => DiagnosticError::AlreadyFinalized {
                diagnostic: self.name.clone(),
            },
            DiagnosticState::Constructed => DiagnosticError::GridsNotSet {
                diagnostic: self.name.clone(),
            },
            from => DiagnosticError::InvalidTransition {
                diagnostic: self.name.clone(),
                from,
                operation,
            },
        }
    }

    fn is_required_input(&self, field: &Field) -> bool {
        self.inputs.values().any(|input| {
            input.shares_storage_with(field) || input.identifier() == field.identifier()
        })
    }

    /// Latest input timestamp, or the start time if no input has one.
    fn output_time(&self, t0: TimeStamp) -> TimeStamp {
        self.inputs
            .values()
            .filter_map(Field::time_stamp)
            .max()
            .unwrap_or(t0)
    }
}

impl<K: DiagnosticKernel> Diagnostic for KernelDiagnostic<K> {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> DiagnosticState {
        self.state
    }

    fn set_grids(&mut self, grids: &dyn GridsManager) -> Result<(), DiagnosticError> {
        match self.state {
            DiagnosticState::Constructed | DiagnosticState::GridBound => {}
            _ => return Err(self.transition_error("set grids")),
        }
        let grid = grids.grid(&self.grid_name)?;
        let requests = self.kernel.bind_grid(grid.as_ref())?;
        log::debug!(
            "diagnostic '{}' bound to grid '{}' with {} input(s)",
            self.name,
            grid.name(),
            requests.len()
        );
        self.requests = requests;
        self.inputs.clear();
        self.grid = Some(grid);
        self.state = DiagnosticState::GridBound;
        Ok(())
    }

    fn get_required_field_requests(&self) -> Result<&[FieldRequest], DiagnosticError> {
        match self.state {
            DiagnosticState::Constructed => Err(self.transition_error("request fields")),
            DiagnosticState::Finalized => Err(self.transition_error("request fields")),
            _ => Ok(&self.requests),
        }
    }

    fn set_required_field(&mut self, field: Field) -> Result<(), DiagnosticError> {
        if self.state != DiagnosticState::GridBound {
            return Err(self.transition_error("set required field"));
        }
        if !self
            .requests
            .iter()
            .any(|r| &r.identifier == field.identifier())
        {
            return Err(DiagnosticError::UnexpectedField {
                diagnostic: self.name.clone(),
                field: field.name().to_string(),
            });
        }
        let input = field.get_const();
        if self
            .inputs
            .insert(field.name().to_string(), input)
            .is_some()
        {
            log::debug!(
                "diagnostic '{}': replaced input '{}'",
                self.name,
                field.name()
            );
        }
        Ok(())
    }

    fn set_computed_field(&mut self, field: Field) -> Result<(), DiagnosticError> {
        if self.is_required_input(&field) {
            return Err(DiagnosticError::RoleConflict {
                diagnostic: self.name.clone(),
                field: field.name().to_string(),
            });
        }
        Err(DiagnosticError::UnexpectedField {
            diagnostic: self.name.clone(),
            field: field.name().to_string(),
        })
    }

    fn initialize(&mut self, t0: TimeStamp, run_type: RunType) -> Result<(), DiagnosticError> {
        if self.state != DiagnosticState::GridBound {
            return Err(self.transition_error("initialize"));
        }
        for request in self.requests.iter().filter(|r| r.required) {
            let missing = match self.inputs.get(request.name()) {
                Some(f) => !f.is_allocated(),
                None => true,
            };
            if missing {
                return Err(DiagnosticError::MissingRequiredField {
                    diagnostic: self.name.clone(),
                    field: request.name().to_string(),
                });
            }
        }

        let output = Field::new(self.kernel.output_identifier()?);
        output.request_allocation(self.kernel.output_pack_size())?;
        output.allocate_view()?;

        log::debug!(
            "diagnostic '{}' initialized at {t0} ({run_type:?}); output {}",
            self.name,
            output.identifier()
        );
        self.output = Some(output);
        self.t0 = Some(t0);
        self.state = DiagnosticState::Initialized;
        Ok(())
    }

    fn compute_diagnostic(&mut self) -> Result<(), DiagnosticError> {
        let (Some(output), Some(grid), Some(t0)) = (&self.output, &self.grid, self.t0) else {
            return Err(match self.state {
                DiagnosticState::Finalized => self.transition_error("compute"),
                _ => DiagnosticError::NotInitialized {
                    diagnostic: self.name.clone(),
                },
            });
        };
        let mut ctx = ComputeContext::new(
            &self.name,
            &self.inputs,
            output,
            grid.as_ref(),
            &self.exec,
            t0,
        );
        self.kernel.compute(&mut ctx)?;
        self.exec.fence();
        output.update_time_stamp(self.output_time(t0))?;
        self.state = DiagnosticState::Computed;
        Ok(())
    }

    fn get_diagnostic(&self) -> Result<Field, DiagnosticError> {
        match &self.output {
            Some(output) => Ok(output.get_const()),
            None if self.state == DiagnosticState::Finalized => {
                Err(self.transition_error("get diagnostic"))
            }
            None => Err(DiagnosticError::NotInitialized {
                diagnostic: self.name.clone(),
            }),
        }
    }

    fn finalize(&mut self) -> Result<(), DiagnosticError> {
        if self.state == DiagnosticState::Finalized {
            return Err(self.transition_error("finalize"));
        }
        self.output = None;
        self.inputs.clear();
        self.grid = None;
        self.state = DiagnosticState::Finalized;
        log::debug!("diagnostic '{}' finalized", self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::{FieldTag, Layout, Real, SerialComm, Units};
    use stratus_exec::{ExecConfig, TeamPolicy};
    use stratus_field::{Device, Host};
    use stratus_grid::{LayoutKind, MeshFreeGridsManager};

    /// out = 2 * x
    struct Doubler {
        input: Option<FieldIdentifier>,
        output: Option<FieldIdentifier>,
    }

    impl DiagnosticKernel for Doubler {
        fn from_params(_: &dyn Communicator, _: &ParameterList) -> Result<Self, DiagnosticError> {
            Ok(Self {
                input: None,
                output: None,
            })
        }

        fn name(&self) -> &str {
            "Doubler"
        }

        fn bind_grid(&mut self, grid: &dyn Grid) -> Result<Vec<FieldRequest>, DiagnosticError> {
            let layout = grid.layout(LayoutKind::Scalar3DMid)?;
            let x = FieldIdentifier::new("x", layout.clone(), Units::nondimensional(), grid.name());
            self.output = Some(FieldIdentifier::new(
                "Doubler",
                layout,
                Units::nondimensional(),
                grid.name(),
            ));
            self.input = Some(x.clone());
            Ok(vec![FieldRequest::required(x)])
        }

        fn output_identifier(&self) -> Result<FieldIdentifier, DiagnosticError> {
            self.output.clone().ok_or(DiagnosticError::GridsNotSet {
                diagnostic: "Doubler".into(),
            })
        }

        fn compute(&self, ctx: &mut ComputeContext<'_>) -> Result<(), DiagnosticError> {
            let x = ctx.input("x")?.get_view::<Real, 2, Device>()?;
            let x_row = x.padded_extents()[1];
            let x = x.as_slice();
            let mut out = ctx.output().get_view_mut::<Real, 2, Device>()?;
            let [ncols, nlevs] = out.extents();
            ctx.exec().team_parallel_for(
                "Doubler",
                TeamPolicy::default_for(ncols, nlevs),
                out.as_mut_slice(),
                |team, col| {
                    let xc = &x[team.league_rank() * x_row..];
                    team.team_vector_range(nlevs, |k| col[k] = 2.0 * xc[k]);
                    team.team_barrier();
                },
            )?;
            Ok(())
        }
    }

    fn grids(ncols: i64, nlevs: i64) -> MeshFreeGridsManager {
        let mut p = ParameterList::new("gm");
        p.set("grids_names", vec!["physics".to_string()]);
        let g = p.sublist_mut("physics");
        g.set("type", "point_grid");
        g.set("number_of_global_columns", ncols);
        g.set("number_of_vertical_levels", nlevs);
        let mut gm = MeshFreeGridsManager::new(&SerialComm, &p);
        gm.build_grids().unwrap();
        gm
    }

    fn doubler() -> KernelDiagnostic<Doubler> {
        let params = ParameterList::default();
        let exec = Arc::new(ExecSpace::new(ExecConfig::serial()).unwrap());
        KernelDiagnostic::new(
            Doubler::from_params(&SerialComm, &params).unwrap(),
            &params,
            exec,
        )
        .unwrap()
    }

    fn t0() -> TimeStamp {
        TimeStamp::new((2020, 1, 1), (0, 0, 0)).unwrap()
    }

    fn input_for(d: &KernelDiagnostic<Doubler>) -> Field {
        let req = &d.get_required_field_requests().unwrap()[0];
        let f = Field::new(req.identifier.clone());
        f.request_allocation(req.pack_size).unwrap();
        f.allocate_view().unwrap();
        f
    }

    #[test]
    fn requests_need_grid() {
        let d = doubler();
        assert_eq!(d.state(), DiagnosticState::Constructed);
        assert!(matches!(
            d.get_required_field_requests(),
            Err(DiagnosticError::GridsNotSet { .. })
        ));
    }

    #[test]
    fn full_lifecycle() {
        let mut d = doubler();
        d.set_grids(&grids(3, 5)).unwrap();
        assert_eq!(d.state(), DiagnosticState::GridBound);
        let x = input_for(&d);
        {
            let mut v = x.get_view_mut::<Real, 2, Host>().unwrap();
            for i in 0..3 {
                for k in 0..5 {
                    v[[i, k]] = (i * 10 + k) as Real;
                }
            }
        }
        let ts = t0().advanced_by(600);
        x.update_time_stamp(ts).unwrap();
        d.set_required_field(x.get_const()).unwrap();
        d.initialize(t0(), RunType::Initial).unwrap();
        assert_eq!(d.state(), DiagnosticState::Initialized);

        d.compute_diagnostic().unwrap();
        assert_eq!(d.state(), DiagnosticState::Computed);
        let out = d.get_diagnostic().unwrap();
        assert!(out.is_read_only());
        assert_eq!(out.time_stamp(), Some(ts));
        let v = out.get_view::<Real, 2, Host>().unwrap();
        assert_eq!(v[[2, 4]], 48.0);
        drop(v);

        d.finalize().unwrap();
        assert_eq!(d.state(), DiagnosticState::Finalized);
        assert!(matches!(
            d.compute_diagnostic(),
            Err(DiagnosticError::AlreadyFinalized { .. })
        ));
        assert!(matches!(
            d.finalize(),
            Err(DiagnosticError::AlreadyFinalized { .. })
        ));
        // Handles taken earlier stay valid after finalize.
        assert!(out.is_allocated());
    }

    #[test]
    fn output_time_defaults_to_start() {
        let mut d = doubler();
        d.set_grids(&grids(1, 3)).unwrap();
        let x = input_for(&d);
        d.set_required_field(x).unwrap();
        d.initialize(t0(), RunType::Restart).unwrap();
        d.compute_diagnostic().unwrap();
        assert_eq!(d.get_diagnostic().unwrap().time_stamp(), Some(t0()));
    }

    #[test]
    fn compute_before_initialize() {
        let mut d = doubler();
        assert!(matches!(
            d.compute_diagnostic(),
            Err(DiagnosticError::NotInitialized { .. })
        ));
        d.set_grids(&grids(1, 3)).unwrap();
        assert!(matches!(
            d.compute_diagnostic(),
            Err(DiagnosticError::NotInitialized { .. })
        ));
        assert!(matches!(
            d.get_diagnostic(),
            Err(DiagnosticError::NotInitialized { .. })
        ));
    }

    #[test]
    fn missing_input_blocks_initialize() {
        let mut d = doubler();
        d.set_grids(&grids(2, 3)).unwrap();
        assert_eq!(
            d.initialize(t0(), RunType::Initial).unwrap_err(),
            DiagnosticError::MissingRequiredField {
                diagnostic: "Doubler".into(),
                field: "x".into()
            }
        );
        assert_eq!(d.state(), DiagnosticState::GridBound);
    }

    #[test]
    fn unallocated_input_counts_as_missing() {
        let mut d = doubler();
        d.set_grids(&grids(2, 3)).unwrap();
        let req = d.get_required_field_requests().unwrap()[0].clone();
        d.set_required_field(Field::new(req.identifier)).unwrap();
        assert!(matches!(
            d.initialize(t0(), RunType::Initial),
            Err(DiagnosticError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn wrong_layout_is_unexpected() {
        let mut d = doubler();
        d.set_grids(&grids(2, 3)).unwrap();
        let layout = Layout::new(&[FieldTag::Column, FieldTag::Level], &[2, 4]).unwrap();
        let f = Field::new(FieldIdentifier::new(
            "x",
            layout,
            Units::nondimensional(),
            "physics",
        ));
        assert!(matches!(
            d.set_required_field(f),
            Err(DiagnosticError::UnexpectedField { .. })
        ));
    }

    #[test]
    fn computed_field_roles() {
        let mut d = doubler();
        d.set_grids(&grids(2, 3)).unwrap();
        let x = input_for(&d);
        let stranger = x.deep_clone().unwrap();
        d.set_required_field(x.get_const()).unwrap();
        assert!(matches!(
            d.set_computed_field(x),
            Err(DiagnosticError::RoleConflict { .. })
        ));
        // Same identifier, different storage: still the input's role.
        assert!(matches!(
            d.set_computed_field(stranger),
            Err(DiagnosticError::RoleConflict { .. })
        ));
        let other = Field::new(d.kernel().output_identifier().unwrap());
        assert!(matches!(
            d.set_computed_field(other),
            Err(DiagnosticError::UnexpectedField { .. })
        ));
    }

    #[test]
    fn inputs_frozen_after_initialize() {
        let mut d = doubler();
        d.set_grids(&grids(1, 2)).unwrap();
        let x = input_for(&d);
        d.set_required_field(x.get_const()).unwrap();
        d.initialize(t0(), RunType::Initial).unwrap();
        assert!(matches!(
            d.set_required_field(x),
            Err(DiagnosticError::InvalidTransition {
                from: DiagnosticState::Initialized,
                ..
            })
        ));
        assert!(matches!(
            d.initialize(t0(), RunType::Initial),
            Err(DiagnosticError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn unknown_grid_name() {
        let mut params = ParameterList::default();
        params.set(GRID_NAME_PARAM, "dynamics");
        let exec = Arc::new(ExecSpace::new(ExecConfig::serial()).unwrap());
        let mut d = KernelDiagnostic::new(
            Doubler::from_params(&SerialComm, &params).unwrap(),
            &params,
            exec,
        )
        .unwrap();
        assert_eq!(d.grid_name(), "dynamics");
        assert!(matches!(
            d.set_grids(&grids(1, 1)),
            Err(DiagnosticError::Grid(_))
        ));
    }
}

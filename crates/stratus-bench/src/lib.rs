//! Benchmark profiles for Stratus.
//!
//! - [`column_params`]: grids-manager parameters for one point grid.
//! - [`ExnerProfile`]: an initialized Exner diagnostic with a
//!   deterministic pressure profile, ready to `compute_diagnostic`.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;
use std::sync::Arc;

use stratus_core::{ParameterList, Real, RunType, SerialComm, TimeStamp};
use stratus_diagnostic::{Diagnostic, DiagnosticFactory};
use stratus_diagnostics::{register_diagnostics, Exner, P0};
use stratus_exec::{ExecConfig, ExecSpace};
use stratus_field::{Field, Host};
use stratus_grid::{GridsManager, MeshFreeGridsManager};

/// Parameters for a single `"physics"` point grid.
pub fn column_params(ncols: usize, nlevs: usize) -> ParameterList {
    let mut params = ParameterList::new("grids_manager");
    params.set("grids_names", vec!["physics".to_string()]);
    let pl = params.sublist_mut("physics");
    pl.set("type", "point_grid");
    pl.set("number_of_global_columns", ncols as i64);
    pl.set("number_of_vertical_levels", nlevs as i64);
    params
}

/// An Exner diagnostic wired to its single input.
pub struct ExnerProfile {
    /// The diagnostic, already initialized.
    pub diagnostic: Box<dyn Diagnostic>,
    /// Midpoint pressure, decreasing with level from `P0`.
    pub p_mid: Field,
}

impl ExnerProfile {
    /// Build on an `ncols x nlevs` grid with `threads` workers
    /// (`None`: all cores).
    pub fn new(
        ncols: usize,
        nlevs: usize,
        threads: Option<usize>,
    ) -> Result<Self, Box<dyn Error>> {
        let exec = Arc::new(ExecSpace::new(ExecConfig {
            num_threads: threads,
        })?);
        let mut factory = DiagnosticFactory::new(exec);
        register_diagnostics(&mut factory);

        let mut grids = MeshFreeGridsManager::new(&SerialComm, &column_params(ncols, nlevs));
        grids.build_grids()?;

        let mut diagnostic =
            factory.create(Exner::NAME, &SerialComm, &ParameterList::new(Exner::NAME))?;
        diagnostic.set_grids(&grids)?;
        let request = diagnostic
            .get_required_field_requests()?
            .first()
            .cloned()
            .ok_or("Exner declares no inputs")?;
        let p_mid = Field::new(request.identifier);
        p_mid.request_allocation(request.pack_size)?;
        p_mid.allocate_view()?;
        {
            let mut v = p_mid.get_view_mut::<Real, 2, Host>()?;
            for i in 0..ncols {
                for k in 0..nlevs {
                    v[[i, k]] = P0 * (1.0 - k as Real / (nlevs as Real + 1.0));
                }
            }
        }
        diagnostic.set_required_field(p_mid.get_const())?;
        let t0 = TimeStamp::new((2000, 1, 1), (0, 0, 0))?;
        diagnostic.initialize(t0, RunType::Initial)?;
        Ok(Self { diagnostic, p_mid })
    }
}

//! Test utilities for Stratus development.
//!
//! - [`setup_random_test`]: a seeded RNG whose seed is logged and can be
//!   pinned through `STRATUS_TEST_SEED`.
//! - [`create_point_grids_manager`]: a built [`MeshFreeGridsManager`]
//!   with one `"physics"` point grid.
//! - [`allocated_field`] / [`randomize`]: ready-to-use fields.
//! - [`fixtures`]: small diagnostics for exercising the framework.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stratus_core::{Communicator, FieldIdentifier, ParameterList, Real};
use stratus_exec::{ExecConfig, ExecSpace};
use stratus_field::{Field, FieldError, Host};
use stratus_grid::{GridsManager, MeshFreeGridsManager};

/// Environment variable that pins the seed of [`setup_random_test`].
pub const SEED_ENV: &str = "STRATUS_TEST_SEED";

/// Seeded RNG for a randomized test, plus the seed that produced it.
///
/// The seed comes from `STRATUS_TEST_SEED` when set and parseable,
/// otherwise from OS entropy. It is always logged so a failure can be
/// replayed.
pub fn setup_random_test() -> (ChaCha8Rng, u64) {
    let seed = match std::env::var(SEED_ENV) {
        Ok(s) => match s.trim().parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                log::warn!("ignoring unparseable {SEED_ENV}={s:?}");
                rand::rng().random()
            }
        },
        Err(_) => rand::rng().random(),
    };
    log::info!("random test seed: {seed} (set {SEED_ENV} to reproduce)");
    (ChaCha8Rng::seed_from_u64(seed), seed)
}

/// Parameters describing a single point grid named `"physics"` with
/// `global_ncols` columns across all ranks.
pub fn point_grid_params(global_ncols: usize, nlevs: usize) -> ParameterList {
    let mut params = ParameterList::new("grids_manager");
    params.set("grids_names", vec!["physics".to_string()]);
    let pl = params.sublist_mut("physics");
    pl.set("type", "point_grid");
    pl.set("number_of_global_columns", global_ncols as i64);
    pl.set("number_of_vertical_levels", nlevs as i64);
    params
}

/// A built grids manager holding one `"physics"` point grid with
/// `ncols` columns on every rank of `comm`.
///
/// Panics if the grid cannot be built; intended for tests only.
pub fn create_point_grids_manager(
    comm: &dyn Communicator,
    ncols: usize,
    nlevs: usize,
) -> MeshFreeGridsManager {
    let global_ncols = ncols * comm.size();
    let mut gm = MeshFreeGridsManager::new(comm, &point_grid_params(global_ncols, nlevs));
    gm.build_grids()
        .unwrap_or_else(|e| panic!("building point grid {ncols}x{nlevs}: {e}"));
    gm
}

/// A single-threaded execution space, shareable across diagnostics.
pub fn serial_exec() -> Arc<ExecSpace> {
    match ExecSpace::new(ExecConfig::serial()) {
        Ok(exec) => Arc::new(exec),
        Err(e) => panic!("building serial exec space: {e}"),
    }
}

/// A `Real` field with `identifier`, allocated with `pack_size`.
pub fn allocated_field(identifier: FieldIdentifier, pack_size: usize) -> Result<Field, FieldError> {
    let field = Field::new(identifier);
    field.request_allocation(pack_size)?;
    field.allocate_view()?;
    Ok(field)
}

/// Fill a rank-`N` `Real` field with values drawn uniformly from
/// `lo..=hi`, then push them to the device.
pub fn randomize<const N: usize>(
    field: &Field,
    rng: &mut impl Rng,
    lo: Real,
    hi: Real,
) -> Result<(), FieldError> {
    {
        let mut view = field.get_view_mut::<Real, N, Host>()?;
        for x in view.as_mut_slice() {
            *x = rng.random_range(lo..=hi);
        }
    }
    field.sync_to_dev()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::{FixedComm, SerialComm, Units};
    use stratus_field::field_min;
    use stratus_grid::{Grid, LayoutKind};

    #[test]
    fn pinned_seed_reproduces_the_stream() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn randomize_stays_in_range() {
        let gm = create_point_grids_manager(&SerialComm, 3, 7);
        let grid = gm.grid("physics").unwrap();
        let layout = grid.layout(LayoutKind::Scalar3DMid).unwrap();
        let f = allocated_field(
            FieldIdentifier::new("p_mid", layout, Units::pascal(), "physics"),
            4,
        )
        .unwrap();
        let (mut rng, _) = setup_random_test();
        randomize::<2>(&f, &mut rng, 10.0, 20.0).unwrap();
        assert!(field_min::<Real>(&f).unwrap().unwrap() >= 10.0);
    }

    #[test]
    fn every_rank_gets_the_requested_columns() {
        for rank in 0..4 {
            let comm = FixedComm::new(4, rank).unwrap();
            let gm = create_point_grids_manager(&comm, 3, 2);
            let grid = gm.grid("physics").unwrap();
            assert_eq!(grid.num_local_columns(), 3, "rank {rank}");
            assert_eq!(grid.num_global_columns(), 12);
        }
    }
}

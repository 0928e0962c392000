//! Building and looking up the set of grids for a run.

use std::sync::Arc;

use indexmap::IndexMap;
use stratus_core::{Communicator, ParameterList};

use crate::error::GridError;
use crate::grid::Grid;
use crate::point_grid::{PointGrid, PointGridConfig};

/// Size and rank captured from the communicator at construction.
#[derive(Clone, Copy, Debug)]
struct RankInfo {
    size: usize,
    rank: usize,
}

impl Communicator for RankInfo {
    fn size(&self) -> usize {
        self.size
    }

    fn rank(&self) -> usize {
        self.rank
    }
}

/// Owner of the grids available to a run.
pub trait GridsManager: Send + Sync {
    /// Construct every configured grid. Must be called before lookups.
    fn build_grids(&mut self) -> Result<(), GridError>;

    /// Look up a grid by name or alias.
    fn grid(&self, name: &str) -> Result<Arc<dyn Grid>, GridError>;

    /// Names of the built grids, in configuration order.
    fn grid_names(&self) -> Vec<String>;

    /// Whether a grid answers to `name`.
    fn has_grid(&self, name: &str) -> bool {
        self.grid(name).is_ok()
    }
}

/// Grids manager for grids that carry no mesh (point grids only).
///
/// Reads the string list `grids_names` and, for each entry, a sublist of
/// the same name with `type = "point_grid"` plus the keys documented on
/// [`PointGridConfig`].
///
/// # Examples
///
/// ```
/// use stratus_core::{ParameterList, SerialComm};
/// use stratus_grid::{GridsManager, MeshFreeGridsManager};
///
/// let mut params = ParameterList::new("grids_manager");
/// params.set("grids_names", vec!["physics".to_string()]);
/// let pl = params.sublist_mut("physics");
/// pl.set("type", "point_grid");
/// pl.set("number_of_global_columns", 4i64);
/// pl.set("number_of_vertical_levels", 9i64);
///
/// let mut gm = MeshFreeGridsManager::new(&SerialComm, &params);
/// gm.build_grids().unwrap();
/// assert_eq!(gm.grid("physics").unwrap().num_vertical_levels(), 9);
/// ```
pub struct MeshFreeGridsManager {
    comm: RankInfo,
    params: ParameterList,
    grids: IndexMap<String, Arc<dyn Grid>>,
    built: bool,
}

impl MeshFreeGridsManager {
    /// Manager for the calling rank of `comm`. Nothing is built yet.
    pub fn new(comm: &dyn Communicator, params: &ParameterList) -> Self {
        Self {
            comm: RankInfo {
                size: comm.size(),
                rank: comm.rank(),
            },
            params: params.clone(),
            grids: IndexMap::new(),
            built: false,
        }
    }

    /// Whether `build_grids` has completed.
    pub fn is_built(&self) -> bool {
        self.built
    }

    fn build_one(&self, name: &str) -> Result<Arc<dyn Grid>, GridError> {
        let sub = self.params.sublist(name)?;
        let kind = sub.get::<String>("type")?;
        match kind.as_str() {
            "point_grid" => {
                let cfg = PointGridConfig::from_params(name, sub)?;
                Ok(Arc::new(PointGrid::new(cfg, &self.comm)?))
            }
            _ => Err(GridError::UnsupportedGridType {
                grid: name.to_string(),
                kind,
            }),
        }
    }
}

impl GridsManager for MeshFreeGridsManager {
    fn build_grids(&mut self) -> Result<(), GridError> {
        if self.built {
            log::debug!("grids already built; skipping");
            return Ok(());
        }
        let names = self.params.get::<Vec<String>>("grids_names")?;
        let mut grids = IndexMap::with_capacity(names.len());
        for name in &names {
            let grid = self.build_one(name)?;
            log::debug!(
                "built grid '{}': {} local / {} global columns, {} levels",
                name,
                grid.num_local_columns(),
                grid.num_global_columns(),
                grid.num_vertical_levels()
            );
            grids.insert(name.clone(), grid);
        }
        self.grids = grids;
        self.built = true;
        Ok(())
    }

    fn grid(&self, name: &str) -> Result<Arc<dyn Grid>, GridError> {
        if !self.built {
            return Err(GridError::GridsNotBuilt);
        }
        if let Some(g) = self.grids.get(name) {
            return Ok(Arc::clone(g));
        }
        self.grids
            .values()
            .find(|g| g.answers_to(name))
            .cloned()
            .ok_or_else(|| GridError::UnknownGrid {
                name: name.to_string(),
                available: self.grid_names(),
            })
    }

    fn grid_names(&self) -> Vec<String> {
        self.grids.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::{FixedComm, ParameterError, SerialComm};

    fn params(grids: &[(&str, &str)]) -> ParameterList {
        let mut p = ParameterList::new("grids_manager");
        p.set(
            "grids_names",
            grids.iter().map(|(n, _)| n.to_string()).collect::<Vec<_>>(),
        );
        for (name, kind) in grids {
            let sub = p.sublist_mut(name);
            sub.set("type", *kind);
            sub.set("number_of_global_columns", 7i64);
            sub.set("number_of_vertical_levels", 5i64);
            sub.set("aliases", vec![format!("{name}_alias")]);
        }
        p
    }

    #[test]
    fn lookup_before_build_fails() {
        let gm = MeshFreeGridsManager::new(&SerialComm, &params(&[("physics", "point_grid")]));
        assert_eq!(gm.grid("physics").err(), Some(GridError::GridsNotBuilt));
        assert!(!gm.has_grid("physics"));
    }

    #[test]
    fn builds_all_named_grids() {
        let mut gm = MeshFreeGridsManager::new(
            &FixedComm::new(2, 1).unwrap(),
            &params(&[("physics", "point_grid"), ("dynamics", "point_grid")]),
        );
        gm.build_grids().unwrap();
        assert!(gm.is_built());
        assert_eq!(gm.grid_names(), vec!["physics", "dynamics"]);
        let g = gm.grid("dynamics_alias").unwrap();
        assert_eq!(g.name(), "dynamics");
        assert_eq!(g.num_local_columns(), 3);
        assert!(g.downcast_ref::<PointGrid>().is_some());
    }

    #[test]
    fn unknown_grid_lists_available() {
        let mut gm = MeshFreeGridsManager::new(&SerialComm, &params(&[("physics", "point_grid")]));
        gm.build_grids().unwrap();
        assert_eq!(
            gm.grid("ocean").err(),
            Some(GridError::UnknownGrid {
                name: "ocean".into(),
                available: vec!["physics".into()],
            })
        );
    }

    #[test]
    fn unsupported_type_rejected() {
        let mut gm = MeshFreeGridsManager::new(&SerialComm, &params(&[("se", "se_grid")]));
        assert_eq!(
            gm.build_grids().unwrap_err(),
            GridError::UnsupportedGridType {
                grid: "se".into(),
                kind: "se_grid".into(),
            }
        );
        assert!(!gm.is_built());
    }

    #[test]
    fn missing_grid_list_is_a_parameter_error() {
        let mut gm = MeshFreeGridsManager::new(&SerialComm, &ParameterList::new("empty"));
        assert!(matches!(
            gm.build_grids(),
            Err(GridError::Parameter(ParameterError::MissingParameter { .. }))
        ));
    }
}

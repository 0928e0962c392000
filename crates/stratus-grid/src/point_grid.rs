//! Columns with no horizontal connectivity.

use stratus_core::{Communicator, ParameterList};

use crate::error::GridError;
use crate::grid::Grid;

/// Parameters of a [`PointGrid`], read from a grid sublist.
///
/// | key | type | default |
/// |-----|------|---------|
/// | `number_of_global_columns` | int | required |
/// | `number_of_vertical_levels` | int | required |
/// | `aliases` | string list | empty |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointGridConfig {
    /// Grid name.
    pub name: String,
    /// Columns across all ranks.
    pub num_global_columns: usize,
    /// Midpoint levels per column.
    pub num_vertical_levels: usize,
    /// Alternative names.
    pub aliases: Vec<String>,
}

impl PointGridConfig {
    /// Read a config from the sublist describing grid `name`.
    pub fn from_params(name: &str, params: &ParameterList) -> Result<Self, GridError> {
        let num_global_columns = count(params, "number_of_global_columns")?;
        let num_vertical_levels = count(params, "number_of_vertical_levels")?;
        let aliases = params.get_or::<Vec<String>>("aliases", Vec::new())?;
        Ok(Self {
            name: name.to_string(),
            num_global_columns,
            num_vertical_levels,
            aliases,
        })
    }

    /// Check that the grid is non-empty.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.num_global_columns == 0 || self.num_vertical_levels == 0 {
            return Err(GridError::EmptyGrid {
                grid: self.name.clone(),
            });
        }
        Ok(())
    }
}

fn count(params: &ParameterList, key: &str) -> Result<usize, GridError> {
    let value = params.get::<i64>(key)?;
    usize::try_from(value).map_err(|_| {
        GridError::Parameter(stratus_core::ParameterError::InvalidValue {
            key: key.to_string(),
            reason: format!("must be non-negative, got {value}"),
        })
    })
}

/// A set of independent columns partitioned across ranks.
///
/// Global columns are split evenly; the first `global % size` ranks get
/// one extra column.
///
/// # Examples
///
/// ```
/// use stratus_core::FixedComm;
/// use stratus_grid::{Grid, PointGrid, PointGridConfig};
///
/// let cfg = PointGridConfig {
///     name: "physics".into(),
///     num_global_columns: 10,
///     num_vertical_levels: 72,
///     aliases: vec![],
/// };
/// let comm = FixedComm::new(4, 1).unwrap();
/// let grid = PointGrid::new(cfg, &comm).unwrap();
/// assert_eq!(grid.num_local_columns(), 3);
/// assert_eq!(grid.num_global_columns(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct PointGrid {
    name: String,
    aliases: Vec<String>,
    num_local_columns: usize,
    num_global_columns: usize,
    num_vertical_levels: usize,
    first_global_column: usize,
}

impl PointGrid {
    /// Build the portion of the grid owned by `comm.rank()`.
    pub fn new(config: PointGridConfig, comm: &dyn Communicator) -> Result<Self, GridError> {
        config.validate()?;
        let (size, rank) = (comm.size().max(1), comm.rank());
        let base = config.num_global_columns / size;
        let extra = config.num_global_columns % size;
        let num_local_columns = base + usize::from(rank < extra);
        let first_global_column = rank * base + rank.min(extra);
        Ok(Self {
            name: config.name,
            aliases: config.aliases,
            num_local_columns,
            num_global_columns: config.num_global_columns,
            num_vertical_levels: config.num_vertical_levels,
            first_global_column,
        })
    }

    /// Global index of this rank's first column.
    pub fn first_global_column(&self) -> usize {
        self.first_global_column
    }

    /// Global indices of the columns this rank owns.
    pub fn global_columns(&self) -> std::ops::Range<usize> {
        self.first_global_column..self.first_global_column + self.num_local_columns
    }
}

impl Grid for PointGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn num_local_columns(&self) -> usize {
        self.num_local_columns
    }

    fn num_global_columns(&self) -> usize {
        self.num_global_columns
    }

    fn num_vertical_levels(&self) -> usize {
        self.num_vertical_levels
    }
}

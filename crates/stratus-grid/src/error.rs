//! Error types for grid construction and lookup.

use std::error::Error;
use std::fmt;

use stratus_core::{LayoutError, ParameterError};

/// Errors arising from grid construction or grids-manager queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// No grid is registered under the name or alias.
    UnknownGrid {
        /// The name looked up.
        name: String,
        /// Names of the grids that do exist.
        available: Vec<String>,
    },
    /// The grid sublist names a `type` this manager cannot build.
    UnsupportedGridType {
        /// The grid name.
        grid: String,
        /// The requested type.
        kind: String,
    },
    /// A grid was requested before `build_grids` ran.
    GridsNotBuilt,
    /// A grid must have at least one column and one level.
    EmptyGrid {
        /// The grid name.
        grid: String,
    },
    /// Grid parameters were missing or malformed.
    Parameter(ParameterError),
    /// A grid produced an invalid layout.
    Layout(LayoutError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGrid { name, available } => {
                write!(f, "unknown grid '{name}' (available: {available:?})")
            }
            Self::UnsupportedGridType { grid, kind } => {
                write!(f, "grid '{grid}' has unsupported type '{kind}'")
            }
            Self::GridsNotBuilt => write!(f, "grids have not been built"),
            Self::EmptyGrid { grid } => {
                write!(f, "grid '{grid}' must have at least one column and one level")
            }
            Self::Parameter(e) => write!(f, "grid parameters: {e}"),
            Self::Layout(e) => write!(f, "grid layout: {e}"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parameter(e) => Some(e),
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParameterError> for GridError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

impl From<LayoutError> for GridError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

//! Spatial discretizations consumed by Stratus diagnostics.
//!
//! A [`Grid`] supplies the column and level counts that fix field
//! layouts. A [`GridsManager`] builds a set of named grids from a
//! [`ParameterList`](stratus_core::ParameterList) and resolves lookups by
//! name or alias. The only concrete backend is [`PointGrid`]: columns
//! with no horizontal connectivity, partitioned across ranks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod manager;
pub mod point_grid;

pub use error::GridError;
pub use grid::{Grid, LayoutKind};
pub use manager::{GridsManager, MeshFreeGridsManager};
pub use point_grid::{PointGrid, PointGridConfig};

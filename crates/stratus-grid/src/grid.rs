//! The [`Grid`] trait and `dyn Grid` downcast support.

use std::any::Any;

use stratus_core::{FieldTag, Layout};

use crate::error::GridError;

/// Standard layouts a grid can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// One value per column: `<COL>`.
    Scalar2D,
    /// One value per column and midpoint level: `<COL,LEV>`.
    Scalar3DMid,
    /// One value per column and interface level: `<COL,ILEV>`.
    Scalar3DInt,
    /// A vector of `n` components per column and midpoint level:
    /// `<COL,CMP,LEV>`.
    Vector3DMid(usize),
}

/// A spatial discretization made of columns of vertical levels.
///
/// Designed for use as `dyn Grid`; diagnostics receive `&dyn Grid` and
/// read only the counts and layouts. Use
/// [`downcast_ref`](<dyn Grid>::downcast_ref) to reach a concrete backend.
pub trait Grid: Any + Send + Sync + 'static {
    /// The grid name.
    fn name(&self) -> &str;

    /// Alternative names that resolve to this grid.
    fn aliases(&self) -> &[String];

    /// Columns owned by this process.
    fn num_local_columns(&self) -> usize;

    /// Columns across all processes.
    fn num_global_columns(&self) -> usize;

    /// Midpoint levels per column. Interface levels are one more.
    fn num_vertical_levels(&self) -> usize;

    /// Local layout of the given kind.
    fn layout(&self, kind: LayoutKind) -> Result<Layout, GridError> {
        let ncols = self.num_local_columns();
        let nlevs = self.num_vertical_levels();
        use FieldTag::{Column, Component, InterfaceLevel, Level};
        let layout = match kind {
            LayoutKind::Scalar2D => Layout::new(&[Column], &[ncols])?,
            LayoutKind::Scalar3DMid => Layout::new(&[Column, Level], &[ncols, nlevs])?,
            LayoutKind::Scalar3DInt => {
                Layout::new(&[Column, InterfaceLevel], &[ncols, nlevs + 1])?
            }
            LayoutKind::Vector3DMid(n) => {
                Layout::new(&[Column, Component, Level], &[ncols, n, nlevs])?
            }
        };
        Ok(layout)
    }

    /// Whether `name` is this grid's name or one of its aliases.
    fn answers_to(&self, name: &str) -> bool {
        self.name() == name || self.aliases().iter().any(|a| a == name)
    }
}

impl dyn Grid {
    /// Attempt to downcast a trait object to a concrete grid type.
    pub fn downcast_ref<T: Grid>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

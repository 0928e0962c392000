//! Field identity: [`FieldIdentifier`] and [`Units`].

use crate::layout::Layout;
use std::fmt;

/// Measurement unit annotation (e.g. `"Pa"`, `"K"`).
///
/// Units are compared textually; no dimensional analysis is performed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Units(String);

impl Units {
    /// Wrap an arbitrary unit string.
    pub fn new(units: impl Into<String>) -> Self {
        Self(units.into())
    }

    /// Dimensionless quantity.
    pub fn nondimensional() -> Self {
        Self::new("1")
    }

    /// Pascal.
    pub fn pascal() -> Self {
        Self::new("Pa")
    }

    /// Kelvin.
    pub fn kelvin() -> Self {
        Self::new("K")
    }

    /// Mass mixing ratio.
    pub fn kg_per_kg() -> Self {
        Self::new("kg/kg")
    }

    /// The unit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable key naming a field on a grid.
///
/// Two identifiers are equal iff name, layout, units and grid name all
/// match. Used as the lookup key for required fields and to name
/// diagnostic outputs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldIdentifier {
    name: String,
    layout: Layout,
    units: Units,
    grid_name: String,
}

impl FieldIdentifier {
    /// Create a new identifier.
    pub fn new(
        name: impl Into<String>,
        layout: Layout,
        units: Units,
        grid_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            layout,
            units,
            grid_name: grid_name.into(),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Measurement units.
    pub fn units(&self) -> &Units {
        &self.units
    }

    /// Name of the grid the field lives on.
    pub fn grid_name(&self) -> &str {
        &self.grid_name
    }

    /// Copy of this identifier under a different name.
    pub fn alias(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for FieldIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} [{}] on '{}'",
            self.name, self.layout, self.units, self.grid_name
        )
    }
}

//! Physical constants and shared formulas.

use stratus_core::Real;

/// Reference pressure (Pa).
pub const P0: Real = 100_000.0;

/// Gas constant for dry air (J kg⁻¹ K⁻¹).
pub const RAIR: Real = 287.042;

/// Specific heat of dry air at constant pressure (J kg⁻¹ K⁻¹).
pub const CPAIR: Real = 1004.64;

/// Gas constant for water vapor (J kg⁻¹ K⁻¹).
pub const RV: Real = 461.505;

/// Ratio of dry-air to water-vapor gas constants.
pub const EP_2: Real = RAIR / RV;

/// Exner function `(p / P0)^(RAIR / CPAIR)`.
///
/// ```
/// use stratus_diagnostics::{exner_function, P0};
/// assert_eq!(exner_function(P0), 1.0);
/// assert!(exner_function(0.5 * P0) < 1.0);
/// ```
#[inline]
pub fn exner_function(p: Real) -> Real {
    (p / P0).powf(RAIR / CPAIR)
}

/// Potential temperature of air at temperature `t` and pressure `p`.
#[inline]
pub fn potential_temperature(t: Real, p: Real) -> Real {
    t / exner_function(p)
}

/// Virtual temperature of air at temperature `t` with vapor mixing
/// ratio `qv`.
#[inline]
pub fn virtual_temperature(t: Real, qv: Real) -> Real {
    t * (qv + EP_2) / (EP_2 * (1.0 + qv))
}

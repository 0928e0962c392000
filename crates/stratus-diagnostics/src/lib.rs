//! Thermodynamic diagnostics built on the Stratus diagnostic framework.
//!
//! | name | inputs | output |
//! |------|--------|--------|
//! | `Exner` | `p_mid` | `Exner` |
//! | `PotentialTemperature` | `T_mid`, `p_mid` | `PotentialTemperature` |
//! | `VirtualTemperature` | `T_mid`, `qv` | `VirtualTemperature` |
//!
//! All fields are `<COL,LEV>` on the bound grid. Register them with
//! [`register_diagnostics`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod columnwise;
pub mod constants;
pub mod exner;
pub mod potential_temperature;
pub mod virtual_temperature;

pub use constants::{exner_function, CPAIR, EP_2, P0, RAIR, RV};
pub use exner::Exner;
pub use potential_temperature::PotentialTemperature;
pub use virtual_temperature::VirtualTemperature;

use stratus_diagnostic::{create_kernel_diagnostic, DiagnosticFactory};

/// Register every diagnostic in this crate under its name.
pub fn register_diagnostics(factory: &mut DiagnosticFactory) {
    factory.register(Exner::NAME, create_kernel_diagnostic::<Exner>);
    factory.register(
        PotentialTemperature::NAME,
        create_kernel_diagnostic::<PotentialTemperature>,
    );
    factory.register(
        VirtualTemperature::NAME,
        create_kernel_diagnostic::<VirtualTemperature>,
    );
}

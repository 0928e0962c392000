//! Diagnostic plugins: derived fields computed from declared inputs.
//!
//! A diagnostic is driven through a fixed lifecycle:
//!
//! ```text
//! Constructed ──set_grids──▶ GridBound ──initialize──▶ Initialized
//!                                                         │  ▲
//!                                          compute_diagnostic│  │
//!                                                         ▼  │
//!                               Finalized ◀──finalize── Computed
//! ```
//!
//! The [`Diagnostic`] trait is the object-safe face the driver uses.
//! Concrete diagnostics implement the much smaller [`DiagnosticKernel`]
//! and are wrapped in a [`KernelDiagnostic`], which owns the state
//! machine, the required inputs and the output field.
//!
//! Diagnostics are built by name through a [`DiagnosticFactory`], an
//! explicit registry populated once at startup.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod diagnostic;
pub mod error;
pub mod factory;
pub mod kernel;
pub mod request;

pub use context::ComputeContext;
pub use diagnostic::{Diagnostic, DiagnosticState};
pub use error::DiagnosticError;
pub use factory::{create_kernel_diagnostic, DiagnosticCreator, DiagnosticFactory};
pub use kernel::{DiagnosticKernel, KernelDiagnostic, GRID_NAME_PARAM};
pub use request::FieldRequest;

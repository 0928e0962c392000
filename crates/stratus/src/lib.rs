//! Stratus: typed-array field storage and pluggable diagnostics for
//! atmosphere models.
//!
//! This is the top-level facade crate that re-exports the public API of
//! the Stratus sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use stratus::prelude::*;
//!
//! // One point grid with 2 columns and 9 levels.
//! let mut params = ParameterList::new("grids_manager");
//! params.set("grids_names", vec!["physics".to_string()]);
//! let pl = params.sublist_mut("physics");
//! pl.set("type", "point_grid");
//! pl.set("number_of_global_columns", 2i64);
//! pl.set("number_of_vertical_levels", 9i64);
//! let mut grids = MeshFreeGridsManager::new(&SerialComm, &params);
//! grids.build_grids().unwrap();
//!
//! let exec = Arc::new(ExecSpace::new(ExecConfig::serial()).unwrap());
//! let mut factory = DiagnosticFactory::new(exec);
//! stratus::diagnostics::register_diagnostics(&mut factory);
//!
//! let mut exner = factory
//!     .create("Exner", &SerialComm, &ParameterList::new("Exner"))
//!     .unwrap();
//! exner.set_grids(&grids).unwrap();
//!
//! let request = exner.get_required_field_requests().unwrap()[0].clone();
//! let p_mid = Field::new(request.identifier);
//! p_mid.request_allocation(request.pack_size).unwrap();
//! p_mid.allocate_view().unwrap();
//! p_mid.deep_copy::<Real, Host>(100_000.0).unwrap();
//! exner.set_required_field(p_mid.get_const()).unwrap();
//!
//! let t0 = TimeStamp::new((2000, 1, 1), (0, 0, 0)).unwrap();
//! exner.initialize(t0, RunType::Initial).unwrap();
//! exner.compute_diagnostic().unwrap();
//!
//! let out = exner.get_diagnostic().unwrap();
//! assert_eq!(out.get_view::<Real, 2, Host>().unwrap()[[1, 8]], 1.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stratus-core` | Layouts, identifiers, data types, timestamps, parameters |
//! | [`field`] | `stratus-field` | `Field`, views, memory spaces, comparison helpers |
//! | [`grid`] | `stratus-grid` | `Grid` trait, point grids, grids managers |
//! | [`exec`] | `stratus-exec` | Execution space and parallel dispatch |
//! | [`diagnostic`] | `stratus-diagnostic` | Diagnostic lifecycle, kernels, factory |
//! | [`diagnostics`] | `stratus-diagnostics` | Thermodynamic diagnostics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core metadata types (`stratus-core`).
pub use stratus_core as types;

/// Type-erased field storage and typed views (`stratus-field`).
pub use stratus_field as field;

/// Grids and grids managers (`stratus-grid`).
pub use stratus_grid as grid;

/// Execution space, range and team policies (`stratus-exec`).
pub use stratus_exec as exec;

/// The diagnostic framework (`stratus-diagnostic`).
///
/// Implement [`diagnostic::DiagnosticKernel`] and register it with a
/// [`diagnostic::DiagnosticFactory`] to add a diagnostic.
pub use stratus_diagnostic as diagnostic;

/// Concrete diagnostics (`stratus-diagnostics`).
pub use stratus_diagnostics as diagnostics;

/// Common imports for typical Stratus usage.
pub mod prelude {
    // Metadata
    pub use stratus_core::{
        Communicator, DataType, FieldIdentifier, FieldTag, Layout, ParameterList, Real, RunType,
        SerialComm, TimeStamp, Units, DEFAULT_PACK_SIZE,
    };

    // Fields
    pub use stratus_field::{Device, Field, FieldError, Host, MemoryModel, View, ViewMut};

    // Grids
    pub use stratus_grid::{Grid, GridsManager, LayoutKind, MeshFreeGridsManager};

    // Execution
    pub use stratus_exec::{ExecConfig, ExecSpace, RangePolicy, TeamPolicy};

    // Diagnostics
    pub use stratus_diagnostic::{
        ComputeContext, Diagnostic, DiagnosticError, DiagnosticFactory, DiagnosticKernel,
        FieldRequest,
    };
}

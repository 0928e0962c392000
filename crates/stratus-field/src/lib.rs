//! Type-erased field storage for Stratus.
//!
//! A [`Field`] owns a header (identifier, data type, allocation
//! properties, tracking) and a reference-counted buffer whose element
//! type and rank are *not* part of the `Field` type. Typed, dimensioned
//! access is recovered per call through [`Field::get_view`] and
//! [`Field::get_view_mut`], which check the requested element type and
//! rank against the header before handing out a view.
//!
//! # Lifecycle
//!
//! ```text
//! Field::new(fid)                 header only
//!   └─ request_allocation(pack)   pack size negotiated
//!       └─ allocate_view()        padded buffer(s) created
//!           ├─ get_view / get_view_mut
//!           ├─ deep_copy / deep_clone / get_const
//!           └─ dropped with the last handle sharing the buffer
//! ```
//!
//! # Memory spaces
//!
//! Views are requested for a [`Host`] or [`Device`] space. Under
//! [`MemoryModel::Unified`] both spaces alias one buffer. Under
//! [`MemoryModel::Mirrored`] they are separate buffers and
//! [`Field::sync_to_host`] / [`Field::sync_to_dev`] must be called
//! explicitly; nothing synchronizes on access.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc_props;
pub mod error;
pub mod field;
pub mod header;
mod index;
pub mod space;
mod storage;
pub mod tracking;
pub mod utils;
pub mod view;

pub use alloc_props::AllocationProperties;
pub use error::FieldError;
pub use field::Field;
pub use header::FieldHeader;
pub use space::{Device, Host, MemSpaceKind, MemoryModel, MemorySpace};
pub use tracking::FieldTracking;
pub use utils::{field_max, field_min, field_sum, views_are_approx_equal, views_are_equal};
pub use view::{View, ViewMut};

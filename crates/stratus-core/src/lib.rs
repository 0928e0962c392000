//! Core types for the Stratus field and diagnostic framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value types every other crate shares: field layouts and
//! identifiers, element data types, simulation timestamps, the opaque
//! parameter bag, and the communicator interface.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod comm;
pub mod config;
pub mod data_type;
pub mod error;
pub mod identifier;
pub mod layout;
pub mod time;

pub use comm::{Communicator, FixedComm, SerialComm};
pub use config::{ParamType, ParamValue, ParameterList};
pub use data_type::{DataType, FieldScalar, Real};
pub use error::{LayoutError, ParameterError, TimeStampError};
pub use identifier::{FieldIdentifier, Units};
pub use layout::{Extents, FieldTag, Layout, MAX_RANK};
pub use time::{RunType, TimeStamp};

/// Default vectorization width used to pad field allocations.
///
/// Chosen so that a small odd level count (e.g. `2 * 4 + 1`) leaves a
/// partially filled final pack.
pub const DEFAULT_PACK_SIZE: usize = 4;

//! Field-specific error types.

use std::error::Error;
use std::fmt;

use stratus_core::{DataType, TimeStamp};

/// Contract violations on field allocation and access.
///
/// All variants signal misuse by the caller; none are retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// The buffer already exists.
    AlreadyAllocated {
        /// The field name.
        field: String,
    },
    /// `allocate_view` was called before a pack size was requested.
    AllocationNotRequested {
        /// The field name.
        field: String,
    },
    /// A pack size was already requested for this field.
    AllocationAlreadyRequested {
        /// The field name.
        field: String,
        /// The pack size requested first.
        pack_size: usize,
    },
    /// Pack size must be at least 1.
    InvalidPackSize {
        /// The field name.
        field: String,
        /// The rejected pack size.
        pack_size: usize,
    },
    /// Requested element type differs from the stored one.
    TypeMismatch {
        /// The field name.
        field: String,
        /// Element type of the request.
        requested: DataType,
        /// Element type of the buffer.
        stored: DataType,
    },
    /// Requested rank differs from the layout rank.
    RankMismatch {
        /// The field name.
        field: String,
        /// Rank of the request.
        requested: usize,
        /// Rank of the layout.
        stored: usize,
    },
    /// The buffer has not been allocated yet.
    NotAllocated {
        /// The field name.
        field: String,
    },
    /// Mutation requested through a read-only handle.
    ReadOnly {
        /// The field name.
        field: String,
    },
    /// Two fields were expected to share a layout.
    LayoutMismatch {
        /// Layout of the left-hand field.
        left: String,
        /// Layout of the right-hand field.
        right: String,
    },
    /// The buffer is currently borrowed in a conflicting way by another view.
    ViewBusy {
        /// The field name.
        field: String,
    },
    /// A timestamp update would move a field's time backwards.
    TimestampRegression {
        /// The current timestamp.
        previous: TimeStamp,
        /// The rejected timestamp.
        attempted: TimeStamp,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAllocated { field } => {
                write!(f, "field '{field}' is already allocated")
            }
            Self::AllocationNotRequested { field } => {
                write!(f, "field '{field}' has no allocation request")
            }
            Self::AllocationAlreadyRequested { field, pack_size } => {
                write!(
                    f,
                    "field '{field}' already requested allocation with pack size {pack_size}"
                )
            }
            Self::InvalidPackSize { field, pack_size } => {
                write!(f, "field '{field}': pack size must be positive, got {pack_size}")
            }
            Self::TypeMismatch {
                field,
                requested,
                stored,
            } => {
                write!(
                    f,
                    "field '{field}' stores {stored}, view requested {requested}"
                )
            }
            Self::RankMismatch {
                field,
                requested,
                stored,
            } => {
                write!(
                    f,
                    "field '{field}' has rank {stored}, view requested rank {requested}"
                )
            }
            Self::NotAllocated { field } => {
                write!(f, "field '{field}' is not allocated")
            }
            Self::ReadOnly { field } => {
                write!(f, "field '{field}' is read-only")
            }
            Self::LayoutMismatch { left, right } => {
                write!(f, "layout mismatch: {left} vs {right}")
            }
            Self::ViewBusy { field } => {
                write!(f, "field '{field}' buffer is borrowed by another view")
            }
            Self::TimestampRegression {
                previous,
                attempted,
            } => {
                write!(f, "timestamp {attempted} precedes current timestamp {previous}")
            }
        }
    }
}

impl Error for FieldError {}

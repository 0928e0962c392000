//! Execution runtime for Stratus kernels.
//!
//! Kernels are launched on an [`ExecSpace`] as either a flat
//! [`parallel_for`](ExecSpace::parallel_for) over a [`RangePolicy`] or a
//! two-level [`team_parallel_for`](ExecSpace::team_parallel_for) over a
//! [`TeamPolicy`]: independent outer units (typically columns), each
//! handed a disjoint chunk of the output and a [`TeamMember`] for the
//! inner, cooperative loop (typically levels).
//!
//! Dispatch returns only once every unit has finished.
//! [`ExecSpace::fence`] is the documented synchronization point: it
//! returns once every kernel launched on the space, from any thread, is
//! complete. There is no deferred completion and no cancellation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod policy;
pub mod space;
pub mod team;

pub use config::ExecConfig;
pub use error::ExecError;
pub use policy::{RangePolicy, TeamPolicy};
pub use space::ExecSpace;
pub use team::TeamMember;

//! Error types for kernel dispatch.

use std::error::Error;
use std::fmt;

/// Errors from building an execution space or launching a kernel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecError {
    /// `num_threads` was `Some(0)`.
    InvalidThreadCount,
    /// The thread pool could not be created.
    PoolBuild {
        /// Description from the pool builder.
        reason: String,
    },
    /// The output slice does not split evenly across the league.
    ChunkMismatch {
        /// Kernel label.
        label: String,
        /// League size of the policy.
        league_size: usize,
        /// Length of the output slice.
        len: usize,
    },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreadCount => write!(f, "thread count must be at least 1"),
            Self::PoolBuild { reason } => write!(f, "failed to build thread pool: {reason}"),
            Self::ChunkMismatch {
                label,
                league_size,
                len,
            } => write!(
                f,
                "kernel '{label}': output of length {len} does not split into {league_size} units"
            ),
        }
    }
}

impl Error for ExecError {}

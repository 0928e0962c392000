//! Configuration for [`ExecSpace`](crate::ExecSpace).

use std::num::NonZeroUsize;
use std::thread;

use crate::error::ExecError;

/// Thread-pool settings.
///
/// # Examples
///
/// ```
/// use stratus_exec::ExecConfig;
///
/// let cfg = ExecConfig { num_threads: Some(2) };
/// cfg.validate().unwrap();
/// assert_eq!(cfg.resolved_threads(), 2);
/// assert!(ExecConfig { num_threads: Some(0) }.validate().is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecConfig {
    /// Worker threads. `None` uses the available hardware parallelism.
    pub num_threads: Option<usize>,
}

impl ExecConfig {
    /// A single worker; kernels run in a deterministic order.
    pub fn serial() -> Self {
        Self {
            num_threads: Some(1),
        }
    }

    /// Reject an explicit zero thread count.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.num_threads == Some(0) {
            return Err(ExecError::InvalidThreadCount);
        }
        Ok(())
    }

    /// Thread count after applying the default.
    pub fn resolved_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

//! Process-group interface: [`Communicator`].
//!
//! Only the group size and this process's rank are consumed; no
//! point-to-point messaging happens in this framework. They are used to
//! scale global problem sizes (total columns = local columns × size).

/// A group of cooperating processes.
pub trait Communicator: Send + Sync {
    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// This process's rank, in `0..size()`.
    fn rank(&self) -> usize;

    /// Whether this process is rank 0.
    fn am_i_root(&self) -> bool {
        self.rank() == 0
    }
}

/// Single-process communicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn size(&self) -> usize {
        1
    }

    fn rank(&self) -> usize {
        0
    }
}

/// Communicator with a fixed size and rank.
///
/// Stands in for one member of a larger process group, e.g. to exercise
/// column decomposition on a single process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedComm {
    size: usize,
    rank: usize,
}

impl FixedComm {
    /// Create a communicator view for `rank` of `size`.
    ///
    /// Returns `None` if `size == 0` or `rank >= size`.
    pub fn new(size: usize, rank: usize) -> Option<Self> {
        if size == 0 || rank >= size {
            return None;
        }
        Some(Self { size, rank })
    }
}

impl Communicator for FixedComm {
    fn size(&self) -> usize {
        self.size
    }

    fn rank(&self) -> usize {
        self.rank
    }
}

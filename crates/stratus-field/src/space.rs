//! Memory spaces and memory models.

/// Runtime tag for a memory space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemSpaceKind {
    /// Memory directly addressable by the calling thread.
    Host,
    /// Memory used by compute kernels.
    Device,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Host {}
    impl Sealed for super::Device {}
}

/// Compile-time selector for the memory space of a view.
pub trait MemorySpace: sealed::Sealed + 'static {
    /// The runtime tag.
    const KIND: MemSpaceKind;
}

/// Host memory space.
#[derive(Clone, Copy, Debug, Default)]
pub struct Host;

/// Device (kernel) memory space.
#[derive(Clone, Copy, Debug, Default)]
pub struct Device;

impl MemorySpace for Host {
    const KIND: MemSpaceKind = MemSpaceKind::Host;
}

impl MemorySpace for Device {
    const KIND: MemSpaceKind = MemSpaceKind::Device;
}

/// How host and device storage relate for a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MemoryModel {
    /// Host and device views alias one buffer; syncs are no-ops.
    #[default]
    Unified,
    /// Host and device have separate buffers that only agree after an
    /// explicit `sync_to_host` / `sync_to_dev`.
    Mirrored,
}

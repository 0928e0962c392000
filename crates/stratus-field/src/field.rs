//! The type-erased field container.

use std::fmt;
use std::sync::{Arc, OnceLock};

use stratus_core::{DataType, Extents, FieldIdentifier, FieldScalar, Layout, Real, TimeStamp};

use crate::error::FieldError;
use crate::header::FieldHeader;
use crate::index::LogicalOffsets;
use crate::space::{MemSpaceKind, MemoryModel, MemorySpace};
use crate::storage::{with_scalar_type, Busy, ErasedStorage, FieldBuffer, TypedStorage};
use crate::view::{View, ViewMut};

/// A named, laid-out numerical buffer whose element type and rank are
/// recorded only at runtime.
///
/// `Field` handles are cheap to share through [`get_const`](Self::get_const);
/// the buffer lives until the last handle referencing it is dropped.
/// [`deep_clone`](Self::deep_clone) produces an independent owner.
///
/// # Examples
///
/// ```
/// use stratus_core::{FieldIdentifier, FieldTag, Layout, Units};
/// use stratus_field::{Field, Host};
///
/// let layout = Layout::new(&[FieldTag::Column, FieldTag::Level], &[2, 5]).unwrap();
/// let fid = FieldIdentifier::new("T_mid", layout, Units::kelvin(), "physics");
/// let f = Field::new(fid);
/// f.request_allocation(4).unwrap();
/// f.allocate_view().unwrap();
///
/// f.deep_copy::<f64, Host>(300.0).unwrap();
/// let v = f.get_view::<f64, 2, Host>().unwrap();
/// assert_eq!(v[[1, 4]], 300.0);
/// assert_eq!(v.padded_extents(), [2, 8]);
/// ```
pub struct Field {
    header: Arc<FieldHeader>,
    buffer: Arc<OnceLock<FieldBuffer>>,
    memory_model: MemoryModel,
    read_only: bool,
}

impl Field {
    /// Unallocated field of [`Real`] elements with unified host/device memory.
    pub fn new(identifier: FieldIdentifier) -> Self {
        Self::with_options(identifier, <Real as FieldScalar>::DATA_TYPE, MemoryModel::Unified)
    }

    /// Unallocated field with an explicit element type and memory model.
    pub fn with_options(
        identifier: FieldIdentifier,
        data_type: DataType,
        memory_model: MemoryModel,
    ) -> Self {
        Self {
            header: Arc::new(FieldHeader::new(identifier, data_type)),
            buffer: Arc::new(OnceLock::new()),
            memory_model,
            read_only: false,
        }
    }

    // ── Metadata ────────────────────────────────────────────────

    /// The shared header.
    pub fn header(&self) -> &FieldHeader {
        &self.header
    }

    /// The field identifier.
    pub fn identifier(&self) -> &FieldIdentifier {
        self.header.identifier()
    }

    /// Shorthand for `identifier().name()`.
    pub fn name(&self) -> &str {
        self.header.identifier().name()
    }

    /// Shorthand for `identifier().layout()`.
    pub fn layout(&self) -> &Layout {
        self.header.identifier().layout()
    }

    /// Element type of the buffer.
    pub fn data_type(&self) -> DataType {
        self.header.data_type()
    }

    /// The memory model the buffer is (or will be) allocated with.
    pub fn memory_model(&self) -> MemoryModel {
        self.memory_model
    }

    /// Whether the buffer exists.
    pub fn is_allocated(&self) -> bool {
        self.buffer.get().is_some()
    }

    /// Whether this handle forbids mutation.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether `self` and `other` refer to the same buffer.
    pub fn shares_storage_with(&self, other: &Field) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Time of the last update, if any.
    pub fn time_stamp(&self) -> Option<TimeStamp> {
        self.header.time_stamp()
    }

    /// Record an update at `ts`. Fails on read-only handles.
    pub fn update_time_stamp(&self, ts: TimeStamp) -> Result<(), FieldError> {
        self.ensure_writable()?;
        self.header.update_time_stamp(ts)
    }

    // ── Allocation ──────────────────────────────────────────────

    /// Request a pack size for the upcoming allocation.
    pub fn request_allocation(&self, pack_size: usize) -> Result<(), FieldError> {
        self.ensure_writable()?;
        self.header.request_allocation(pack_size)
    }

    /// Allocate the padded, zero-initialized buffer.
    ///
    /// Under [`MemoryModel::Mirrored`] both a device buffer and a host
    /// mirror are created.
    pub fn allocate_view(&self) -> Result<(), FieldError> {
        self.ensure_writable()?;
        let mut props = self.header.props();
        if self.buffer.get().is_some() {
            return Err(self.already_allocated());
        }
        let len = props.commit()?;
        self.buffer
            .set(FieldBuffer::allocate(self.data_type(), len, self.memory_model))
            .map_err(|_| self.already_allocated())?;
        log::debug!(
            "allocated field '{}': {} x {} ({:?})",
            self.name(),
            len,
            self.data_type(),
            self.memory_model
        );
        Ok(())
    }

    // ── Views ───────────────────────────────────────────────────

    /// Read-only view of element type `T` and rank `N` in space `S`.
    ///
    /// Fails with [`FieldError::TypeMismatch`] or
    /// [`FieldError::RankMismatch`] when `T`/`N` disagree with the header,
    /// [`FieldError::NotAllocated`] before allocation, and
    /// [`FieldError::ViewBusy`] while a mutable view is alive.
    pub fn get_view<T: FieldScalar, const N: usize, S: MemorySpace>(
        &self,
    ) -> Result<View<'_, T, N>, FieldError> {
        self.check_type_and_rank::<T>(N)?;
        let storage = self.typed_storage::<T>(S::KIND)?;
        let guard = storage.try_read().map_err(|Busy| self.busy())?;
        let (padded, pack) = self.padded_geometry()?;
        View::new(guard, self.layout().extents(), &padded, pack).ok_or_else(|| self.rank_err(N))
    }

    /// Mutable view of element type `T` and rank `N` in space `S`.
    ///
    /// Same checks as [`get_view`](Self::get_view), plus
    /// [`FieldError::ReadOnly`] on a const handle.
    pub fn get_view_mut<T: FieldScalar, const N: usize, S: MemorySpace>(
        &self,
    ) -> Result<ViewMut<'_, T, N>, FieldError> {
        self.check_type_and_rank::<T>(N)?;
        self.ensure_writable()?;
        let storage = self.typed_storage::<T>(S::KIND)?;
        let guard = storage.try_write().map_err(|Busy| self.busy())?;
        let (padded, pack) = self.padded_geometry()?;
        ViewMut::new(guard, self.layout().extents(), &padded, pack)
            .ok_or_else(|| self.rank_err(N))
    }

    // ── Copies ──────────────────────────────────────────────────

    /// Overwrite every element in space `S`, padding included, with `value`.
    pub fn deep_copy<T: FieldScalar, S: MemorySpace>(&self, value: T) -> Result<(), FieldError> {
        if T::DATA_TYPE != self.data_type() {
            return Err(self.type_err(T::DATA_TYPE));
        }
        self.ensure_writable()?;
        let storage = self.typed_storage::<T>(S::KIND)?;
        storage.try_write().map_err(|Busy| self.busy())?.fill(value);
        Ok(())
    }

    /// Copy the logical contents of `other` into this field, in every
    /// memory space this field has.
    ///
    /// The layouts and element types must match; pack sizes may differ.
    /// A no-op if both handles share one buffer.
    pub fn deep_copy_from(&self, other: &Field) -> Result<(), FieldError> {
        self.ensure_writable()?;
        if self.layout() != other.layout() {
            return Err(FieldError::LayoutMismatch {
                left: self.layout().to_string(),
                right: other.layout().to_string(),
            });
        }
        if self.data_type() != other.data_type() {
            return Err(self.type_err(other.data_type()));
        }
        let dst = self.buffer()?;
        let src = other.buffer()?;
        if self.shares_storage_with(other) {
            return Ok(());
        }
        let (dst_padded, _) = self.padded_geometry()?;
        let (src_padded, _) = other.padded_geometry()?;
        let extents = self.layout().extents();

        let spaces: &[MemSpaceKind] = match self.memory_model {
            MemoryModel::Unified => &[MemSpaceKind::Device],
            MemoryModel::Mirrored => &[MemSpaceKind::Device, MemSpaceKind::Host],
        };
        for &kind in spaces {
            with_scalar_type!(self.data_type(), T => copy_logical::<T>(
                dst.space(kind),
                &dst_padded,
                src.space(kind),
                &src_padded,
                extents,
            ))
            .map_err(|Busy| self.busy())?;
        }
        Ok(())
    }

    /// Independent copy: same identifier and allocation properties, a new
    /// buffer holding a snapshot of the current data, and a copy of the
    /// tracking state. The result is always writable.
    pub fn deep_clone(&self) -> Result<Field, FieldError> {
        let header = FieldHeader::from_parts(
            self.identifier().clone(),
            self.data_type(),
            self.header.alloc_props(),
            self.header.tracking(),
        );
        let buffer = OnceLock::new();
        if let Some(buf) = self.buffer.get() {
            let copy = buf.duplicate().map_err(|Busy| self.busy())?;
            // A fresh OnceLock cannot already be set.
            let _ = buffer.set(copy);
        }
        Ok(Field {
            header: Arc::new(header),
            buffer: Arc::new(buffer),
            memory_model: self.memory_model,
            read_only: false,
        })
    }

    /// Read-only handle sharing this field's header and buffer.
    pub fn get_const(&self) -> Field {
        Field {
            header: Arc::clone(&self.header),
            buffer: Arc::clone(&self.buffer),
            memory_model: self.memory_model,
            read_only: true,
        }
    }

    // ── Host/device synchronization ─────────────────────────────

    /// Copy device contents into the host mirror. No-op when unified.
    pub fn sync_to_host(&self) -> Result<(), FieldError> {
        self.buffer()?.sync_to_host().map_err(|Busy| self.busy())
    }

    /// Copy host mirror contents to the device. No-op when unified.
    pub fn sync_to_dev(&self) -> Result<(), FieldError> {
        self.ensure_writable()?;
        self.buffer()?.sync_to_dev().map_err(|Busy| self.busy())
    }

    // ── Internals ───────────────────────────────────────────────

    pub(crate) fn buffer(&self) -> Result<&FieldBuffer, FieldError> {
        self.buffer.get().ok_or_else(|| FieldError::NotAllocated {
            field: self.name().to_string(),
        })
    }

    pub(crate) fn storage(&self, kind: MemSpaceKind) -> Result<&dyn ErasedStorage, FieldError> {
        Ok(self.buffer()?.space(kind))
    }

    /// Padded extents and pack size of the committed allocation.
    pub(crate) fn padded_geometry(&self) -> Result<(Extents, usize), FieldError> {
        let props = self.header.props();
        let padded = props.padded_extents()?;
        let pack = props.pack_size().unwrap_or(1);
        Ok((padded, pack))
    }

    fn typed_storage<T: FieldScalar>(
        &self,
        kind: MemSpaceKind,
    ) -> Result<&TypedStorage<T>, FieldError> {
        let storage = self.storage(kind)?;
        storage
            .downcast::<T>()
            .ok_or_else(|| self.type_err(T::DATA_TYPE))
    }

    fn check_type_and_rank<T: FieldScalar>(&self, rank: usize) -> Result<(), FieldError> {
        if T::DATA_TYPE != self.data_type() {
            return Err(self.type_err(T::DATA_TYPE));
        }
        if rank != self.layout().rank() {
            return Err(self.rank_err(rank));
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), FieldError> {
        if self.read_only {
            return Err(FieldError::ReadOnly {
                field: self.name().to_string(),
            });
        }
        Ok(())
    }

    fn type_err(&self, requested: DataType) -> FieldError {
        FieldError::TypeMismatch {
            field: self.name().to_string(),
            requested,
            stored: self.data_type(),
        }
    }

    fn rank_err(&self, requested: usize) -> FieldError {
        FieldError::RankMismatch {
            field: self.name().to_string(),
            requested,
            stored: self.layout().rank(),
        }
    }

    fn busy(&self) -> FieldError {
        FieldError::ViewBusy {
            field: self.name().to_string(),
        }
    }

    fn already_allocated(&self) -> FieldError {
        FieldError::AlreadyAllocated {
            field: self.name().to_string(),
        }
    }
}

fn copy_logical<T: FieldScalar>(
    dst: &dyn ErasedStorage,
    dst_padded: &[usize],
    src: &dyn ErasedStorage,
    src_padded: &[usize],
    extents: &[usize],
) -> Result<(), Busy> {
    let (Some(dst), Some(src)) = (dst.downcast::<T>(), src.downcast::<T>()) else {
        return Ok(());
    };
    let src = src.try_read()?;
    let mut dst = dst.try_write()?;
    let from = LogicalOffsets::new(extents, src_padded);
    let to = LogicalOffsets::new(extents, dst_padded);
    for (s, d) in from.zip(to) {
        dst[d] = src[s];
    }
    Ok(())
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("identifier", &self.identifier().to_string())
            .field("data_type", &self.data_type())
            .field("memory_model", &self.memory_model)
            .field("allocated", &self.is_allocated())
            .field("read_only", &self.read_only)
            .finish()
    }
}

//! Type-erased buffers and the per-type storage behind them.
//!
//! A field holds `Box<dyn ErasedStorage>`; the concrete type is always a
//! [`TypedStorage<T>`] for one [`FieldScalar`] `T`. Typed access is
//! recovered with [`downcast`](dyn ErasedStorage::downcast) after the
//! caller has checked the header metadata.

use std::any::Any;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

use stratus_core::{DataType, FieldScalar};

use crate::space::{MemSpaceKind, MemoryModel};

/// Run `$body` with `$T` bound to the Rust type matching `$dt`.
macro_rules! with_scalar_type {
    ($dt:expr, $T:ident => $body:expr) => {
        match $dt {
            ::stratus_core::DataType::Int => {
                type $T = i32;
                $body
            }
            ::stratus_core::DataType::Float => {
                type $T = f32;
                $body
            }
            ::stratus_core::DataType::Double => {
                type $T = f64;
                $body
            }
        }
    };
}
pub(crate) use with_scalar_type;

/// The buffer was locked by a conflicting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Busy;

/// Contiguous storage for elements of one scalar type.
pub(crate) struct TypedStorage<T> {
    data: RwLock<Vec<T>>,
}

impl<T: FieldScalar> TypedStorage<T> {
    fn zeroed(len: usize) -> Self {
        Self {
            data: RwLock::new(vec![T::default(); len]),
        }
    }

    /// Shared access, or `Busy` if a mutable view is alive.
    pub(crate) fn try_read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, Busy> {
        match self.data.try_read() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(p)) => Ok(p.into_inner()),
            Err(TryLockError::WouldBlock) => Err(Busy),
        }
    }

    /// Exclusive access, or `Busy` if any other view is alive.
    pub(crate) fn try_write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, Busy> {
        match self.data.try_write() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(p)) => Ok(p.into_inner()),
            Err(TryLockError::WouldBlock) => Err(Busy),
        }
    }
}

/// Object-safe face of [`TypedStorage`].
pub(crate) trait ErasedStorage: Any + Send + Sync {
    /// Element type of the concrete storage.
    fn data_type(&self) -> DataType;

    /// Deep copy into a fresh storage.
    fn duplicate(&self) -> Result<Box<dyn ErasedStorage>, Busy>;

    /// Overwrite `dst` (same type and length) with this storage's contents.
    fn copy_into(&self, dst: &dyn ErasedStorage) -> Result<(), Busy>;
}

impl<T: FieldScalar> ErasedStorage for TypedStorage<T> {
    fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    fn duplicate(&self) -> Result<Box<dyn ErasedStorage>, Busy> {
        let data = self.try_read()?.clone();
        Ok(Box::new(TypedStorage {
            data: RwLock::new(data),
        }))
    }

    fn copy_into(&self, dst: &dyn ErasedStorage) -> Result<(), Busy> {
        let Some(dst) = dst.downcast::<T>() else {
            debug_assert!(false, "copy_into between storages of different types");
            return Ok(());
        };
        let src = self.try_read()?;
        let mut out = dst.try_write()?;
        out.copy_from_slice(&src);
        Ok(())
    }
}

impl dyn ErasedStorage {
    /// Recover the concrete storage for element type `T`.
    pub(crate) fn downcast<T: FieldScalar>(&self) -> Option<&TypedStorage<T>> {
        (self as &dyn Any).downcast_ref::<TypedStorage<T>>()
    }
}

fn allocate(data_type: DataType, len: usize) -> Box<dyn ErasedStorage> {
    with_scalar_type!(data_type, T => Box::new(TypedStorage::<T>::zeroed(len)))
}

/// Device storage plus, under [`MemoryModel::Mirrored`], a host mirror.
pub(crate) struct FieldBuffer {
    device: Box<dyn ErasedStorage>,
    host: Option<Box<dyn ErasedStorage>>,
}

impl FieldBuffer {
    /// Zero-initialized buffer(s) of `len` elements.
    pub(crate) fn allocate(data_type: DataType, len: usize, model: MemoryModel) -> Self {
        let host = match model {
            MemoryModel::Unified => None,
            MemoryModel::Mirrored => Some(allocate(data_type, len)),
        };
        Self {
            device: allocate(data_type, len),
            host,
        }
    }

    /// Storage backing views in the given space.
    pub(crate) fn space(&self, kind: MemSpaceKind) -> &dyn ErasedStorage {
        match (kind, &self.host) {
            (MemSpaceKind::Host, Some(host)) => host.as_ref(),
            _ => self.device.as_ref(),
        }
    }

    /// Deep copy of every space.
    pub(crate) fn duplicate(&self) -> Result<Self, Busy> {
        let host = match &self.host {
            Some(h) => Some(h.duplicate()?),
            None => None,
        };
        Ok(Self {
            device: self.device.duplicate()?,
            host,
        })
    }

    /// Copy device contents into the host mirror. No-op when unified.
    pub(crate) fn sync_to_host(&self) -> Result<(), Busy> {
        match &self.host {
            Some(host) => self.device.copy_into(host.as_ref()),
            None => Ok(()),
        }
    }

    /// Copy host mirror contents into the device buffer. No-op when unified.
    pub(crate) fn sync_to_dev(&self) -> Result<(), Busy> {
        match &self.host {
            Some(host) => host.copy_into(self.device.as_ref()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_recovers_only_the_stored_type() {
        let buf = FieldBuffer::allocate(DataType::Double, 4, MemoryModel::Unified);
        let storage = buf.space(MemSpaceKind::Device);
        assert_eq!(storage.data_type(), DataType::Double);
        assert!(storage.downcast::<f64>().is_some());
        assert!(storage.downcast::<f32>().is_none());
        assert!(storage.downcast::<i32>().is_none());
    }

    #[test]
    fn unified_spaces_alias() {
        let buf = FieldBuffer::allocate(DataType::Int, 3, MemoryModel::Unified);
        buf.space(MemSpaceKind::Device)
            .downcast::<i32>()
            .unwrap()
            .try_write()
            .unwrap()
            .fill(7);
        let host = buf.space(MemSpaceKind::Host).downcast::<i32>().unwrap();
        assert_eq!(host.try_read().unwrap().as_slice(), &[7, 7, 7]);
    }

    #[test]
    fn mirrored_spaces_agree_only_after_sync() {
        let buf = FieldBuffer::allocate(DataType::Float, 2, MemoryModel::Mirrored);
        buf.space(MemSpaceKind::Device)
            .downcast::<f32>()
            .unwrap()
            .try_write()
            .unwrap()
            .fill(1.5);
        let host = buf.space(MemSpaceKind::Host).downcast::<f32>().unwrap();
        assert_eq!(host.try_read().unwrap().as_slice(), &[0.0, 0.0]);
        buf.sync_to_host().unwrap();
        assert_eq!(host.try_read().unwrap().as_slice(), &[1.5, 1.5]);
    }

    #[test]
    fn writer_blocks_readers() {
        let storage = TypedStorage::<f64>::zeroed(2);
        let _w = storage.try_write().unwrap();
        assert_eq!(storage.try_read().unwrap_err(), Busy);
    }
}

//! Typed, dimensioned views into a field buffer.
//!
//! A view borrows the buffer for its lifetime: [`View`] holds a shared
//! borrow, [`ViewMut`] an exclusive one. Indices are logical (`[usize; N]`
//! within [`extents`](View::extents)); the padded tail of the last
//! dimension is reachable only through the slab accessors.

use std::ops::{Index, IndexMut};
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use stratus_core::FieldScalar;

use crate::index::strides_of;

/// Logical and padded geometry shared by both view kinds.
#[derive(Clone, Copy, Debug)]
struct Shape<const N: usize> {
    extents: [usize; N],
    padded: [usize; N],
    strides: [usize; N],
    pack_size: usize,
}

impl<const N: usize> Shape<N> {
    fn new(extents: &[usize], padded: &[usize], pack_size: usize) -> Option<Self> {
        Some(Self {
            extents: extents.try_into().ok()?,
            padded: padded.try_into().ok()?,
            strides: strides_of(padded).as_slice().try_into().ok()?,
            pack_size,
        })
    }

    fn offset(&self, idx: [usize; N]) -> Option<usize> {
        let mut off = 0;
        for d in 0..N {
            if idx[d] >= self.extents[d] {
                return None;
            }
            off += idx[d] * self.strides[d];
        }
        Some(off)
    }

    fn expect_offset(&self, idx: [usize; N]) -> usize {
        match self.offset(idx) {
            Some(off) => off,
            None => panic!(
                "index {idx:?} out of bounds for view with extents {:?}",
                self.extents
            ),
        }
    }

    /// Length of one padded row of the last dimension (1 for rank 0).
    fn row_len(&self) -> usize {
        self.padded.last().copied().unwrap_or(1)
    }

    /// Length of the contiguous slab addressed by one leading index.
    fn slab_len(&self) -> Option<usize> {
        self.strides.first().copied()
    }
}

/// Read-only view of rank `N` over elements of type `T`.
///
/// Obtained from [`Field::get_view`](crate::Field::get_view).
pub struct View<'a, T, const N: usize> {
    data: RwLockReadGuard<'a, Vec<T>>,
    shape: Shape<N>,
}

impl<'a, T: FieldScalar, const N: usize> View<'a, T, N> {
    pub(crate) fn new(
        data: RwLockReadGuard<'a, Vec<T>>,
        extents: &[usize],
        padded: &[usize],
        pack_size: usize,
    ) -> Option<Self> {
        Some(Self {
            data,
            shape: Shape::new(extents, padded, pack_size)?,
        })
    }

    /// Logical extents.
    pub fn extents(&self) -> [usize; N] {
        self.shape.extents
    }

    /// Buffer extents, with the last dimension padded to the pack size.
    pub fn padded_extents(&self) -> [usize; N] {
        self.shape.padded
    }

    /// Pack width the buffer was allocated with.
    pub fn pack_size(&self) -> usize {
        self.shape.pack_size
    }

    /// Element at `idx`, or `None` if out of logical bounds.
    pub fn get(&self, idx: [usize; N]) -> Option<T> {
        self.shape.offset(idx).map(|off| self.data[off])
    }

    /// The whole padded buffer in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Padded rows of the last dimension.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.shape.row_len())
    }

    /// Pack-width chunks of the buffer. No chunk straddles two rows.
    pub fn packs(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.shape.pack_size)
    }

    /// Contiguous padded slab for leading index `i0`.
    ///
    /// `None` for rank 0 or an out-of-range `i0`.
    pub fn subview(&self, i0: usize) -> Option<&[T]> {
        let len = self.shape.slab_len()?;
        if i0 >= self.shape.extents[0] {
            return None;
        }
        self.data.get(i0 * len..(i0 + 1) * len)
    }
}

impl<T: FieldScalar, const N: usize> Index<[usize; N]> for View<'_, T, N> {
    type Output = T;

    fn index(&self, idx: [usize; N]) -> &T {
        &self.data[self.shape.expect_offset(idx)]
    }
}

/// Mutable view of rank `N` over elements of type `T`.
///
/// Obtained from [`Field::get_view_mut`](crate::Field::get_view_mut).
/// While it is alive no other view of the same buffer can be taken.
pub struct ViewMut<'a, T, const N: usize> {
    data: RwLockWriteGuard<'a, Vec<T>>,
    shape: Shape<N>,
}

impl<'a, T: FieldScalar, const N: usize> ViewMut<'a, T, N> {
    pub(crate) fn new(
        data: RwLockWriteGuard<'a, Vec<T>>,
        extents: &[usize],
        padded: &[usize],
        pack_size: usize,
    ) -> Option<Self> {
        Some(Self {
            data,
            shape: Shape::new(extents, padded, pack_size)?,
        })
    }

    /// Logical extents.
    pub fn extents(&self) -> [usize; N] {
        self.shape.extents
    }

    /// Buffer extents, with the last dimension padded to the pack size.
    pub fn padded_extents(&self) -> [usize; N] {
        self.shape.padded
    }

    /// Pack width the buffer was allocated with.
    pub fn pack_size(&self) -> usize {
        self.shape.pack_size
    }

    /// Element at `idx`, or `None` if out of logical bounds.
    pub fn get(&self, idx: [usize; N]) -> Option<T> {
        self.shape.offset(idx).map(|off| self.data[off])
    }

    /// Mutable element at `idx`, or `None` if out of logical bounds.
    pub fn get_mut(&mut self, idx: [usize; N]) -> Option<&mut T> {
        let off = self.shape.offset(idx)?;
        self.data.get_mut(off)
    }

    /// The whole padded buffer in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole padded buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Length of one padded row of the last dimension.
    pub fn row_len(&self) -> usize {
        self.shape.row_len()
    }

    /// Length of the slab addressed by one leading index (`None` for rank 0).
    pub fn slab_len(&self) -> Option<usize> {
        self.shape.slab_len()
    }

    /// Padded rows of the last dimension, mutably.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        let len = self.shape.row_len();
        self.data.chunks_exact_mut(len)
    }

    /// Contiguous padded slab for leading index `i0`, mutably.
    pub fn subview_mut(&mut self, i0: usize) -> Option<&mut [T]> {
        let len = self.shape.slab_len()?;
        if i0 >= self.shape.extents[0] {
            return None;
        }
        self.data.get_mut(i0 * len..(i0 + 1) * len)
    }

    /// Set every element, padding included, to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T: FieldScalar, const N: usize> Index<[usize; N]> for ViewMut<'_, T, N> {
    type Output = T;

    fn index(&self, idx: [usize; N]) -> &T {
        &self.data[self.shape.expect_offset(idx)]
    }
}

impl<T: FieldScalar, const N: usize> IndexMut<[usize; N]> for ViewMut<'_, T, N> {
    fn index_mut(&mut self, idx: [usize; N]) -> &mut T {
        let off = self.shape.expect_offset(idx);
        &mut self.data[off]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_respect_padding() {
        let s = Shape::<2>::new(&[2, 5], &[2, 8], 4).unwrap();
        assert_eq!(s.offset([0, 0]), Some(0));
        assert_eq!(s.offset([1, 4]), Some(12));
        assert_eq!(s.offset([1, 5]), None);
        assert_eq!(s.offset([2, 0]), None);
        assert_eq!(s.row_len(), 8);
        assert_eq!(s.slab_len(), Some(8));
    }

    #[test]
    fn rank_zero_shape() {
        let s = Shape::<0>::new(&[], &[], 4).unwrap();
        assert_eq!(s.offset([]), Some(0));
        assert_eq!(s.row_len(), 1);
        assert_eq!(s.slab_len(), None);
    }

    #[test]
    fn wrong_rank_shape_is_none() {
        assert!(Shape::<3>::new(&[2, 5], &[2, 8], 4).is_none());
    }
}

//! Pack-size negotiation and padded extents.

use stratus_core::{DataType, Extents, Layout};

use crate::error::FieldError;

/// Round `extent` up to the next multiple of `pack_size`.
///
/// `pack_size` must be positive.
pub fn padded_extent(extent: usize, pack_size: usize) -> usize {
    extent.div_ceil(pack_size) * pack_size
}

/// Allocation parameters for a field buffer.
///
/// The last dimension of the layout is padded to a multiple of the pack
/// size, so a fixed-width load starting at any pack boundary of a row
/// stays inside the buffer. Properties are locked once the buffer is
/// allocated; after that no further requests are accepted.
///
/// # Examples
///
/// ```
/// use stratus_core::{DataType, FieldTag, Layout};
/// use stratus_field::AllocationProperties;
///
/// let layout = Layout::new(&[FieldTag::Column, FieldTag::Level], &[1, 9]).unwrap();
/// let mut props = AllocationProperties::new("p_mid", layout, DataType::Double);
/// props.request_allocation(4).unwrap();
/// assert_eq!(props.padded_extents().unwrap().as_slice(), &[1, 12]);
/// assert_eq!(props.alloc_size().unwrap(), 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationProperties {
    field: String,
    layout: Layout,
    data_type: DataType,
    pack_size: Option<usize>,
    committed: bool,
}

impl AllocationProperties {
    /// Properties for an unallocated field with no pack size requested.
    pub fn new(field: impl Into<String>, layout: Layout, data_type: DataType) -> Self {
        Self {
            field: field.into(),
            layout,
            data_type,
            pack_size: None,
            committed: false,
        }
    }

    /// Request vectorized access with the given pack width.
    ///
    /// Fails with [`FieldError::AlreadyAllocated`] once the buffer exists,
    /// [`FieldError::InvalidPackSize`] for zero, and
    /// [`FieldError::AllocationAlreadyRequested`] on a second request.
    pub fn request_allocation(&mut self, pack_size: usize) -> Result<(), FieldError> {
        if self.committed {
            return Err(FieldError::AlreadyAllocated {
                field: self.field.clone(),
            });
        }
        if pack_size == 0 {
            return Err(FieldError::InvalidPackSize {
                field: self.field.clone(),
                pack_size,
            });
        }
        if let Some(existing) = self.pack_size {
            return Err(FieldError::AllocationAlreadyRequested {
                field: self.field.clone(),
                pack_size: existing,
            });
        }
        self.pack_size = Some(pack_size);
        Ok(())
    }

    /// The requested pack size, if any.
    pub fn pack_size(&self) -> Option<usize> {
        self.pack_size
    }

    /// Whether a pack size has been requested.
    pub fn is_requested(&self) -> bool {
        self.pack_size.is_some()
    }

    /// Whether the buffer has been allocated with these properties.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// The logical layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Element type of the buffer.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Buffer extents with the last dimension padded.
    pub fn padded_extents(&self) -> Result<Extents, FieldError> {
        let pack = self.require_pack()?;
        let mut extents = Extents::from_slice(self.layout.extents());
        if let Some(last) = extents.last_mut() {
            *last = padded_extent(*last, pack);
        }
        Ok(extents)
    }

    /// Number of elements in the padded buffer (1 for rank 0).
    pub fn alloc_size(&self) -> Result<usize, FieldError> {
        Ok(self.padded_extents()?.iter().product())
    }

    /// Size of the padded buffer in bytes.
    pub fn alloc_bytes(&self) -> Result<usize, FieldError> {
        Ok(self.alloc_size()? * self.data_type.size_of())
    }

    /// Number of padding slots appended to the last dimension.
    pub fn last_extent_padding(&self) -> Result<usize, FieldError> {
        let pack = self.require_pack()?;
        Ok(self
            .layout
            .extents()
            .last()
            .map_or(0, |&e| padded_extent(e, pack) - e))
    }

    /// Lock the properties and return the buffer size to allocate.
    pub(crate) fn commit(&mut self) -> Result<usize, FieldError> {
        if self.committed {
            return Err(FieldError::AlreadyAllocated {
                field: self.field.clone(),
            });
        }
        let size = self.alloc_size()?;
        self.committed = true;
        Ok(size)
    }

    fn require_pack(&self) -> Result<usize, FieldError> {
        self.pack_size
            .ok_or_else(|| FieldError::AllocationNotRequested {
                field: self.field.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stratus_core::FieldTag;

    fn props(extents: &[usize]) -> AllocationProperties {
        let tags = vec![FieldTag::Component; extents.len()];
        AllocationProperties::new("f", Layout::new(&tags, extents).unwrap(), DataType::Double)
    }

    #[test]
    fn zero_pack_size_rejected() {
        let mut p = props(&[3]);
        assert_eq!(
            p.request_allocation(0).unwrap_err(),
            FieldError::InvalidPackSize {
                field: "f".into(),
                pack_size: 0
            }
        );
        assert!(!p.is_requested());
    }

    #[test]
    fn second_request_rejected() {
        let mut p = props(&[3]);
        p.request_allocation(4).unwrap();
        assert_eq!(
            p.request_allocation(4).unwrap_err(),
            FieldError::AllocationAlreadyRequested {
                field: "f".into(),
                pack_size: 4
            }
        );
        assert_eq!(p.pack_size(), Some(4));
    }

    #[test]
    fn request_after_commit_rejected() {
        let mut p = props(&[3]);
        p.request_allocation(2).unwrap();
        assert_eq!(p.commit().unwrap(), 4);
        assert!(matches!(
            p.request_allocation(2),
            Err(FieldError::AlreadyAllocated { .. })
        ));
        assert!(matches!(p.commit(), Err(FieldError::AlreadyAllocated { .. })));
    }

    #[test]
    fn extents_require_request() {
        let p = props(&[3]);
        assert!(matches!(
            p.padded_extents(),
            Err(FieldError::AllocationNotRequested { .. })
        ));
    }

    #[test]
    fn rank_zero_allocates_one_element() {
        let mut p = props(&[]);
        p.request_allocation(8).unwrap();
        assert_eq!(p.alloc_size().unwrap(), 1);
        assert_eq!(p.last_extent_padding().unwrap(), 0);
    }

    #[test]
    fn only_last_dimension_is_padded() {
        let mut p = props(&[3, 5, 9]);
        p.request_allocation(4).unwrap();
        assert_eq!(p.padded_extents().unwrap().as_slice(), &[3, 5, 12]);
        assert_eq!(p.last_extent_padding().unwrap(), 3);
        assert_eq!(p.alloc_bytes().unwrap(), 3 * 5 * 12 * 8);
    }

    proptest! {
        #[test]
        fn padded_extent_is_smallest_multiple(extent in 0usize..1000, pack in 1usize..33) {
            let padded = padded_extent(extent, pack);
            prop_assert!(padded >= extent);
            prop_assert_eq!(padded % pack, 0);
            prop_assert!(padded < extent + pack);
        }

        #[test]
        fn pack_size_one_never_pads(extents in prop::collection::vec(0usize..16, 1..=6)) {
            let mut p = props(&extents);
            p.request_allocation(1).unwrap();
            let padded = p.padded_extents().unwrap();
            prop_assert_eq!(padded.as_slice(), extents.as_slice());
            prop_assert_eq!(p.last_extent_padding().unwrap(), 0);
        }
    }
}

//! Field dimensionality: [`FieldTag`] and [`Layout`].

use crate::error::LayoutError;
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of dimensions a field may have.
pub const MAX_RANK: usize = 6;

/// Inline storage for per-dimension extents.
///
/// Sized for [`MAX_RANK`] so layouts never spill to the heap.
pub type Extents = SmallVec<[usize; MAX_RANK]>;

/// Name of a field dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldTag {
    /// Horizontal column index.
    Column,
    /// Vertical level midpoints.
    Level,
    /// Vertical level interfaces (one more than midpoints).
    InterfaceLevel,
    /// Vector component.
    Component,
    /// Time slice.
    Time,
}

impl FieldTag {
    /// Short upper-case name used in layout strings.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Column => "COL",
            Self::Level => "LEV",
            Self::InterfaceLevel => "ILEV",
            Self::Component => "CMP",
            Self::Time => "TIME",
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Ordered sequence of named dimensions and their extents.
///
/// The rank is fixed at construction. The last dimension is the one
/// padded for vectorized access (see `AllocationProperties` in
/// `stratus-field`).
///
/// # Examples
///
/// ```
/// use stratus_core::{FieldTag, Layout};
///
/// let layout = Layout::new(&[FieldTag::Column, FieldTag::Level], &[2, 5]).unwrap();
/// assert_eq!(layout.rank(), 2);
/// assert_eq!(layout.size(), 10);
/// assert_eq!(layout.to_string(), "<COL,LEV>(2,5)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    tags: SmallVec<[FieldTag; MAX_RANK]>,
    extents: Extents,
}

impl Layout {
    /// Create a layout from parallel tag and extent slices.
    ///
    /// Fails if the slices differ in length or the rank exceeds [`MAX_RANK`].
    pub fn new(tags: &[FieldTag], extents: &[usize]) -> Result<Self, LayoutError> {
        if tags.len() != extents.len() {
            return Err(LayoutError::TagExtentMismatch {
                tags: tags.len(),
                extents: extents.len(),
            });
        }
        if tags.len() > MAX_RANK {
            return Err(LayoutError::RankTooLarge { rank: tags.len() });
        }
        Ok(Self {
            tags: SmallVec::from_slice(tags),
            extents: SmallVec::from_slice(extents),
        })
    }

    /// Rank-0 layout: a single value.
    pub fn scalar() -> Self {
        Self {
            tags: SmallVec::new(),
            extents: SmallVec::new(),
        }
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.tags.len()
    }

    /// Dimension tags, outermost first.
    pub fn tags(&self) -> &[FieldTag] {
        &self.tags
    }

    /// Dimension extents, outermost first.
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Extent of dimension `i`, or `None` if `i >= rank`.
    pub fn extent(&self, i: usize) -> Option<usize> {
        self.extents.get(i).copied()
    }

    /// Extent of the first dimension carrying `tag`.
    pub fn extent_of(&self, tag: FieldTag) -> Option<usize> {
        self.tags
            .iter()
            .position(|&t| t == tag)
            .map(|i| self.extents[i])
    }

    /// Whether any dimension carries `tag`.
    pub fn has_tag(&self, tag: FieldTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Number of logical elements (product of extents; 1 for rank 0).
    pub fn size(&self) -> usize {
        self.extents.iter().product()
    }

    /// Copy of this layout with the first dimension carrying `tag` removed.
    ///
    /// Returns `None` if no dimension carries `tag`.
    pub fn strip_dim(&self, tag: FieldTag) -> Option<Self> {
        let i = self.tags.iter().position(|&t| t == tag)?;
        let mut out = self.clone();
        out.tags.remove(i);
        out.extents.remove(i);
        Some(out)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{tag}")?;
        }
        write!(f, ">(")?;
        for (i, ext) in self.extents.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{ext}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scalar_layout_has_rank_zero_and_one_element() {
        let l = Layout::scalar();
        assert_eq!(l.rank(), 0);
        assert_eq!(l.size(), 1);
        assert_eq!(l.to_string(), "<>()");
    }

    #[test]
    fn mismatched_tags_and_extents_rejected() {
        let err = Layout::new(&[FieldTag::Column], &[1, 2]).unwrap_err();
        assert_eq!(err, LayoutError::TagExtentMismatch { tags: 1, extents: 2 });
    }

    #[test]
    fn rank_seven_rejected() {
        let tags = [FieldTag::Component; 7];
        let err = Layout::new(&tags, &[1; 7]).unwrap_err();
        assert_eq!(err, LayoutError::RankTooLarge { rank: 7 });
    }

    #[test]
    fn rank_six_accepted() {
        let tags = [FieldTag::Component; 6];
        let l = Layout::new(&tags, &[2; 6]).unwrap();
        assert_eq!(l.rank(), 6);
        assert_eq!(l.size(), 64);
    }

    #[test]
    fn extent_of_and_strip_dim() {
        let l = Layout::new(
            &[FieldTag::Column, FieldTag::Component, FieldTag::Level],
            &[3, 2, 7],
        )
        .unwrap();
        assert_eq!(l.extent_of(FieldTag::Level), Some(7));
        assert_eq!(l.extent_of(FieldTag::Time), None);
        let stripped = l.strip_dim(FieldTag::Component).unwrap();
        assert_eq!(stripped.tags(), &[FieldTag::Column, FieldTag::Level]);
        assert_eq!(stripped.extents(), &[3, 7]);
        assert!(l.strip_dim(FieldTag::Time).is_none());
    }

    proptest! {
        #[test]
        fn size_is_product_of_extents(extents in prop::collection::vec(0usize..8, 0..=MAX_RANK)) {
            let tags = vec![FieldTag::Component; extents.len()];
            let l = Layout::new(&tags, &extents).unwrap();
            prop_assert_eq!(l.rank(), extents.len());
            prop_assert_eq!(l.size(), extents.iter().product::<usize>());
        }
    }
}

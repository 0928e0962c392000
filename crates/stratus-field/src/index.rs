//! Offset arithmetic over padded buffers.

use stratus_core::Extents;

/// Row-major strides for a buffer with the given padded extents.
pub(crate) fn strides_of(padded: &[usize]) -> Extents {
    let mut strides: Extents = padded.iter().map(|_| 1).collect();
    for d in (0..padded.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * padded[d + 1];
    }
    strides
}

/// Iterator over the buffer offsets of every logical element, in
/// row-major order, skipping padding.
pub(crate) struct LogicalOffsets {
    extents: Extents,
    strides: Extents,
    index: Extents,
    done: bool,
}

impl LogicalOffsets {
    pub(crate) fn new(extents: &[usize], padded: &[usize]) -> Self {
        Self {
            extents: Extents::from_slice(extents),
            strides: strides_of(padded),
            index: extents.iter().map(|_| 0).collect(),
            done: extents.contains(&0),
        }
    }
}

impl Iterator for LogicalOffsets {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let offset = self
            .index
            .iter()
            .zip(&self.strides)
            .map(|(i, s)| i * s)
            .sum();

        self.done = true;
        for d in (0..self.extents.len()).rev() {
            self.index[d] += 1;
            if self.index[d] < self.extents[d] {
                self.done = false;
                break;
            }
            self.index[d] = 0;
        }
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_row_major() {
        assert_eq!(strides_of(&[2, 3, 8]).as_slice(), &[24, 8, 1]);
        assert!(strides_of(&[]).is_empty());
    }

    #[test]
    fn offsets_skip_padding() {
        let offsets: Vec<usize> = LogicalOffsets::new(&[2, 5], &[2, 8]).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn rank_zero_yields_single_offset() {
        let offsets: Vec<usize> = LogicalOffsets::new(&[], &[]).collect();
        assert_eq!(offsets, vec![0]);
    }

    #[test]
    fn zero_extent_yields_nothing() {
        assert_eq!(LogicalOffsets::new(&[3, 0], &[3, 0]).count(), 0);
    }
}

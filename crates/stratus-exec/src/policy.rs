//! Iteration policies.

use std::ops::Range;

/// Flat iteration over `begin..end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangePolicy {
    begin: usize,
    end: usize,
}

impl RangePolicy {
    /// Iterate `begin..end`. An inverted range is empty.
    pub fn new(begin: usize, end: usize) -> Self {
        Self {
            begin,
            end: end.max(begin),
        }
    }

    /// Iterate `0..n`.
    pub fn upto(n: usize) -> Self {
        Self::new(0, n)
    }

    /// Number of iterations.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether there is nothing to do.
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The index range.
    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }
}

/// Two-level iteration: `league_size` independent units, each worked on
/// by a team of `team_size` lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamPolicy {
    league_size: usize,
    team_size: usize,
}

impl TeamPolicy {
    /// Largest team the default policy will form.
    pub const MAX_TEAM_SIZE: usize = 32;

    /// Explicit league and team sizes. A zero team size is raised to 1.
    pub fn new(league_size: usize, team_size: usize) -> Self {
        Self {
            league_size,
            team_size: team_size.max(1),
        }
    }

    /// Policy for `league_size` units whose inner loop has
    /// `inner_extent` iterations: one lane per inner iteration, capped at
    /// [`MAX_TEAM_SIZE`](Self::MAX_TEAM_SIZE).
    pub fn default_for(league_size: usize, inner_extent: usize) -> Self {
        Self::new(league_size, inner_extent.clamp(1, Self::MAX_TEAM_SIZE))
    }

    /// Number of outer units.
    pub fn league_size(&self) -> usize {
        self.league_size
    }

    /// Lanes per team.
    pub fn team_size(&self) -> usize {
        self.team_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_is_empty() {
        let p = RangePolicy::new(5, 2);
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
        assert_eq!(RangePolicy::upto(3).range(), 0..3);
    }

    #[test]
    fn default_team_size_is_clamped() {
        assert_eq!(TeamPolicy::default_for(4, 0).team_size(), 1);
        assert_eq!(TeamPolicy::default_for(4, 3).team_size(), 3);
        assert_eq!(
            TeamPolicy::default_for(4, 1000).team_size(),
            TeamPolicy::MAX_TEAM_SIZE
        );
        assert_eq!(TeamPolicy::new(2, 0).team_size(), 1);
    }
}

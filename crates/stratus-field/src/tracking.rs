//! Last-update bookkeeping for a field.

use stratus_core::TimeStamp;

use crate::error::FieldError;

/// Records when a field was last written.
///
/// The timestamp never moves backwards. Comparing two fields'
/// timestamps tells which one is stale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldTracking {
    time_stamp: Option<TimeStamp>,
    num_updates: u64,
}

impl FieldTracking {
    /// Tracking with no recorded update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the last update, if any.
    pub fn time_stamp(&self) -> Option<TimeStamp> {
        self.time_stamp
    }

    /// Number of successful updates.
    pub fn num_updates(&self) -> u64 {
        self.num_updates
    }

    /// Record an update at `ts`.
    ///
    /// Equal timestamps are accepted (a field may be rewritten within a
    /// step); earlier ones fail with [`FieldError::TimestampRegression`].
    pub fn update_time_stamp(&mut self, ts: TimeStamp) -> Result<(), FieldError> {
        if let Some(previous) = self.time_stamp {
            if ts < previous {
                return Err(FieldError::TimestampRegression {
                    previous,
                    attempted: ts,
                });
            }
        }
        self.time_stamp = Some(ts);
        self.num_updates += 1;
        Ok(())
    }

    /// Whether this field was last updated before `other`.
    ///
    /// A field never updated is stale relative to one that was; two
    /// never-updated fields are not stale relative to each other.
    pub fn is_stale_relative_to(&self, other: &FieldTracking) -> bool {
        match (self.time_stamp, other.time_stamp) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: u64) -> TimeStamp {
        TimeStamp::new((2022, 1, 1), (0, 0, 0))
            .unwrap()
            .advanced_by(secs)
    }

    #[test]
    fn updates_are_monotone() {
        let mut t = FieldTracking::new();
        t.update_time_stamp(ts(10)).unwrap();
        t.update_time_stamp(ts(10)).unwrap();
        t.update_time_stamp(ts(20)).unwrap();
        assert_eq!(t.num_updates(), 3);
        assert_eq!(
            t.update_time_stamp(ts(5)).unwrap_err(),
            FieldError::TimestampRegression {
                previous: ts(20),
                attempted: ts(5)
            }
        );
        assert_eq!(t.time_stamp(), Some(ts(20)));
        assert_eq!(t.num_updates(), 3);
    }

    #[test]
    fn staleness() {
        let mut a = FieldTracking::new();
        let mut b = FieldTracking::new();
        assert!(!a.is_stale_relative_to(&b));
        b.update_time_stamp(ts(0)).unwrap();
        assert!(a.is_stale_relative_to(&b));
        a.update_time_stamp(ts(60)).unwrap();
        assert!(b.is_stale_relative_to(&a));
        assert!(!a.is_stale_relative_to(&b));
    }
}

//! Error types for core value construction and parameter lookup.

use std::error::Error;
use std::fmt;

/// Errors from [`Layout`](crate::Layout) construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// More dimensions than [`MAX_RANK`](crate::MAX_RANK).
    RankTooLarge {
        /// The requested rank.
        rank: usize,
    },
    /// Tag and extent lists have different lengths.
    TagExtentMismatch {
        /// Number of tags supplied.
        tags: usize,
        /// Number of extents supplied.
        extents: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankTooLarge { rank } => {
                write!(f, "layout rank {rank} exceeds maximum of {}", crate::MAX_RANK)
            }
            Self::TagExtentMismatch { tags, extents } => {
                write!(f, "layout has {tags} tags but {extents} extents")
            }
        }
    }
}

impl Error for LayoutError {}

/// Errors from [`TimeStamp`](crate::TimeStamp) construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeStampError {
    /// Month or day out of range for the Gregorian calendar.
    InvalidDate {
        /// Year.
        year: i32,
        /// Month (1-12).
        month: u32,
        /// Day of month.
        day: u32,
    },
    /// Hour, minute or second out of range.
    InvalidTime {
        /// Hour (0-23).
        hour: u32,
        /// Minute (0-59).
        minute: u32,
        /// Second (0-59).
        second: u32,
    },
}

impl fmt::Display for TimeStampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate { year, month, day } => {
                write!(f, "invalid date {year:04}-{month:02}-{day:02}")
            }
            Self::InvalidTime {
                hour,
                minute,
                second,
            } => {
                write!(f, "invalid time of day {hour:02}:{minute:02}:{second:02}")
            }
        }
    }
}

impl Error for TimeStampError {}

/// Errors from [`ParameterList`](crate::ParameterList) lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterError {
    /// The key is not present.
    MissingParameter {
        /// Name of the list searched.
        list: String,
        /// The missing key.
        key: String,
    },
    /// The key is present but holds a different value type.
    WrongType {
        /// The key.
        key: String,
        /// Type name that was requested.
        expected: &'static str,
        /// Type name actually stored.
        found: &'static str,
    },
    /// No sublist with the given name.
    MissingSublist {
        /// Name of the list searched.
        list: String,
        /// The missing sublist.
        name: String,
    },
    /// A value is present and well-typed but outside its valid range.
    InvalidValue {
        /// The key.
        key: String,
        /// Description of the constraint.
        reason: String,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter { list, key } => {
                write!(f, "parameter '{key}' not found in list '{list}'")
            }
            Self::WrongType {
                key,
                expected,
                found,
            } => {
                write!(f, "parameter '{key}' is {found}, requested {expected}")
            }
            Self::MissingSublist { list, name } => {
                write!(f, "sublist '{name}' not found in list '{list}'")
            }
            Self::InvalidValue { key, reason } => {
                write!(f, "parameter '{key}' is invalid: {reason}")
            }
        }
    }
}

impl Error for ParameterError {}

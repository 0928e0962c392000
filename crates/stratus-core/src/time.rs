//! Simulation time: [`TimeStamp`] and [`RunType`].

use crate::error::TimeStampError;
use std::fmt;

const SECONDS_PER_DAY: u32 = 86_400;

/// Whether a run starts from initial conditions or a restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunType {
    /// Cold start from initial conditions.
    Initial,
    /// Continuation from a restart.
    Restart,
}

/// Ordered simulation time: a Gregorian date plus seconds of day.
///
/// Field ordering compares year, month, day, then seconds, which is the
/// chronological order.
///
/// # Examples
///
/// ```
/// use stratus_core::TimeStamp;
///
/// let mut t = TimeStamp::new((2022, 12, 31), (23, 59, 0)).unwrap();
/// let t0 = t;
/// t.advance(120);
/// assert!(t > t0);
/// assert_eq!(t.to_string(), "2023-01-01-00060");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeStamp {
    year: i32,
    month: u32,
    day: u32,
    seconds: u32,
}

impl TimeStamp {
    /// Create a timestamp from `(year, month, day)` and `(hour, minute, second)`.
    pub fn new(date: (i32, u32, u32), time: (u32, u32, u32)) -> Result<Self, TimeStampError> {
        let (year, month, day) = date;
        let (hour, minute, second) = time;
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(TimeStampError::InvalidDate { year, month, day });
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(TimeStampError::InvalidTime {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            year,
            month,
            day,
            seconds: hour * 3600 + minute * 60 + second,
        })
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of month, starting at 1.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Seconds elapsed since midnight.
    pub fn seconds_of_day(&self) -> u32 {
        self.seconds
    }

    /// Move forward by `seconds`, rolling over days, months and years.
    pub fn advance(&mut self, seconds: u64) {
        let total = u64::from(self.seconds) + seconds;
        let mut days = total / u64::from(SECONDS_PER_DAY);
        self.seconds = (total % u64::from(SECONDS_PER_DAY)) as u32;
        while days > 0 {
            let remaining_in_month = u64::from(days_in_month(self.year, self.month) - self.day);
            if days <= remaining_in_month {
                self.day += days as u32;
                break;
            }
            days -= remaining_in_month + 1;
            self.day = 1;
            if self.month == 12 {
                self.month = 1;
                self.year += 1;
            } else {
                self.month += 1;
            }
        }
    }

    /// A copy advanced by `seconds`.
    pub fn advanced_by(mut self, seconds: u64) -> Self {
        self.advance(seconds);
        self
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}-{:05}",
            self.year, self.month, self.day, self.seconds
        )
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 0,
    }
}

//! Date-range filtering
//!
//! The range slider reports a pair of indices into a table's unique dates.
//! Each table resolves the pair against its *own* unique dates, so weekly
//! and total tables can share one slider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::{TableSlice, TimeSeriesTable};

/// Inclusive pair of indices into a table's unique dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: usize,
    pub end: usize,
}

impl DateRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The range covering `len` unique dates
    pub fn full(len: usize) -> Self {
        Self {
            start: 0,
            end: len.saturating_sub(1),
        }
    }

    /// A range of one date
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Order the pair and clamp it to `[0, len - 1]`
    ///
    /// The slider never produces out-of-domain values, but the update
    /// endpoint accepts arbitrary JSON.
    pub fn clamped(self, len: usize) -> Self {
        let max = len.saturating_sub(1);
        let (start, end) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        Self {
            start: start.min(max),
            end: end.min(max),
        }
    }

    /// Resolve the indices to calendar dates. `None` for an empty date set.
    pub fn resolve(self, dates: &[NaiveDate]) -> Option<(NaiveDate, NaiveDate)> {
        if dates.is_empty() {
            return None;
        }
        let range = self.clamped(dates.len());
        Some((dates[range.start], dates[range.end]))
    }

    /// Rows of `table` whose date lies within the range, inclusive
    pub fn apply<'a>(self, table: &'a TimeSeriesTable) -> TableSlice<'a> {
        match self.resolve(table.unique_dates()) {
            Some((start, end)) => table.slice_between(start, end),
            // empty table: nothing to select
            None => table.full_slice(),
        }
    }
}

impl From<[usize; 2]> for DateRange {
    fn from(pair: [usize; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<DateRange> for [usize; 2] {
    fn from(range: DateRange) -> Self {
        [range.start, range.end]
    }
}

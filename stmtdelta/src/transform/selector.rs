//! Counter windows and their validation against a candidate list.

use super::TransformError;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Error for a window that cannot address any candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Counters are 1-based.
    #[error("counter must be at least 1")]
    ZeroCounter,
    /// The upper counter is below the lower one.
    #[error("to-counter {high} is smaller than counter {low}")]
    Inverted {
        /// Lower counter
        low: usize,
        /// Upper counter
        high: usize,
    },
}

/// Inclusive run of counters `[low, high]`, counted from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionWindow {
    low: usize,
    high: usize,
}

impl SelectionWindow {
    /// A window from `low` to `high`, both inclusive.
    pub fn new(low: usize, high: usize) -> Result<Self, SelectionError> {
        if low == 0 {
            return Err(SelectionError::ZeroCounter);
        }
        if high < low {
            return Err(SelectionError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    /// A window selecting the single counter `counter`.
    pub fn single(counter: usize) -> Result<Self, SelectionError> {
        Self::new(counter, counter)
    }

    /// Lower counter.
    #[must_use]
    pub fn low(self) -> usize {
        self.low
    }

    /// Upper counter.
    #[must_use]
    pub fn high(self) -> usize {
        self.high
    }

    /// Number of counters covered.
    #[must_use]
    pub fn width(self) -> usize {
        self.high - self.low + 1
    }

    /// The same window narrowed to its lower counter.
    #[must_use]
    pub fn collapsed(self) -> Self {
        Self {
            low: self.low,
            high: self.low,
        }
    }
}

impl fmt::Display for SelectionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}..={}", self.low, self.high)
        }
    }
}

/// List positions selected by a validated window, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    /// Position of the window's upper counter.
    pub first: usize,
    /// Position of the window's lower counter.
    pub last: usize,
}

impl IndexRange {
    /// The positions as an inclusive range.
    #[must_use]
    pub fn positions(self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Check `window` against `total` candidates.
///
/// Fails only when the lower counter exceeds `total`; an upper counter past
/// the end is clamped to the first discovered candidate.
pub fn validate(window: SelectionWindow, total: usize) -> Result<IndexRange, TransformError> {
    if window.low > total {
        return Err(TransformError::OutOfRange {
            counter: window.low,
            available: total,
        });
    }
    let high = window.high.min(total);
    if high < window.high {
        tracing::debug!(
            requested = window.high,
            clamped = high,
            "to-counter clamped to available instances"
        );
    }
    Ok(IndexRange {
        first: total - high,
        last: total - window.low,
    })
}

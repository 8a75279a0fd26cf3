//! Cancellation deadline policy.
//!
//! A meal slot is cancellable until a fixed cutoff hour on the morning of
//! the meal day, measured on the institution's wall clock. The decision is
//! a pure function of the meal date and a caller-supplied "now"; callers in
//! the API layer always pass the server clock. Client-supplied timestamps
//! never reach this policy.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::CoreError;

/// Cutoff hour used when the institution has not configured one.
pub const DEFAULT_CUTOFF_HOUR: u32 = 8;

/// Deadline policy for meal cancellations.
///
/// Holds the institution's cutoff hour (0-23). The slot for `meal_date` is
/// cancellable strictly before `meal_date` at `cutoff_hour:00:00`; at the
/// exact cutoff instant it is no longer cancellable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationDeadline {
    cutoff_hour: u32,
}

impl CancellationDeadline {
    /// Create a policy with the given cutoff hour.
    ///
    /// Fails with a validation error if `cutoff_hour` is not a valid hour
    /// of day (0-23).
    pub fn new(cutoff_hour: u32) -> Result<Self, CoreError> {
        if cutoff_hour >= 24 {
            return Err(CoreError::Validation(format!(
                "Cutoff hour must be between 0 and 23, got {cutoff_hour}"
            )));
        }
        Ok(Self { cutoff_hour })
    }

    /// The configured cutoff hour.
    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// The instant at which the slot for `meal_date` stops being cancellable.
    pub fn cutoff_instant(&self, meal_date: NaiveDate) -> NaiveDateTime {
        meal_date
            .and_hms_opt(self.cutoff_hour, 0, 0)
            .expect("cutoff hour is validated to be 0-23")
    }

    /// Whether the slot for `meal_date` is still cancellable at `now`.
    ///
    /// `now` must come from the server clock, expressed in the
    /// institution's local wall time.
    pub fn is_cancellable(&self, meal_date: NaiveDate, now: NaiveDateTime) -> bool {
        now < self.cutoff_instant(meal_date)
    }
}

impl Default for CancellationDeadline {
    fn default() -> Self {
        Self {
            cutoff_hour: DEFAULT_CUTOFF_HOUR,
        }
    }
}

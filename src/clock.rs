use std::cell::Cell;

use chrono::{Days, Local, NaiveDate};

/// Source of the current calendar date for loan bookkeeping
pub trait Clock {
    /// The date used as "today" for borrow, return and lateness checks
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date at call time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a settable date
#[derive(Debug, Clone)]
pub struct FixedClock {
    /// The date reported by `today`
    date: Cell<NaiveDate>,
}

impl FixedClock {
    /// Create a clock that reports `date` until moved
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self { date: Cell::new(date) }
    }

    /// Move the clock forward by whole days, saturating at the last representable date
    pub fn advance_days(&self, days: u64) {
        let current = self.date.get();
        self.date.set(current.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX));
    }

    /// Jump the clock to a specific date
    pub fn set(&self, date: NaiveDate) {
        self.date.set(date);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

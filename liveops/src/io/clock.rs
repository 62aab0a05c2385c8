//! Source of "today" for operations that default to the current date.

use chrono::{Local, NaiveDate};

pub trait Clock {
    /// Today's date in the local time zone.
    fn today(&self) -> NaiveDate;
}

/// Clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

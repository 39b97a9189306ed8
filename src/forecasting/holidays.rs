use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Holiday dates with the window of surrounding days that share the effect.
///
/// A date is covered when it falls in `[holiday - lower_window, holiday + upper_window]`
/// for any holiday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
    lower_window: i64,
    upper_window: i64,
}

impl HolidayCalendar {
    pub fn new<I>(dates: I, lower_window: i64, upper_window: i64) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            dates: dates.into_iter().collect(),
            lower_window: lower_window.max(0),
            upper_window: upper_window.max(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        let first = date - Duration::days(self.upper_window);
        let last = date + Duration::days(self.lower_window);
        self.dates.range(first..=last).next().is_some()
    }
}

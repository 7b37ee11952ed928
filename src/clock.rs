//! Wall-clock access, injected so date rollover is testable.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};

pub trait Clock {
    /// Today's calendar date in the user's local timezone.
    fn today(&self) -> NaiveDate;

    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as ISO-8601 text, e.g. `2025-08-01T09:30:00.000Z`.
    fn now_iso(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// The real clock. chrono's `wasmbind` backend reads `Date` in the browser.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Format a stored ISO timestamp for the activity list in local time.
/// Unparsable input is shown as-is.
pub fn display_local(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(t) => t.with_timezone(&Local).format("%Y/%m/%d %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
pub mod fixed {
    use std::cell::Cell;

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use super::Clock;

    /// A clock pinned to a date that tests can move forward.
    pub struct FixedClock {
        date: Cell<NaiveDate>,
    }

    impl FixedClock {
        pub fn new(y: i32, m: u32, d: u32) -> Self {
            Self {
                date: Cell::new(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            }
        }

        pub fn advance_days(&self, days: u64) {
            let next = self.date.get() + chrono::Days::new(days);
            self.date.set(next);
        }
    }

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.date.get()
        }

        fn now(&self) -> DateTime<Utc> {
            let d = self.date.get();
            Utc.from_utc_datetime(&d.and_hms_opt(9, 30, 0).unwrap())
        }
    }
}

//! Daily free-draw counter.
//!
//! The record is `{date, value}`. Every read compares the record's date with
//! today; a stale or missing record is replaced by `{today, default}`. There is
//! no midnight timer, so a tab left open overnight rolls over on its next read.

use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::KEY_FREE_DRAWS;

use super::kv::KvStore;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub value: u32,
}

pub struct DailyCounter {
    store: Rc<KvStore>,
    clock: Rc<dyn Clock>,
    default_value: u32,
    /// Held in memory so the counter still works when persistence does not.
    record: DailyRecord,
}

impl DailyCounter {
    pub fn load(store: Rc<KvStore>, clock: Rc<dyn Clock>, default_value: u32) -> Self {
        let record = store
            .get(KEY_FREE_DRAWS)
            .and_then(|raw| serde_json::from_str::<DailyRecord>(&raw).ok())
            .unwrap_or_else(|| DailyRecord {
                date: clock.today(),
                value: default_value,
            });
        let mut counter = Self {
            store,
            clock,
            default_value,
            record,
        };
        counter.roll_over();
        counter.persist();
        counter
    }

    /// Current value, resetting first if the calendar day changed.
    pub fn read(&mut self) -> u32 {
        if self.roll_over() {
            self.persist();
        }
        self.record.value
    }

    /// Value as of today without touching storage; for display.
    pub fn peek(&self) -> u32 {
        if self.record.date == self.clock.today() {
            self.record.value
        } else {
            self.default_value
        }
    }

    pub fn write(&mut self, value: u32) {
        self.record = DailyRecord {
            date: self.clock.today(),
            value,
        };
        self.persist();
    }

    /// Take one draw if any remain. Returns false (and changes nothing) at 0.
    pub fn try_consume(&mut self) -> bool {
        let v = self.read();
        if v == 0 {
            return false;
        }
        self.write(v - 1);
        true
    }

    /// Forget the stored record and start over at the default.
    pub fn reset(&mut self) {
        self.store.remove(KEY_FREE_DRAWS);
        self.record = DailyRecord {
            date: self.clock.today(),
            value: self.default_value,
        };
    }

    fn roll_over(&mut self) -> bool {
        let today = self.clock.today();
        if self.record.date == today {
            return false;
        }
        self.record = DailyRecord {
            date: today,
            value: self.default_value,
        };
        true
    }

    fn persist(&self) {
        if let Ok(json) = serde_json::to_string(&self.record) {
            self.store.set(KEY_FREE_DRAWS, &json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fixed::FixedClock;
    use crate::store::kv::failing::FailingBackend;

    fn setup() -> (Rc<KvStore>, Rc<FixedClock>) {
        (
            Rc::new(KvStore::in_memory()),
            Rc::new(FixedClock::new(2025, 8, 1)),
        )
    }

    #[test]
    fn fresh_counter_starts_at_default_and_persists() {
        let (store, clock) = setup();
        let mut c = DailyCounter::load(store.clone(), clock, 3);
        assert_eq!(c.read(), 3);
        assert_eq!(
            store.get(KEY_FREE_DRAWS).as_deref(),
            Some(r#"{"date":"2025-08-01","value":3}"#)
        );
    }

    #[test]
    fn same_day_reload_keeps_value() {
        let (store, clock) = setup();
        let mut c = DailyCounter::load(store.clone(), clock.clone(), 3);
        c.write(1);
        drop(c);
        let mut again = DailyCounter::load(store, clock, 3);
        assert_eq!(again.read(), 1);
    }

    #[test]
    fn later_day_reload_resets_to_default() {
        let (store, clock) = setup();
        let mut c = DailyCounter::load(store.clone(), clock.clone(), 3);
        c.write(0);
        drop(c);
        clock.advance_days(1);
        let mut again = DailyCounter::load(store.clone(), clock, 3);
        assert_eq!(again.read(), 3);
        assert!(store.get(KEY_FREE_DRAWS).unwrap().contains("2025-08-02"));
    }

    #[test]
    fn rollover_happens_lazily_during_a_session() {
        let (store, clock) = setup();
        let mut c = DailyCounter::load(store, clock.clone(), 3);
        c.write(0);
        assert_eq!(c.read(), 0);
        clock.advance_days(1);
        assert_eq!(c.peek(), 3);
        assert_eq!(c.read(), 3);
    }

    #[test]
    fn corrupt_record_falls_back_to_default() {
        let (store, clock) = setup();
        store.set(KEY_FREE_DRAWS, "{not json");
        let mut c = DailyCounter::load(store.clone(), clock.clone(), 3);
        assert_eq!(c.read(), 3);

        store.set(KEY_FREE_DRAWS, r#"{"date":"2025-08-01","value":-4}"#);
        let mut c = DailyCounter::load(store, clock, 3);
        assert_eq!(c.read(), 3);
    }

    #[test]
    fn try_consume_stops_at_zero() {
        let (store, clock) = setup();
        let mut c = DailyCounter::load(store, clock, 2);
        assert!(c.try_consume());
        assert!(c.try_consume());
        assert!(!c.try_consume());
        assert_eq!(c.read(), 0);
    }

    #[test]
    fn reset_removes_key_and_restores_default() {
        let (store, clock) = setup();
        let mut c = DailyCounter::load(store.clone(), clock, 3);
        c.write(0);
        c.reset();
        assert_eq!(store.get(KEY_FREE_DRAWS), None);
        assert_eq!(c.read(), 3);
    }

    #[test]
    fn works_in_memory_when_storage_fails() {
        let store = Rc::new(KvStore::new(Box::new(FailingBackend)));
        let clock = Rc::new(FixedClock::new(2025, 8, 1));
        let mut c = DailyCounter::load(store, clock, 3);
        assert!(c.try_consume());
        assert_eq!(c.read(), 2);
    }
}

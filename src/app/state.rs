//! Session state: persistent stores plus the transient phase machine.

use std::rc::Rc;

use crate::clock::Clock;
use crate::config::GachaConfig;
use crate::gacha::Gacha;
use crate::store::activity::{ActivityLog, LogEntry};
use crate::store::covers::CoverStore;
use crate::store::daily::DailyCounter;
use crate::store::kv::KvStore;
use crate::timer::Countdown;

/// Top-level screen. Each variant owns the data (and countdown) that only
/// makes sense while it is active.
#[derive(Debug, PartialEq)]
pub enum Phase {
    Home,
    Play(PlayState),
    Proof(ProofState),
    /// Holds the entry that was just logged, for the summary screen.
    Cleared(LogEntry),
}

#[derive(Debug, PartialEq)]
pub struct PlayState {
    pub book_id: &'static str,
    /// `None` until the first draw for this book succeeds.
    pub action: Option<String>,
    pub countdown: Countdown,
}

#[derive(Debug, PartialEq)]
pub struct ProofState {
    pub book_id: &'static str,
    /// The action that was on screen when "complete" was pressed.
    pub action: String,
    pub photo: Option<String>,
}

/// Modal dialogs layered over the current phase.
#[derive(Debug, PartialEq)]
pub enum Dialog {
    /// Out of free draws: offer the advertisement.
    AdAsk,
    /// Simulated advertisement with its own countdown.
    AdView(Countdown),
}

/// What the page should open a file picker for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickTarget {
    Cover(&'static str),
    ProofPhoto,
}

/// A file the user chose. Proof photos only need the name.
#[derive(Debug)]
pub struct PickedFile {
    pub target: PickTarget,
    pub name: String,
    pub bytes: Vec<u8>,
}

pub struct Session {
    pub config: GachaConfig,
    pub clock: Rc<dyn Clock>,
    pub counter: DailyCounter,
    pub covers: CoverStore,
    pub log: ActivityLog,
    pub gacha: Gacha,

    pub phase: Phase,
    pub dialog: Option<Dialog>,
    /// One-line status shown under the header.
    pub notice: Option<String>,
    /// Set by a control that needs a file; consumed by the page shell.
    pub pending_pick: Option<PickTarget>,
    /// Cover bytes waiting to be normalized on the next tick.
    pub pending_cover: Option<(&'static str, Vec<u8>)>,
}

impl Session {
    pub fn new(
        store: Rc<KvStore>,
        clock: Rc<dyn Clock>,
        config: GachaConfig,
        gacha: Gacha,
    ) -> Self {
        let counter = DailyCounter::load(store.clone(), clock.clone(), config.daily_free_draws);
        let covers = CoverStore::load(store.clone());
        let log = ActivityLog::load(store);
        Self {
            config,
            clock,
            counter,
            covers,
            log,
            gacha,
            phase: Phase::Home,
            dialog: None,
            notice: None,
            pending_pick: None,
            pending_cover: None,
        }
    }

    /// Free draws left today, for the header.
    pub fn free_draws(&self) -> u32 {
        self.counter.peek()
    }

    pub fn new_countdown(&self, seconds: u32) -> Countdown {
        Countdown::start(seconds, self.config.ticks_per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::fixed::FixedClock;

    #[test]
    fn new_session_starts_home_with_defaults() {
        let s = Session::new(
            Rc::new(KvStore::in_memory()),
            Rc::new(FixedClock::new(2025, 8, 1)),
            GachaConfig::default(),
            Gacha::with_seed(1),
        );
        assert_eq!(s.phase, Phase::Home);
        assert!(s.dialog.is_none());
        assert_eq!(s.free_draws(), 3);
        assert!(s.log.is_empty());
        assert!(s.pending_pick.is_none());
        assert!(s.pending_cover.is_none());
    }
}

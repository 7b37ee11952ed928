//! Owned one-second countdowns driven by discrete ticks.
//!
//! A `Countdown` has no external timer handle: it only moves when its owner
//! calls [`Countdown::tick`]. Whatever state holds the countdown (the play
//! phase, the ad dialog) owns its lifetime, so leaving that state drops the
//! countdown and nothing keeps ticking behind the user's back.

#[derive(Clone, Debug, PartialEq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
    ticks_per_second: u32,
    /// Ticks accumulated toward the next whole second.
    partial: u32,
}

impl Countdown {
    /// A running countdown.
    pub fn start(seconds: u32, ticks_per_second: u32) -> Self {
        Self {
            remaining: seconds,
            running: true,
            ticks_per_second: ticks_per_second.max(1),
            partial: 0,
        }
    }

    /// A countdown that waits for `toggle` or `restart`.
    pub fn paused(seconds: u32, ticks_per_second: u32) -> Self {
        Self {
            running: false,
            ..Self::start(seconds, ticks_per_second)
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Reset to `seconds` and run.
    pub fn restart(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.partial = 0;
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Advance by `delta_ticks`. Returns the number of whole seconds that
    /// elapsed. Stops decrementing at zero; pausing keeps `remaining`.
    pub fn tick(&mut self, delta_ticks: u32) -> u32 {
        if !self.running || self.remaining == 0 {
            return 0;
        }
        self.partial += delta_ticks;
        let secs = (self.partial / self.ticks_per_second).min(self.remaining);
        self.partial %= self.ticks_per_second;
        self.remaining -= secs;
        if self.remaining == 0 {
            self.partial = 0;
        }
        secs
    }

    /// `MM:SS`.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

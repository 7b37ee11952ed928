//! Frame timestamps to fixed ticks.
//!
//! `draw_web()` fires at display rate with an irregular delta. `FrameClock`
//! accumulates that delta and hands out whole ticks, so the session (and its
//! countdowns) only ever sees integer tick counts.
//!
//! Browsers stop frame callbacks while the tab is hidden. The whole gap is
//! handed out on the next frame, so a running countdown keeps wall-clock time
//! while the user is in another app.

pub struct FrameClock {
    ms_per_tick: f64,
    /// Milliseconds received but not yet handed out as ticks.
    carry_ms: f64,
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            carry_ms: 0.0,
            last_ms: None,
        }
    }

    /// Feed `performance.now()`; returns the ticks to apply this frame.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);

        self.carry_ms += delta;
        let ticks = (self.carry_ms / self.ms_per_tick) as u32;
        self.carry_ms -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Countdown;

    #[test]
    fn first_frame_is_zero() {
        let mut fc = FrameClock::new(10);
        assert_eq!(fc.advance(12_345.0), 0);
    }

    #[test]
    fn whole_ticks_with_carry() {
        let mut fc = FrameClock::new(10);
        fc.advance(0.0);
        assert_eq!(fc.advance(150.0), 1);
        assert_eq!(fc.advance(200.0), 1); // 50ms carried + 50ms
        assert_eq!(fc.advance(250.0), 0);
    }

    #[test]
    fn hidden_tab_gap_is_handed_out_in_full() {
        let mut fc = FrameClock::new(10);
        fc.advance(0.0);
        assert_eq!(fc.advance(60_000.0), 600);
    }

    /// 2 s of frames, 30 s with none, 1 s of frames.
    fn frames_with_gap(fc: &mut FrameClock, mut on_ticks: impl FnMut(u32)) {
        let frame = 1000.0 / 60.0;
        let mut t = 0.0;
        on_ticks(fc.advance(t));
        for _ in 0..120 {
            t += frame;
            on_ticks(fc.advance(t));
        }
        t += 30_000.0;
        on_ticks(fc.advance(t));
        for _ in 0..60 {
            t += frame;
            on_ticks(fc.advance(t));
        }
    }

    #[test]
    fn running_countdown_keeps_wall_time_across_a_gap() {
        let mut fc = FrameClock::new(10);
        let mut c = Countdown::start(60, 10);
        frames_with_gap(&mut fc, |n| {
            c.tick(n);
        });
        assert!((26..=28).contains(&c.remaining()), "got {}", c.remaining());
    }

    #[test]
    fn paused_countdown_ignores_a_gap() {
        let mut fc = FrameClock::new(10);
        let mut c = Countdown::paused(60, 10);
        frames_with_gap(&mut fc, |n| {
            c.tick(n);
        });
        assert_eq!(c.remaining(), 60);
    }

    #[test]
    fn clock_going_backwards_yields_nothing() {
        let mut fc = FrameClock::new(10);
        fc.advance(1_000.0);
        assert_eq!(fc.advance(500.0), 0);
        assert_eq!(fc.advance(600.0), 1);
    }

    #[test]
    fn one_second_of_60fps_is_about_ten_ticks() {
        let mut fc = FrameClock::new(10);
        fc.advance(0.0);
        let total: u32 = (1..=60).map(|i| fc.advance(i as f64 * 16.667)).sum();
        assert!((9..=11).contains(&total), "got {total}");
    }
}

//! Pure stopwatch logic with no platform dependencies.
//! Testable on host; the hosting shell supplies the [`Scheduler`].

mod controller;
mod schedule;

use std::time::Duration;

pub use controller::{lap_rows, ButtonColor, ButtonFace, Controls, LapRow, Phase, TimerController};
pub use schedule::{ScheduleHandle, Scheduler, Slot, Tick};

/// Tick interval and per-tick increment, in milliseconds.
pub const TICK_MS: u64 = 35;

/// Elapsed-time counter advanced by a fixed increment on every scheduled tick.
#[derive(Debug)]
pub struct Accumulator {
    slot: Slot,
    tick_ms: u64,
    elapsed_ms: u64,
    schedule: Option<ScheduleHandle>,
}

impl Accumulator {
    pub fn new(slot: Slot, tick_ms: u64) -> Self {
        Self {
            slot,
            tick_ms,
            elapsed_ms: 0,
            schedule: None,
        }
    }

    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S) {
        if self.schedule.is_some() {
            return;
        }
        let interval = Duration::from_millis(self.tick_ms);
        self.schedule = Some(scheduler.register(interval, self.slot));
    }

    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.schedule.take() {
            scheduler.cancel(handle);
        }
    }

    /// Always stops before zeroing, so no registration outlives a reset.
    pub fn reset<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.stop(scheduler);
        self.elapsed_ms = 0;
    }

    /// Advance by one increment. Ticks from a cancelled or foreign
    /// registration are ignored; returns whether the tick was applied.
    pub fn tick(&mut self, handle: ScheduleHandle) -> bool {
        if self.schedule != Some(handle) {
            return false;
        }
        self.elapsed_ms += self.tick_ms;
        true
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    pub fn display_text(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }
}

fn format_cs(cs: u64) -> String {
    let minutes = cs / 6000;
    let rem = cs % 6000;
    format!("{:02}:{:02}.{:02}", minutes, rem / 100, rem % 100)
}

/// Format milliseconds as "MM:SS.ss".
///
/// Rounds half-up to whole centiseconds before splitting, so 9995 ms reads
/// "00:10.00". Minutes are not wrapped into hours.
pub fn format_elapsed(ms: u64) -> String {
    format_cs(ms.saturating_add(5) / 10)
}

/// Format fractional seconds as "MM:SS.ss", rounding once, half-up, to whole
/// centiseconds. Negative and NaN read as zero.
pub fn format_seconds(secs: f64) -> String {
    let cs = (secs.max(0.0) * 100.0 + 0.5).floor() as u64;
    format_cs(cs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "00:00.00");
        assert_eq!(format_seconds(65.0), "01:05.00");
        assert_eq!(format_seconds(599.999), "10:00.00");
        assert_eq!(format_seconds(3600.0), "60:00.00");
        assert_eq!(format_seconds(6000.0), "100:00.00");
    }

    #[test]
    fn test_format_rounds_half_up() {
        assert_eq!(format_elapsed(175), "00:00.18");
        assert_eq!(format_elapsed(174), "00:00.17");
        assert_eq!(format_elapsed(9_995), "00:10.00");
        assert_eq!(format_elapsed(59_994), "00:59.99");
        assert_eq!(format_elapsed(59_995), "01:00.00");
        assert_eq!(format_seconds(0.175), "00:00.18");
    }

    #[test]
    fn test_format_seconds_rounds_once() {
        assert_eq!(format_seconds(0.0049), "00:00.00");
        assert_eq!(format_seconds(0.0051), "00:00.01");
        assert_eq!(format_seconds(599.9949), "09:59.99");

        // Just under half a centisecond stays down, just over goes up.
        for cs in (0..200_000u64).step_by(7) {
            let base = cs as f64 / 100.0;
            assert_eq!(format_seconds(base + 0.0049), format_cs(cs), "cs={}", cs);
            assert_eq!(format_seconds(base + 0.0051), format_cs(cs + 1), "cs={}", cs);
        }
    }

    #[test]
    fn test_format_pads_seconds() {
        assert_eq!(format_elapsed(5_230), "00:05.23");
        assert_eq!(format_elapsed(125_070), "02:05.07");
    }

    #[test]
    fn test_format_seconds_clamps_garbage() {
        assert_eq!(format_seconds(-3.0), "00:00.00");
        assert_eq!(format_seconds(f64::NAN), "00:00.00");
    }

    #[test]
    fn test_accumulator_counts_ticks_exactly() {
        let mut sched = ManualScheduler::default();
        let mut acc = Accumulator::new(Slot::Main, TICK_MS);
        acc.start(&mut sched);
        let tick = sched.fire(Slot::Main).unwrap();
        for n in 1..=1000u64 {
            assert!(acc.tick(tick.handle));
            assert_eq!(acc.elapsed_ms(), n * 35);
        }
        assert_eq!(acc.elapsed_seconds(), 35.0);
    }

    #[test]
    fn test_accumulator_start_is_idempotent() {
        let mut sched = ManualScheduler::default();
        let mut acc = Accumulator::new(Slot::Lap, TICK_MS);
        acc.start(&mut sched);
        acc.start(&mut sched);
        assert_eq!(sched.live.len(), 1);
        assert_eq!(sched.live[0].2, Duration::from_millis(35));
    }

    #[test]
    fn test_accumulator_ignores_ticks_after_stop() {
        let mut sched = ManualScheduler::default();
        let mut acc = Accumulator::new(Slot::Main, TICK_MS);
        acc.start(&mut sched);
        let stale = sched.fire(Slot::Main).unwrap();
        acc.tick(stale.handle);

        acc.stop(&mut sched);
        acc.stop(&mut sched);
        assert!(!acc.is_running());
        assert_eq!(sched.cancelled, vec![stale.handle]);
        assert!(!acc.tick(stale.handle));
        assert_eq!(acc.elapsed_ms(), 35);

        // Resuming registers afresh; the old handle stays dead.
        acc.start(&mut sched);
        assert!(!acc.tick(stale.handle));
        let fresh = sched.fire(Slot::Main).unwrap();
        assert!(acc.tick(fresh.handle));
        assert_eq!(acc.elapsed_ms(), 70);
    }

    #[test]
    fn test_accumulator_reset_from_any_state() {
        let mut sched = ManualScheduler::default();
        let mut acc = Accumulator::new(Slot::Main, TICK_MS);

        acc.reset(&mut sched);
        assert_eq!(acc.elapsed_ms(), 0);
        assert!(!acc.is_running());

        acc.start(&mut sched);
        let tick = sched.fire(Slot::Main).unwrap();
        acc.tick(tick.handle);
        acc.reset(&mut sched);
        assert_eq!(acc.elapsed_ms(), 0);
        assert!(!acc.is_running());
        assert!(sched.live.is_empty());
        assert!(!acc.tick(tick.handle));
    }
}

use crate::schedule::{Scheduler, Slot, Tick};
use crate::{format_elapsed, Accumulator, TICK_MS};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ButtonColor {
    Green,
    Red,
    Black,
    LightGray,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ButtonFace {
    pub title: &'static str,
    pub color: ButtonColor,
    pub enabled: bool,
}

/// Presentation of the two action buttons for the current phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Controls {
    pub play_pause: ButtonFace,
    pub lap_reset: ButtonFace,
}

impl Controls {
    pub fn for_phase(phase: Phase) -> Self {
        let start = ButtonFace { title: "Start", color: ButtonColor::Green, enabled: true };
        match phase {
            Phase::Idle => Self {
                play_pause: start,
                lap_reset: ButtonFace { title: "Lap", color: ButtonColor::LightGray, enabled: false },
            },
            Phase::Running => Self {
                play_pause: ButtonFace { title: "Stop", color: ButtonColor::Red, enabled: true },
                lap_reset: ButtonFace { title: "Lap", color: ButtonColor::Black, enabled: true },
            },
            Phase::Paused => Self {
                play_pause: start,
                lap_reset: ButtonFace { title: "Reset", color: ButtonColor::Black, enabled: true },
            },
        }
    }
}

/// One displayed row of the lap list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapRow<'a> {
    pub number: usize,
    pub time: &'a str,
}

/// Laps most recent first: row `i` of `n` is numbered `n - i`.
pub fn lap_rows(laps: &[String]) -> impl Iterator<Item = LapRow<'_>> + '_ {
    laps.iter()
        .enumerate()
        .rev()
        .map(|(idx, time)| LapRow { number: idx + 1, time: time.as_str() })
}

/// Drives the Main and Lap accumulators from the two user actions and keeps
/// the lap record.
pub struct TimerController<S: Scheduler> {
    scheduler: S,
    main: Accumulator,
    lap: Accumulator,
    laps: Vec<String>,
    phase: Phase,
}

impl<S: Scheduler> TimerController<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_tick_ms(scheduler, TICK_MS)
    }

    pub fn with_tick_ms(scheduler: S, tick_ms: u64) -> Self {
        Self {
            scheduler,
            main: Accumulator::new(Slot::Main, tick_ms),
            lap: Accumulator::new(Slot::Lap, tick_ms),
            laps: Vec::new(),
            phase: Phase::Idle,
        }
    }

    /// Start (or resume) both accumulators, or pause them.
    pub fn on_play_pause(&mut self) {
        match self.phase {
            Phase::Idle | Phase::Paused => {
                self.main.start(&mut self.scheduler);
                self.lap.start(&mut self.scheduler);
                self.phase = Phase::Running;
            }
            Phase::Running => {
                self.main.stop(&mut self.scheduler);
                self.lap.stop(&mut self.scheduler);
                self.phase = Phase::Paused;
            }
        }
        log::debug!("play/pause -> {:?}", self.phase);
    }

    /// Record a lap while running; reset everything while paused.
    pub fn on_lap_reset(&mut self) {
        match self.phase {
            Phase::Idle => {
                log::debug!("lap/reset ignored while idle");
            }
            Phase::Running => {
                self.laps.push(self.main.display_text());
                self.lap.reset(&mut self.scheduler);
                self.lap.start(&mut self.scheduler);
                log::debug!("lap {} recorded", self.laps.len());
            }
            Phase::Paused => {
                self.main.reset(&mut self.scheduler);
                self.lap.reset(&mut self.scheduler);
                self.laps.clear();
                self.phase = Phase::Idle;
                log::debug!("reset -> Idle");
            }
        }
    }

    /// Route a scheduler tick to its accumulator. Returns whether it applied.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        match tick.slot {
            Slot::Main => self.main.tick(tick.handle),
            Slot::Lap => self.lap.tick(tick.handle),
        }
    }

    /// Cancel any live schedules, keeping elapsed values and laps.
    pub fn shutdown(&mut self) {
        self.main.stop(&mut self.scheduler);
        self.lap.stop(&mut self.scheduler);
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn main(&self) -> &Accumulator {
        &self.main
    }

    pub fn lap(&self) -> &Accumulator {
        &self.lap
    }

    pub fn main_display_text(&self) -> String {
        format_elapsed(self.main.elapsed_ms())
    }

    pub fn lap_display_text(&self) -> String {
        format_elapsed(self.lap.elapsed_ms())
    }

    pub fn laps(&self) -> &[String] {
        &self.laps
    }

    pub fn lap_rows(&self) -> impl Iterator<Item = LapRow<'_>> + '_ {
        lap_rows(&self.laps)
    }

    pub fn controls(&self) -> Controls {
        Controls::for_phase(self.phase)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

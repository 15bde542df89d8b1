use std::io::{self, Write};

use stopwatch_core::{ButtonFace, Scheduler, TimerController};

use crate::gate::RestartReason;

const MAX_VISIBLE_LAPS: usize = 10;

pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    write!(out, "\x1b[2J\x1b[H")
}

fn button(face: &ButtonFace) -> String {
    if face.enabled {
        format!("[{}]", face.title)
    } else {
        format!("({})", face.title)
    }
}

pub fn draw_stopwatch<S: Scheduler>(out: &mut impl Write, ctl: &TimerController<S>) -> io::Result<()> {
    clear_screen(out)?;

    writeln!(out, "STOPWATCH")?;
    writeln!(out)?;
    writeln!(out, "  {}", ctl.main_display_text())?;
    writeln!(out, "  lap {}", ctl.lap_display_text())?;
    writeln!(out)?;

    let controls = ctl.controls();
    writeln!(out, "  {}  {}", button(&controls.play_pause), button(&controls.lap_reset))?;
    writeln!(out)?;

    // Lap list (most recent first)
    for row in ctl.lap_rows().take(MAX_VISIBLE_LAPS) {
        writeln!(out, "  Lap {:2}  {}", row.number, row.time)?;
    }
    let hidden = ctl.laps().len().saturating_sub(MAX_VISIBLE_LAPS);
    if hidden > 0 {
        writeln!(out, "  ... {} earlier", hidden)?;
    }

    writeln!(out)?;
    writeln!(out, "ENTER/s=start/stop  l=lap/reset  h=help  q=quit")?;
    out.flush()
}

pub fn draw_help(out: &mut impl Write) -> io::Result<()> {
    clear_screen(out)?;
    writeln!(
        out,
        "STOPWATCH HELP\n\n\
         Enter  Start/Stop\n\
         s      Start/Stop\n\
         l      Lap (running)\n\
         l      Reset (stopped)\n\
         h      Help\n\
         q      Quit\n\n\
         Press any key to close"
    )?;
    out.flush()
}

pub fn draw_restart_requested(out: &mut impl Write, reason: RestartReason) -> io::Result<()> {
    let why = match reason {
        RestartReason::Carrier => "carrier region",
        RestartReason::Placemark => "location",
    };
    writeln!(out, "Restart required ({}).", why)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use stopwatch_core::{ScheduleHandle, Slot, Tick};

    use super::*;

    #[derive(Default)]
    struct CountingScheduler {
        next: u64,
    }

    impl Scheduler for CountingScheduler {
        fn register(&mut self, _interval: Duration, _slot: Slot) -> ScheduleHandle {
            self.next += 1;
            ScheduleHandle::new(self.next)
        }

        fn cancel(&mut self, _handle: ScheduleHandle) {}
    }

    fn render(ctl: &TimerController<CountingScheduler>) -> String {
        let mut buf = Vec::new();
        draw_stopwatch(&mut buf, ctl).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_idle_screen() {
        let ctl = TimerController::new(CountingScheduler::default());
        let text = render(&ctl);
        assert!(text.contains("  00:00.00\n"));
        assert!(text.contains("  lap 00:00.00\n"));
        assert!(text.contains("[Start]  (Lap)"));
        assert!(!text.contains("Lap  1"));
    }

    #[test]
    fn test_laps_listed_most_recent_first() {
        let mut ctl = TimerController::new(CountingScheduler::default());
        ctl.on_play_pause();
        // Handles 1 and 2 are Main and Lap; each lap re-registers Lap.
        let main = ScheduleHandle::new(1);
        for _ in 0..4 {
            ctl.on_tick(Tick { slot: Slot::Main, handle: main });
        }
        ctl.on_lap_reset();
        for _ in 0..2 {
            ctl.on_tick(Tick { slot: Slot::Main, handle: main });
        }
        ctl.on_lap_reset();

        let text = render(&ctl);
        assert!(text.contains("[Stop]  [Lap]"));
        let first = text.find("Lap  2  00:00.21").unwrap();
        let second = text.find("Lap  1  00:00.14").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_long_lap_list_is_truncated() {
        let mut ctl = TimerController::new(CountingScheduler::default());
        ctl.on_play_pause();
        for _ in 0..12 {
            ctl.on_lap_reset();
        }
        let text = render(&ctl);
        assert!(text.contains("Lap 12"));
        assert!(text.contains("Lap  3"));
        assert!(!text.contains("Lap  2"));
        assert!(text.contains("... 2 earlier"));
    }

    #[test]
    fn test_paused_screen_offers_reset() {
        let mut ctl = TimerController::new(CountingScheduler::default());
        ctl.on_play_pause();
        ctl.on_play_pause();
        assert!(render(&ctl).contains("[Start]  [Reset]"));
    }

    #[test]
    fn test_restart_message() {
        let mut buf = Vec::new();
        draw_restart_requested(&mut buf, RestartReason::Placemark).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Restart required (location).\n");
    }
}

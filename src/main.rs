mod gate;
mod logging;
mod pump;
mod settings;
mod ui;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver};
use stopwatch_core::{Scheduler, Tick, TimerController};

use crate::gate::{EnvProbe, LaunchGate, LaunchRoute};
use crate::pump::PumpScheduler;
use crate::settings::Settings;

const APP_NAME: &str = "Stopwatch";

/// Exit status telling the hosting shell to relaunch the app.
const EXIT_RESTART: u8 = 75;

struct StopwatchApp<S: Scheduler, W: Write> {
    ctl: TimerController<S>,
    out: W,
    redraw_every: Duration,
    last_redraw: Option<Instant>,
    help_visible: bool,
}

impl<S: Scheduler, W: Write> StopwatchApp<S, W> {
    fn new(ctl: TimerController<S>, out: W, redraw_every: Duration) -> Self {
        Self {
            ctl,
            out,
            redraw_every,
            last_redraw: None,
            help_visible: false,
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.last_redraw = Some(Instant::now());
        if self.help_visible {
            return ui::draw_help(&mut self.out);
        }
        ui::draw_stopwatch(&mut self.out, &self.ctl)
    }

    /// Returns `false` once the user asked to quit.
    fn handle_key(&mut self, key: char) -> io::Result<bool> {
        // If help screen is showing, any key dismisses it
        if self.help_visible {
            self.help_visible = false;
            self.redraw()?;
            return Ok(true);
        }

        match key {
            '\n' | 's' => self.ctl.on_play_pause(),
            'l' => self.ctl.on_lap_reset(),
            'h' => self.help_visible = true,
            'q' => return Ok(false),
            other => {
                log::debug!("unbound key {:?}", other);
                return Ok(true);
            }
        }
        self.redraw()?;
        Ok(true)
    }

    fn handle_tick(&mut self, tick: Tick) -> io::Result<()> {
        if !self.ctl.on_tick(tick) || self.help_visible {
            return Ok(());
        }
        let due = self
            .last_redraw
            .map(|at| at.elapsed() >= self.redraw_every)
            .unwrap_or(true);
        if due {
            self.redraw()?;
        }
        Ok(())
    }

    fn run(&mut self, ticks: &Receiver<Tick>, keys: &Receiver<char>) -> io::Result<()> {
        self.redraw()?;
        loop {
            select! {
                recv(keys) -> key => match key {
                    Ok(key) => {
                        if !self.handle_key(key)? {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                recv(ticks) -> tick => match tick {
                    Ok(tick) => self.handle_tick(tick)?,
                    Err(_) => break,
                },
            }
        }
        Ok(())
    }
}

/// One key per stdin line; an empty line is Enter.
fn spawn_key_reader() -> io::Result<Receiver<char>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::Builder::new().name("keys".into()).spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            let key = line.trim().chars().next().unwrap_or('\n');
            if tx.send(key).is_err() {
                break;
            }
        }
    })?;
    Ok(rx)
}

fn main() -> ExitCode {
    let (settings, settings_err) = Settings::load();
    logging::init(&settings.log_level);
    if let Some(e) = settings_err {
        log::error!("{}; using defaults", e);
    }
    log::info!("{} starting, tick every {} ms", APP_NAME, settings.tick_ms);

    if let LaunchRoute::RestartRequested(reason) = LaunchGate::new(&settings.gate).evaluate(&EnvProbe) {
        log::warn!("restart requested: {:?}", reason);
        ui::draw_restart_requested(&mut io::stdout().lock(), reason).ok();
        return ExitCode::from(EXIT_RESTART);
    }

    let (tick_tx, tick_rx) = crossbeam_channel::unbounded();
    let pump = match PumpScheduler::spawn(tick_tx) {
        Ok(pump) => pump,
        Err(e) => {
            log::error!("can't start pump thread: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let keys = match spawn_key_reader() {
        Ok(keys) => keys,
        Err(e) => {
            log::error!("can't start key reader: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ctl = TimerController::with_tick_ms(pump, settings.tick_ms);
    let mut app = StopwatchApp::new(ctl, io::stdout(), Duration::from_millis(settings.redraw_ms));
    let result = app.run(&tick_rx, &keys);
    app.ctl.shutdown();

    match result {
        Ok(()) => {
            log::info!("{} exiting", APP_NAME);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("terminal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

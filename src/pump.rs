use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use stopwatch_core::{ScheduleHandle, Scheduler, Slot, Tick};

enum Control {
    Register {
        handle: ScheduleHandle,
        slot: Slot,
        interval: Duration,
    },
    Cancel(ScheduleHandle),
    Quit,
}

struct Entry {
    handle: ScheduleHandle,
    slot: Slot,
    interval: Duration,
    next_due: Instant,
}

/// Scheduler backed by a pump thread that posts ticks to the event loop.
pub struct PumpScheduler {
    control: Sender<Control>,
    next_id: u64,
    thread: Option<JoinHandle<()>>,
}

impl PumpScheduler {
    pub fn spawn(ticks: Sender<Tick>) -> std::io::Result<Self> {
        let (control, control_rx) = crossbeam_channel::unbounded();
        let thread = std::thread::Builder::new()
            .name("pump".into())
            .spawn(move || pump_thread(control_rx, ticks))?;
        Ok(Self {
            control,
            next_id: 0,
            thread: Some(thread),
        })
    }
}

impl Scheduler for PumpScheduler {
    fn register(&mut self, interval: Duration, slot: Slot) -> ScheduleHandle {
        self.next_id += 1;
        let handle = ScheduleHandle::new(self.next_id);
        if self.control.send(Control::Register { handle, slot, interval }).is_err() {
            log::error!("pump is gone, {:?} will not tick", slot);
        }
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.control.send(Control::Cancel(handle)).ok();
    }
}

impl Drop for PumpScheduler {
    fn drop(&mut self) {
        self.control.send(Control::Quit).ok();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("pump thread panicked");
            }
        }
    }
}

fn pump_thread(control: Receiver<Control>, ticks: Sender<Tick>) {
    let mut entries: Vec<Entry> = Vec::new();

    loop {
        // Block when nothing is scheduled, otherwise wait until the next beat.
        let msg = match entries.iter().map(|e| e.next_due).min() {
            Some(due) => match control.recv_timeout(due.saturating_duration_since(Instant::now())) {
                Ok(msg) => Some(msg),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match control.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            },
        };

        match msg {
            Some(Control::Register { handle, slot, interval }) => {
                log::trace!("register {:?} as #{} every {:?}", slot, handle.id(), interval);
                entries.push(Entry {
                    handle,
                    slot,
                    interval,
                    next_due: Instant::now() + interval,
                });
            }
            Some(Control::Cancel(handle)) => {
                entries.retain(|e| e.handle != handle);
            }
            Some(Control::Quit) => break,
            None => {}
        }

        let now = Instant::now();
        for entry in entries.iter_mut().filter(|e| e.next_due <= now) {
            let tick = Tick {
                slot: entry.slot,
                handle: entry.handle,
            };
            if ticks.send(tick).is_err() {
                return;
            }
            // Missed beats are dropped rather than replayed.
            entry.next_due += entry.interval;
            if entry.next_due <= now {
                entry.next_due = now + entry.interval;
            }
        }
    }
    log::debug!("pump exiting");
}

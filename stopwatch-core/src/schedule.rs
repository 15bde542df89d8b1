use std::time::Duration;

/// Which accumulator a recurring tick belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Slot {
    Main,
    Lap,
}

/// Opaque id of one registration with a [`Scheduler`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// One delivery of a recurring registration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tick {
    pub slot: Slot,
    pub handle: ScheduleHandle,
}

/// Periodic scheduling primitive supplied by the host.
///
/// Implementations deliver `Tick { slot, handle }` every `interval` until the
/// handle is cancelled. Handles must be unique within a session: accumulators
/// discard ticks carrying a handle they no longer own. `cancel` must be
/// idempotent.
pub trait Scheduler {
    fn register(&mut self, interval: Duration, slot: Slot) -> ScheduleHandle;
    fn cancel(&mut self, handle: ScheduleHandle);
}

/// Deterministic scheduler for tests: records registrations, fires on demand.
#[cfg(test)]
#[derive(Default, Debug)]
pub(crate) struct ManualScheduler {
    next_id: u64,
    pub live: Vec<(ScheduleHandle, Slot, Duration)>,
    pub cancelled: Vec<ScheduleHandle>,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn handle_for(&self, slot: Slot) -> Option<ScheduleHandle> {
        self.live
            .iter()
            .find(|(_, s, _)| *s == slot)
            .map(|(h, _, _)| *h)
    }

    /// Tick for the live registration of `slot`, if any.
    pub fn fire(&self, slot: Slot) -> Option<Tick> {
        self.handle_for(slot).map(|handle| Tick { slot, handle })
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn register(&mut self, interval: Duration, slot: Slot) -> ScheduleHandle {
        self.next_id += 1;
        let handle = ScheduleHandle::new(self.next_id);
        self.live.push((handle, slot, interval));
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        if let Some(pos) = self.live.iter().position(|(h, _, _)| *h == handle) {
            self.live.remove(pos);
            self.cancelled.push(handle);
        }
    }
}

use std::thread;
use std::time::Instant;

use kestrel_core::FramePacing;

/// Identifies one armed tick so it can be canceled before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub(crate) u64);

/// Pluggable strategy for timing the frame loop.
///
/// `schedule_tick` arms a single future tick; `wait_for_tick` blocks until
/// that tick is due and reports the fire time, or `None` when it was
/// canceled in the meantime. Contract: at most one fire per `schedule_tick`
/// call, and canceling after the fire is a safe no-op.
pub trait TickScheduler {
    fn schedule_tick(&mut self) -> TickHandle;

    fn cancel_tick(&mut self, handle: TickHandle);

    fn wait_for_tick(&mut self, handle: TickHandle) -> Option<Instant>;
}

/// The default scheduler: frame-synchronized timing against a fixed target
/// interval (60 hz unless configured otherwise).
pub struct FrameScheduler {
    pacing: FramePacing,
    next_handle: u64,
    armed: Option<(TickHandle, Instant)>,
    last_fire: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(pacing: FramePacing) -> Self {
        Self {
            pacing,
            next_handle: 0,
            armed: None,
            last_fire: None,
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(FramePacing::default())
    }
}

impl TickScheduler for FrameScheduler {
    fn schedule_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_handle);
        self.next_handle += 1;
        let now = Instant::now();
        let deadline = self.pacing.next_deadline(self.last_fire.unwrap_or(now), now);
        self.armed = Some((handle, deadline));
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.armed.map(|(armed, _)| armed) == Some(handle) {
            self.armed = None;
        }
    }

    fn wait_for_tick(&mut self, handle: TickHandle) -> Option<Instant> {
        let (armed, deadline) = self.armed?;
        if armed != handle {
            return None;
        }
        self.armed = None;
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        let fired = Instant::now();
        self.last_fire = Some(fired);
        Some(fired)
    }
}

/// A manually stepped scheduler for tests and deterministic driving: every
/// armed tick is due immediately, and schedule/cancel calls are counted.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: u64,
    armed: Option<TickHandle>,
    scheduled: u64,
    canceled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total `schedule_tick` calls observed.
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }

    /// Total cancellations that actually disarmed a pending tick.
    pub fn canceled_count(&self) -> u64 {
        self.canceled
    }

    /// Whether a tick is currently armed.
    pub fn has_pending(&self) -> bool {
        self.armed.is_some()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_handle);
        self.next_handle += 1;
        self.armed = Some(handle);
        self.scheduled += 1;
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.armed == Some(handle) {
            self.armed = None;
            self.canceled += 1;
        }
    }

    fn wait_for_tick(&mut self, handle: TickHandle) -> Option<Instant> {
        if self.armed == Some(handle) {
            self.armed = None;
            Some(Instant::now())
        } else {
            None
        }
    }
}

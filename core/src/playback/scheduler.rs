//! Cancellable single-slot advance scheduler
//!
//! The playback controller never has more than one advance outstanding, so
//! the scheduler is a single countdown alarm: `schedule` arms it and
//! returns a token, `cancel` disarms it, and the host drives time forward
//! through `poll`. There is no thread and no wall clock behind this type;
//! a cancelled alarm is removed synchronously and can never fire, which
//! rules out the stale-callback race structurally rather than by guarding
//! at the call site.

use std::time::Duration;

/// Opaque handle to one scheduled advance. Tokens are never reused within
/// a scheduler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleToken(u64);

#[derive(Debug)]
struct Alarm {
    token: ScheduleToken,
    remaining: Duration,
}

/// Deterministic countdown alarm with at most one pending entry.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_token: u64,
    pending: Option<Alarm>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the alarm to fire after `delay`, replacing any pending entry.
    pub fn schedule(&mut self, delay: Duration) -> ScheduleToken {
        self.next_token += 1;
        let token = ScheduleToken(self.next_token);
        self.pending = Some(Alarm {
            token,
            remaining: delay,
        });
        token
    }

    /// Disarms the alarm if `token` is still pending. Idempotent: stale
    /// tokens (already fired, replaced, or cancelled) are ignored.
    pub fn cancel(&mut self, token: ScheduleToken) {
        if self.pending.as_ref().is_some_and(|alarm| alarm.token == token) {
            self.pending = None;
        }
    }

    /// Disarms unconditionally.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<ScheduleToken> {
        self.pending.as_ref().map(|alarm| alarm.token)
    }

    /// Remaining time until the pending alarm fires.
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(|alarm| alarm.remaining)
    }

    /// Advances the scheduler's clock by `elapsed`; returns the token of
    /// the alarm if it fired within that span.
    pub fn poll(&mut self, elapsed: Duration) -> Option<ScheduleToken> {
        let alarm = self.pending.as_mut()?;
        if elapsed >= alarm.remaining {
            let token = alarm.token;
            self.pending = None;
            Some(token)
        } else {
            alarm.remaining -= elapsed;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn fires_once_after_the_full_delay() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(TICK * 3);

        assert_eq!(scheduler.poll(TICK), None);
        assert_eq!(scheduler.poll(TICK), None);
        assert_eq!(scheduler.poll(TICK), Some(token));
        assert_eq!(scheduler.poll(TICK), None);
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn cancel_is_synchronous_and_idempotent() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(TICK);
        scheduler.cancel(token);
        assert!(!scheduler.is_armed());
        assert_eq!(scheduler.poll(TICK * 10), None);

        // Cancelling again, or cancelling a fired token, is a no-op.
        scheduler.cancel(token);
        let fired = scheduler.schedule(TICK);
        assert_eq!(scheduler.poll(TICK), Some(fired));
        scheduler.cancel(fired);
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn stale_token_cannot_cancel_a_newer_alarm() {
        let mut scheduler = Scheduler::new();
        let old = scheduler.schedule(TICK);
        let new = scheduler.schedule(TICK * 2);
        assert_ne!(old, new);

        scheduler.cancel(old);
        assert!(scheduler.is_armed(), "stale cancel must not disarm");
        assert_eq!(scheduler.poll(TICK * 2), Some(new));
    }

    #[test]
    fn partial_polls_accumulate() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(Duration::from_millis(250));
        assert_eq!(scheduler.poll(Duration::from_millis(200)), None);
        assert_eq!(scheduler.remaining(), Some(Duration::from_millis(50)));
        assert_eq!(scheduler.poll(Duration::from_millis(50)), Some(token));
    }
}

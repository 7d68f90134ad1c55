//! VCR-style playback controller
//!
//! A small state machine that owns the current index into a step trace and
//! replays it under play/pause/step/speed control, independent of which
//! algorithm produced the trace and of any rendering framework. The
//! renderer is a pure consumer: it re-reads [`PlaybackController::frame`]
//! after every control event or [`PlaybackController::tick`].
//!
//! # States
//! `Idle` (no trace computed yet), `Paused`, `Playing` (auto-advancing on
//! the scheduler), and `Finished` (`Paused` with the index on the last
//! step). Reaching the last step during playback auto-stops into `Paused`
//! rather than looping, and `play` on a finished trace restarts only after
//! an explicit `reset`.
//!
//! # Cancellation
//! Every operation that invalidates the trace (`randomize`, `select`)
//! synchronously cancels the pending advance before touching any state, so
//! no stale advance can fire against a replaced trace. Dropping the
//! controller drops the scheduler with it.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod scheduler;

pub use self::scheduler::{ScheduleToken, Scheduler};

use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithm::{AlgorithmDescriptor, AlgorithmInput};
use crate::registry::{self, RegistryError};
use crate::step::{Step, Trace};

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 100;
pub const DEFAULT_SPEED: u8 = 50;

const MIN_DELAY_MS: u64 = 50;

/// Delay before the next auto-advance: `1100 - 10·speed` milliseconds,
/// clamped to a 50 ms floor. Monotonically non-increasing over the speed
/// range (speed 1 → 1090 ms, speed 100 → 100 ms).
pub fn delay_for_speed(speed: u8) -> Duration {
    let ms = 1_100u64.saturating_sub(u64::from(speed) * 10);
    Duration::from_millis(ms.max(MIN_DELAY_MS))
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No trace has been computed yet.
    Idle,
    Paused,
    Playing,
    /// Paused with the index on the last step.
    Finished,
}

/// What the renderer draws on every index change.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackFrame<'a> {
    pub step: &'a Step,
    pub index: usize,
    pub total: usize,
    pub playing: bool,
}

/// Playback state machine over one trace/descriptor pair.
#[derive(Debug)]
pub struct PlaybackController {
    descriptor: &'static AlgorithmDescriptor,
    rng: StdRng,
    input: Option<AlgorithmInput>,
    trace: Option<Trace>,
    current_index: usize,
    playing: bool,
    speed: u8,
    scheduler: Scheduler,
    pending: Option<ScheduleToken>,
}

impl PlaybackController {
    /// Controller in the `Idle` state; the first `play` (or `randomize`)
    /// computes the trace.
    pub fn new(descriptor: &'static AlgorithmDescriptor) -> Self {
        Self::from_rng(descriptor, StdRng::from_os_rng())
    }

    /// Deterministic controller: input generation draws from the seeded
    /// PRNG, so the full trace sequence is reproducible.
    pub fn with_seed(descriptor: &'static AlgorithmDescriptor, seed: u64) -> Self {
        Self::from_rng(descriptor, StdRng::seed_from_u64(seed))
    }

    fn from_rng(descriptor: &'static AlgorithmDescriptor, rng: StdRng) -> Self {
        Self {
            descriptor,
            rng,
            input: None,
            trace: None,
            current_index: 0,
            playing: false,
            speed: DEFAULT_SPEED,
            scheduler: Scheduler::new(),
            pending: None,
        }
    }

    pub fn descriptor(&self) -> &'static AlgorithmDescriptor {
        self.descriptor
    }

    pub fn state(&self) -> PlaybackState {
        match &self.trace {
            None => PlaybackState::Idle,
            Some(_) if self.playing => PlaybackState::Playing,
            Some(trace) if self.current_index == trace.len() - 1 => PlaybackState::Finished,
            Some(_) => PlaybackState::Paused,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_steps(&self) -> usize {
        self.trace.as_ref().map_or(0, Trace::len)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    pub fn input(&self) -> Option<&AlgorithmInput> {
        self.input.as_ref()
    }

    /// Current `(step, index, total, playing)` tuple, or `None` while
    /// `Idle`.
    pub fn frame(&self) -> Option<PlaybackFrame<'_>> {
        let trace = self.trace.as_ref()?;
        Some(PlaybackFrame {
            step: trace.get(self.current_index)?,
            index: self.current_index,
            total: trace.len(),
            playing: self.playing,
        })
    }

    /// Starts auto-advancing. Computes the trace synchronously first if
    /// none exists. On a finished trace this is a no-op: playback restarts
    /// only after an explicit [`reset`](Self::reset).
    pub fn play(&mut self) {
        self.ensure_trace();
        let last = self.trace.as_ref().map_or(0, |trace| trace.len() - 1);
        if self.current_index >= last || self.playing {
            return;
        }
        self.playing = true;
        self.arm();
        debug!("playback started ({})", self.descriptor.id);
    }

    /// Cancels the pending advance and stops; the index is unchanged.
    pub fn pause(&mut self) {
        self.cancel_pending();
        self.playing = false;
        debug!("playback paused at step {}", self.current_index);
    }

    /// Rewinds to the first step without regenerating input or
    /// re-executing.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.playing = false;
        self.current_index = 0;
    }

    /// Advances one step; a no-op at the last index. Does not change
    /// `playing`.
    pub fn next(&mut self) {
        if let Some(trace) = &self.trace {
            if self.current_index + 1 < trace.len() {
                self.current_index += 1;
            }
        }
    }

    /// Retreats one step; a no-op at index 0. Does not change `playing`.
    pub fn prev(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Sets the playback speed (clamped to 1..=100). Takes effect
    /// immediately: a pending advance is re-armed with the new delay, no
    /// pause/resume cycle needed.
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        if self.playing && self.pending.is_some() {
            self.cancel_pending();
            self.arm();
        }
    }

    /// Discards the current trace, generates a fresh input, and executes
    /// it. Playback stops and the index rewinds to 0.
    pub fn randomize(&mut self) {
        self.cancel_pending();
        self.rebuild();
        debug!("randomized input for {}", self.descriptor.id);
    }

    /// Switches the active algorithm. Reselecting the current id is a
    /// no-op; otherwise the pending advance is cancelled, the trace is
    /// rebuilt for the new descriptor, and playback stops at step 0.
    pub fn select(&mut self, id: &str) -> Result<(), RegistryError> {
        if id == self.descriptor.id {
            return Ok(());
        }
        let descriptor = registry::lookup(id)?;
        self.cancel_pending();
        self.descriptor = descriptor;
        self.rebuild();
        debug!("selected algorithm {id}");
        Ok(())
    }

    /// Drives playback time forward. Returns `true` if the pending advance
    /// fired and moved the index.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Some(fired) = self.scheduler.poll(elapsed) else {
            return false;
        };
        if self.pending != Some(fired) || !self.playing {
            return false;
        }
        self.pending = None;
        self.advance()
    }

    /// Delay the next scheduled advance will use.
    pub fn delay(&self) -> Duration {
        delay_for_speed(self.speed)
    }

    fn advance(&mut self) -> bool {
        let Some(trace) = &self.trace else {
            return false;
        };
        let last = trace.len() - 1;
        if self.current_index >= last {
            self.playing = false;
            return false;
        }
        self.current_index += 1;
        if self.current_index < last {
            self.arm();
        } else {
            // Auto-stop on the terminal step rather than looping.
            self.playing = false;
            debug!("playback finished ({})", self.descriptor.id);
        }
        true
    }

    fn arm(&mut self) {
        let token = self.scheduler.schedule(self.delay());
        self.pending = Some(token);
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }

    fn ensure_trace(&mut self) {
        if self.trace.is_none() {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let input = self.descriptor.new_input(&mut self.rng);
        let trace = self.descriptor.run(&input);
        self.input = Some(input);
        self.trace = Some(trace);
        self.current_index = 0;
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::sorting;

    fn controller() -> PlaybackController {
        let _ = env_logger::builder().is_test(true).try_init();
        PlaybackController::with_seed(&sorting::BUBBLE_SORT, 42)
    }

    /// Drains the whole trace by repeatedly firing the pending advance.
    fn run_to_end(controller: &mut PlaybackController) {
        for _ in 0..10_000 {
            if !controller.is_playing() {
                break;
            }
            let delay = controller.delay();
            controller.tick(delay);
        }
    }

    #[test]
    fn starts_idle_and_play_computes_a_trace() {
        let mut c = controller();
        assert_eq!(c.state(), PlaybackState::Idle);
        assert!(c.frame().is_none());

        c.play();
        assert_eq!(c.state(), PlaybackState::Playing);
        assert!(c.total_steps() > 1);
        let frame = c.frame().expect("frame after play");
        assert_eq!(frame.index, 0);
        assert!(frame.playing);
    }

    #[test]
    fn tick_advances_and_auto_stops_at_the_last_step() {
        let mut c = controller();
        c.play();
        run_to_end(&mut c);

        assert_eq!(c.state(), PlaybackState::Finished);
        assert!(!c.is_playing());
        assert_eq!(c.current_index(), c.total_steps() - 1);
    }

    #[test]
    fn prev_at_zero_and_next_at_last_are_clamping_no_ops() {
        let mut c = controller();
        c.play();
        c.pause();

        c.prev();
        assert_eq!(c.current_index(), 0);

        for _ in 0..c.total_steps() + 5 {
            c.next();
        }
        assert_eq!(c.current_index(), c.total_steps() - 1);

        let playing_before = c.is_playing();
        c.next();
        assert_eq!(c.is_playing(), playing_before, "next must not flip playing");
    }

    #[test]
    fn play_on_a_finished_trace_requires_reset() {
        let mut c = controller();
        c.play();
        run_to_end(&mut c);
        assert_eq!(c.state(), PlaybackState::Finished);

        c.play();
        assert_eq!(c.state(), PlaybackState::Finished, "no restart without reset");
        assert!(!c.is_playing());

        c.reset();
        assert_eq!(c.state(), PlaybackState::Paused);
        assert_eq!(c.current_index(), 0);
        c.play();
        assert_eq!(c.state(), PlaybackState::Playing);
    }

    #[test]
    fn pause_cancels_the_pending_advance() {
        let mut c = controller();
        c.play();
        c.pause();

        let index = c.current_index();
        assert!(!c.tick(Duration::from_secs(60)));
        assert_eq!(c.current_index(), index);
        assert_eq!(c.state(), PlaybackState::Paused);
    }

    #[test]
    fn reset_rewinds_without_rebuilding_the_trace() {
        let mut c = controller();
        c.play();
        let trace_before = c.trace().cloned();
        run_to_end(&mut c);

        c.reset();
        assert_eq!(c.current_index(), 0);
        assert_eq!(c.trace().cloned(), trace_before, "reset must not re-execute");
    }

    #[test]
    fn randomize_discards_the_trace_and_stops_playback() {
        let mut c = controller();
        c.play();
        let trace_before = c.trace().cloned();

        c.randomize();
        assert!(!c.is_playing());
        assert_eq!(c.current_index(), 0);
        assert_ne!(c.trace().cloned(), trace_before, "fresh input expected");

        // The advance scheduled before randomize was cancelled
        // synchronously; no stale callback can move the new trace.
        assert!(!c.tick(Duration::from_secs(60)));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn select_switches_descriptor_and_rebuilds() {
        let mut c = controller();
        c.play();

        c.select("dijkstra").expect("known id");
        assert_eq!(c.descriptor().id, "dijkstra");
        assert_eq!(c.state(), PlaybackState::Paused);
        assert_eq!(c.current_index(), 0);
        assert!(!c.is_playing());
    }

    #[test]
    fn select_unknown_id_fails_and_changes_nothing() {
        let mut c = controller();
        c.play();
        let index = c.current_index();

        let err = c.select("nope").expect_err("unknown id");
        assert_eq!(err, RegistryError::UnknownAlgorithm("nope".to_string()));
        assert_eq!(c.descriptor().id, "bubble");
        assert_eq!(c.current_index(), index);
    }

    #[test]
    fn reselecting_the_current_id_is_a_no_op() {
        let mut c = controller();
        c.play();
        c.pause();
        c.next();
        let index = c.current_index();
        let trace_before = c.trace().cloned();

        c.select("bubble").expect("idempotent reselect");
        assert_eq!(c.current_index(), index);
        assert_eq!(c.trace().cloned(), trace_before);
    }

    #[test]
    fn speed_controls_the_advance_delay() {
        assert_eq!(delay_for_speed(1), Duration::from_millis(1090));
        assert_eq!(delay_for_speed(50), Duration::from_millis(600));
        assert_eq!(delay_for_speed(100), Duration::from_millis(100));

        // Monotonically non-increasing with a clamped floor.
        let mut previous = delay_for_speed(MIN_SPEED);
        for speed in MIN_SPEED..=MAX_SPEED {
            let delay = delay_for_speed(speed);
            assert!(delay <= previous);
            assert!(delay >= Duration::from_millis(MIN_DELAY_MS));
            previous = delay;
        }
    }

    #[test]
    fn set_speed_takes_effect_without_a_pause_resume_cycle() {
        let mut c = controller();
        c.play();
        assert_eq!(c.delay(), Duration::from_millis(600));

        c.set_speed(100);
        // The pending advance was re-armed with the faster delay.
        assert!(c.tick(Duration::from_millis(100)));
        assert_eq!(c.current_index(), 1);

        c.set_speed(0);
        assert_eq!(c.speed(), MIN_SPEED, "speed clamps below the range");
        c.set_speed(200);
        assert_eq!(c.speed(), MAX_SPEED, "speed clamps above the range");
    }

    #[test]
    fn frame_exposes_the_consumer_tuple() {
        let mut c = controller();
        c.play();
        c.pause();
        c.next();

        let frame = c.frame().expect("frame");
        assert_eq!(frame.index, 1);
        assert_eq!(frame.total, c.total_steps());
        assert!(!frame.playing);
        assert!(!frame.step.message.is_empty());
    }

    #[test]
    fn seeded_controllers_replay_identically() {
        let mut a = controller();
        let mut b = controller();
        a.play();
        b.play();
        assert_eq!(a.trace(), b.trace());

        a.randomize();
        b.randomize();
        assert_eq!(a.trace(), b.trace());
    }
}

//! KINESIS: Algorithmic Playback Engine
//!
//! KINESIS separates "running an algorithm" from "watching it run". Each
//! instrumented algorithm turns a freshly generated input instance into an
//! ordered, immutable trace of discrete execution steps, and a generic
//! playback controller replays that trace under VCR-style control
//! (play/pause/step/speed) independent of which algorithm produced it.
//!
//! # Architecture
//! - [`step`]: the immutable [`Step`]/[`Trace`] snapshot model shared by
//!   every algorithm family.
//! - [`algorithm`]: one pure trace generator per algorithm across five
//!   families (sorting, graph, string matching, tree, dynamic
//!   programming), plus the [`AlgorithmDescriptor`] selection interface.
//! - [`registry`]: the static descriptor table, keyed by algorithm id.
//! - [`playback`]: the [`PlaybackController`] state machine and its
//!   cancellable advance scheduler.
//!
//! # Execution Model
//! Everything is single-threaded and cooperative: `execute` runs to
//! completion synchronously, and the only suspension point is the
//! controller's timer-driven advance, which the host drives through
//! [`PlaybackController::tick`]. Traces are deterministic given a fixed
//! input; randomness enters only through `generate` and its explicitly
//! seeded PRNG.
//!
//! # Example
//! ```
//! use kinesis_core::playback::PlaybackController;
//! use kinesis_core::registry;
//! use std::time::Duration;
//!
//! let descriptor = registry::lookup("bubble")?;
//! let mut controller = PlaybackController::with_seed(descriptor, 42);
//!
//! controller.play();
//! while controller.is_playing() {
//!     let delay = controller.delay();
//!     controller.tick(delay);
//!     let frame = controller.frame().expect("trace exists while playing");
//!     println!("[{}/{}] {}", frame.index + 1, frame.total, frame.step.message);
//! }
//! # Ok::<(), kinesis_core::registry::RegistryError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod playback;
pub mod registry;
pub mod step;

pub use algorithm::{AlgorithmCategory, AlgorithmDescriptor, AlgorithmInput};
pub use playback::{PlaybackController, PlaybackFrame, PlaybackState};
pub use registry::RegistryError;
pub use step::{Highlights, Step, StepData, Trace, TraceBuilder, TraceError};

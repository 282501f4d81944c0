//! Capture controller
//!
//! Owns the microphone device and the recording state machine: chunk
//! accumulation, best-effort streaming to the partial-transcript transport,
//! and the authoritative finalize call on stop.

mod controller;

pub use controller::{CaptureController, CaptureState};

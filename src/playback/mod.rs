//! Playback controller
//!
//! Owns the single audio-output resource. Starting a new playback tears the
//! previous one down first; playback failures notify and return to Idle.

mod output;

pub use output::RodioOutput;

use tracing::{debug, info, warn};

use crate::error::VoiceError;
use crate::notify::{NotificationKind, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// Audio-output resource behind the controller.
///
/// The production implementation is rodio; tests substitute a fake that
/// records start/stop ordering.
#[async_trait::async_trait]
pub trait AudioOutput: Send + Sync {
    /// Fetch, decode and begin playing the referenced audio. Failure maps
    /// to `Decode`.
    async fn start(&mut self, reference: &str) -> Result<(), VoiceError>;

    /// Tear down the active output. Idempotent.
    async fn stop(&mut self);

    /// Whether audio is still playing (false once playback ran out).
    fn is_active(&self) -> bool;
}

/// At most one playback session exists system-wide.
pub struct PlaybackController {
    output: Box<dyn AudioOutput>,
    state: PlaybackState,
    notifier: Notifier,
}

impl PlaybackController {
    pub fn new(output: Box<dyn AudioOutput>, notifier: Notifier) -> Self {
        Self {
            output,
            state: PlaybackState::Idle,
            notifier,
        }
    }

    pub fn state(&self) -> PlaybackState {
        // Playback that ran to its natural end counts as Idle.
        if self.state == PlaybackState::Playing && !self.output.is_active() {
            PlaybackState::Idle
        } else {
            self.state
        }
    }

    /// Play the referenced audio, stopping and releasing any current
    /// playback first. Errors notify and leave the controller Idle; they
    /// never propagate as fatal.
    pub async fn play(&mut self, reference: &str) {
        if self.state == PlaybackState::Playing {
            debug!("stopping active playback before starting a new one");
            self.output.stop().await;
            self.state = PlaybackState::Idle;
        }

        match self.output.start(reference).await {
            Ok(()) => {
                info!("playback started: {}", reference);
                self.state = PlaybackState::Playing;
            }
            Err(e) => {
                warn!("playback failed: {}", e);
                self.notifier.notify(
                    NotificationKind::Playback,
                    "Audio Error",
                    "Failed to play audio response",
                );
                self.state = PlaybackState::Idle;
            }
        }
    }

    /// Stop playback. Idempotent; a stop while Idle does nothing.
    pub async fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            self.output.stop().await;
            self.state = PlaybackState::Idle;
        }
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::generator::ResponseGenerator;
use crate::error::VoiceError;
use crate::gateway::SynthesisGateway;
use crate::notify::{NotificationKind, Notifier};
use crate::timeline::{Message, Timeline};

const GREETING: &str = "Hi, I'm your AI recruitment assistant. How can I help you today?";

/// Clears the busy flag on every exit path of the send pipeline.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Sequences user input through generation, synthesis and the timeline.
///
/// Owns the timeline and the busy flag. Sends are serialized per
/// conversation: a submit while one is in flight is rejected, not queued,
/// so timeline append order always follows pipeline completion order.
pub struct Assistant {
    timeline: Mutex<Timeline>,
    busy: AtomicBool,
    generator: Box<dyn ResponseGenerator>,
    synthesis: Arc<dyn SynthesisGateway>,
    notifier: Notifier,
}

impl Assistant {
    pub fn new(
        generator: Box<dyn ResponseGenerator>,
        synthesis: Arc<dyn SynthesisGateway>,
        notifier: Notifier,
    ) -> Self {
        let mut timeline = Timeline::new();
        timeline.append(Message::assistant(GREETING, None));

        Self {
            timeline: Mutex::new(timeline),
            busy: AtomicBool::new(false),
            generator,
            synthesis,
            notifier,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Read-only snapshot of the conversation for rendering.
    pub async fn timeline_snapshot(&self) -> Vec<Message> {
        self.timeline.lock().await.messages().to_vec()
    }

    /// Submit typed input.
    ///
    /// Blank input and overlapping sends are rejected locally; no network
    /// call is issued for either.
    pub async fn submit_text(&self, input: &str) -> Result<(), VoiceError> {
        let input = input.trim();
        if input.is_empty() {
            self.notifier.notify(
                NotificationKind::Input,
                "Error",
                "Nothing to send",
            );
            return Err(VoiceError::EmptyInput);
        }

        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(VoiceError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        self.run_pipeline(input.to_string()).await;
        Ok(())
    }

    /// Submit a finalized voice transcript.
    ///
    /// The transcript may be empty when transcription failed; the user
    /// message is still appended and the pipeline continues.
    pub async fn submit_voice(&self, transcript: String) -> Result<(), VoiceError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(VoiceError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        self.run_pipeline(transcript).await;
        Ok(())
    }

    /// The shared downstream pipeline: append user message optimistically,
    /// generate a reply, synthesize speech, append the assistant message.
    async fn run_pipeline(&self, content: String) {
        self.timeline
            .lock()
            .await
            .append(Message::user(content.clone()));

        let reply = match self.generator.generate(&content).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("response generation failed: {}", e);
                self.notifier.notify(
                    NotificationKind::Network,
                    "Error",
                    "Failed to get AI response",
                );
                return;
            }
        };

        // A failed synthesis degrades to a reply without audio; the
        // assistant message is appended either way.
        let audio_ref = match self.synthesis.synthesize(&reply).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("speech synthesis failed: {}", e);
                self.notifier.notify(
                    NotificationKind::Network,
                    "Audio Error",
                    "Failed to generate audio response",
                );
                None
            }
        };

        info!(
            "assistant reply appended ({} chars, audio: {})",
            reply.len(),
            audio_ref.is_some()
        );

        self.timeline
            .lock()
            .await
            .append(Message::assistant(reply, audio_ref));
    }
}

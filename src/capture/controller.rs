use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::audio::{condition_frame, encode_wav, CaptureBackend, CaptureConfig};
use crate::gateway::{StreamTransport, TranscriptionGateway};
use crate::notify::{NotificationKind, Notifier};

/// Capture state machine.
///
/// `Idle -> Acquiring -> Recording -> Finalizing -> Idle`, with every error
/// path releasing the device and the transport before returning to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Acquiring,
    Recording,
    Finalizing,
}

struct ActiveSession {
    id: String,

    /// Locally accumulated samples; the authoritative copy of the recording.
    samples: Arc<Mutex<Vec<i16>>>,

    /// Pump task: drains backend frames into `samples` and forwards chunks
    /// to the streaming transport.
    pump: JoinHandle<()>,

    /// Preview task: folds partial transcripts into the live preview.
    preview_task: Option<JoinHandle<()>>,
}

/// Owns the microphone and the per-recording streaming socket.
///
/// At most one recording session exists at a time; `start()` while one is
/// active is a no-op, not a queue.
pub struct CaptureController {
    config: CaptureConfig,
    backend: Box<dyn CaptureBackend>,
    transport: Arc<dyn StreamTransport>,
    transcription: Arc<dyn TranscriptionGateway>,
    notifier: Notifier,
    state: CaptureState,
    session: Option<ActiveSession>,
    live_preview: Arc<Mutex<String>>,
}

impl CaptureController {
    pub fn new(
        config: CaptureConfig,
        backend: Box<dyn CaptureBackend>,
        transport: Arc<dyn StreamTransport>,
        transcription: Arc<dyn TranscriptionGateway>,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            backend,
            transport,
            transcription,
            notifier,
            state: CaptureState::Idle,
            session: None,
            live_preview: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Current partial-transcript preview. Transient UI feedback only;
    /// never committed to the timeline.
    pub async fn live_preview(&self) -> String {
        self.live_preview.lock().await.clone()
    }

    /// Begin a new recording session.
    ///
    /// No-op unless Idle. Microphone refusal is surfaced as a notification
    /// and the controller returns to Idle; a transport failure is advisory
    /// and recording continues without live partials.
    pub async fn start(&mut self) {
        if self.state != CaptureState::Idle {
            debug!("capture start ignored: state is {:?}", self.state);
            return;
        }

        self.state = CaptureState::Acquiring;

        let mut frames = match self.backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                warn!("microphone acquisition failed: {}", e);
                self.notifier.notify(
                    NotificationKind::Capture,
                    "Recording Error",
                    "Failed to access microphone",
                );
                self.state = CaptureState::Idle;
                return;
            }
        };

        let session_id = uuid::Uuid::new_v4().to_string();
        info!(
            "recording session started: {} (backend: {})",
            session_id,
            self.backend.name()
        );

        // Best-effort: a recording without live partials is still a valid
        // recording.
        let mut stream = match self.transport.open(&session_id).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("streaming transport unavailable: {}", e);
                None
            }
        };

        self.live_preview.lock().await.clear();

        let preview_task = stream.as_mut().and_then(|s| s.take_partials()).map(|mut partials| {
            let preview = Arc::clone(&self.live_preview);
            tokio::spawn(async move {
                while let Some(text) = partials.recv().await {
                    *preview.lock().await = text;
                }
            })
        });

        let samples = Arc::new(Mutex::new(Vec::new()));
        let accumulated = Arc::clone(&samples);
        let target_rate = self.config.target_sample_rate;
        let target_channels = self.config.target_channels;

        let pump = tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                let frame = condition_frame(frame, target_rate, target_channels);

                let pcm: Vec<u8> = frame
                    .samples
                    .iter()
                    .flat_map(|s| s.to_le_bytes())
                    .collect();

                accumulated.lock().await.extend_from_slice(&frame.samples);

                if let Some(handle) = &stream {
                    handle.send_chunk(pcm);
                }
            }

            // Dropping the stream handle here closes the socket.
            debug!("capture pump finished");
        });

        self.session = Some(ActiveSession {
            id: session_id,
            samples,
            pump,
            preview_task,
        });
        self.state = CaptureState::Recording;

        self.notifier.notify(
            NotificationKind::Info,
            "Recording started",
            "Listening for your voice input...",
        );
    }

    /// Stop recording and run the authoritative finalize call.
    ///
    /// No-op unless Recording (returns `None`). On transcription failure the
    /// session degrades to an empty transcript with exactly one
    /// notification; the controller always ends Idle.
    pub async fn stop(&mut self) -> Option<String> {
        if self.state != CaptureState::Recording {
            debug!("capture stop ignored: state is {:?}", self.state);
            return None;
        }

        self.state = CaptureState::Finalizing;

        // Release the device first; the frame channel closes and the pump
        // drains whatever is still buffered.
        self.backend.stop().await;

        let Some(session) = self.session.take() else {
            // Recording without a session cannot happen through the public
            // API; recover to Idle rather than panic.
            error!("recording state with no active session");
            self.state = CaptureState::Idle;
            return None;
        };

        if let Err(e) = session.pump.await {
            error!("capture pump panicked: {}", e);
        }

        if let Some(task) = session.preview_task {
            task.abort();
        }

        let samples = {
            let guard = session.samples.lock().await;
            guard.clone()
        };

        info!(
            "recording session finalizing: {} ({} samples)",
            session.id,
            samples.len()
        );

        let transcript = match encode_wav(
            &samples,
            self.config.target_sample_rate,
            self.config.target_channels,
        ) {
            Ok(wav) => match self.transcription.finalize(&session.id, wav).await {
                Ok(transcript) => transcript,
                Err(e) => {
                    warn!("finalize transcription failed: {}", e);
                    self.notifier.notify(
                        NotificationKind::Network,
                        "Error",
                        "Failed to process voice input",
                    );
                    String::new()
                }
            },
            Err(e) => {
                error!("failed to assemble recording: {}", e);
                self.notifier.notify(
                    NotificationKind::Capture,
                    "Recording Error",
                    "Failed to process voice input",
                );
                String::new()
            }
        };

        self.live_preview.lock().await.clear();
        self.state = CaptureState::Idle;

        Some(transcript)
    }
}

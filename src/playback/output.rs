use std::io::Cursor;
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::AudioOutput;
use crate::error::VoiceError;

/// rodio-backed audio output.
///
/// The rodio output stream is not `Send`, so each playback runs on its own
/// thread that owns the stream and sink until the audio ends or a stop
/// signal arrives. The audio reference is fetched over HTTP before the
/// thread starts; fetch and decode failures both surface as `Decode`.
pub struct RodioOutput {
    http: reqwest::Client,
    active: Option<Playback>,
}

struct Playback {
    stop_tx: std_mpsc::Sender<()>,
    thread: thread::JoinHandle<()>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            active: None,
        }
    }
}

impl Default for RodioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AudioOutput for RodioOutput {
    async fn start(&mut self, reference: &str) -> Result<(), VoiceError> {
        let response = self
            .http
            .get(reference)
            .send()
            .await
            .map_err(|e| VoiceError::Decode(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VoiceError::Decode(format!(
                "audio fetch returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VoiceError::Decode(e.to_string()))?
            .to_vec();

        let (stop_tx, stop_rx) = std_mpsc::channel();
        let (ready_tx, ready_rx) = std_mpsc::channel();

        let thread = thread::spawn(move || {
            playback_thread(bytes, stop_rx, ready_tx);
        });

        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .map_err(|e| VoiceError::Decode(e.to_string()))?
            .map_err(|_| VoiceError::Decode("playback thread exited during setup".to_string()))?;

        match ready {
            Ok(()) => {
                self.active = Some(Playback { stop_tx, thread });
                Ok(())
            }
            Err(reason) => Err(VoiceError::Decode(reason)),
        }
    }

    async fn stop(&mut self) {
        if let Some(playback) = self.active.take() {
            let _ = playback.stop_tx.send(());
            let _ = tokio::task::spawn_blocking(move || playback.thread.join()).await;
            debug!("playback resource released");
        }
    }

    fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .map(|p| !p.thread.is_finished())
            .unwrap_or(false)
    }
}

/// Owns the rodio stream and sink for the lifetime of one playback.
fn playback_thread(
    bytes: Vec<u8>,
    stop_rx: std_mpsc::Receiver<()>,
    ready_tx: std_mpsc::Sender<Result<(), String>>,
) {
    let setup = || -> Result<(rodio::OutputStream, rodio::Sink), String> {
        let (stream, handle) =
            rodio::OutputStream::try_default().map_err(|e| e.to_string())?;
        let sink = rodio::Sink::try_new(&handle).map_err(|e| e.to_string())?;
        let source = rodio::Decoder::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
        sink.append(source);
        Ok((stream, sink))
    };

    // The stream must stay alive while the sink plays, so both are bound
    // here rather than returned.
    let (_stream, sink) = match setup() {
        Ok(pair) => pair,
        Err(reason) => {
            warn!("playback setup failed: {}", reason);
            let _ = ready_tx.send(Err(reason));
            return;
        }
    };

    let _ = ready_tx.send(Ok(()));

    loop {
        if sink.empty() {
            break;
        }

        match stop_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(()) => {
                sink.stop();
                break;
            }
            Err(std_mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                // Controller dropped the handle; tear down rather than leak
                // the device.
                sink.stop();
                break;
            }
        }
    }
}

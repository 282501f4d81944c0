use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Instant;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::backend::{AudioFrame, CaptureBackend, CaptureConfig};
use crate::error::VoiceError;

/// Microphone backend built on cpal.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread
/// that owns it for the duration of the capture. Frames are grouped to the
/// configured cadence and handed over a tokio channel; `stop()` signals the
/// thread and joins it, which drops the stream and releases the device.
pub struct MicBackend {
    config: CaptureConfig,
    worker: Option<Worker>,
}

struct Worker {
    stop_tx: std_mpsc::Sender<()>,
    thread: thread::JoinHandle<()>,
}

impl MicBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            worker: None,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, VoiceError> {
        if self.worker.is_some() {
            return Err(VoiceError::PermissionDenied(
                "microphone already in use by an active capture".to_string(),
            ));
        }

        let (frame_tx, frame_rx) = mpsc::channel(100);
        let (stop_tx, stop_rx) = std_mpsc::channel();
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let chunk_ms = self.config.chunk_ms;

        let thread = thread::spawn(move || {
            capture_thread(chunk_ms, frame_tx, stop_rx, ready_tx);
        });

        // The capture thread reports back once the stream is playing (or the
        // device could not be acquired).
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .map_err(|e| VoiceError::PermissionDenied(e.to_string()))?
            .map_err(|_| {
                VoiceError::PermissionDenied("capture thread exited during setup".to_string())
            })?;

        match ready {
            Ok(()) => {
                info!("microphone capture started ({}ms chunks)", chunk_ms);
                self.worker = Some(Worker { stop_tx, thread });
                Ok(frame_rx)
            }
            Err(reason) => Err(VoiceError::PermissionDenied(reason)),
        }
    }

    async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = tokio::task::spawn_blocking(move || worker.thread.join()).await;
            info!("microphone capture stopped");
        }
    }

    fn is_capturing(&self) -> bool {
        self.worker.is_some()
    }

    fn name(&self) -> &str {
        "cpal-microphone"
    }
}

/// Owns the cpal stream until a stop signal arrives.
fn capture_thread(
    chunk_ms: u64,
    frame_tx: mpsc::Sender<AudioFrame>,
    stop_rx: std_mpsc::Receiver<()>,
    ready_tx: std_mpsc::Sender<Result<(), String>>,
) {
    let host = cpal::default_host();

    let device = match host.default_input_device() {
        Some(device) => device,
        None => {
            let _ = ready_tx.send(Err("no input device available".to_string()));
            return;
        }
    };

    let input_config = match device.default_input_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("failed to query input config: {}", e)));
            return;
        }
    };

    let sample_format = input_config.sample_format();
    let stream_config: StreamConfig = input_config.into();
    let sample_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels;
    let samples_per_chunk = (sample_rate as u64 * chunk_ms / 1000) as usize * channels as usize;

    let emitter = FrameEmitter {
        tx: frame_tx,
        pending: Vec::with_capacity(samples_per_chunk * 2),
        samples_per_chunk,
        sample_rate,
        channels,
        started: Instant::now(),
    };

    let err_fn = |e: cpal::StreamError| warn!("input stream error: {}", e);

    let stream = match sample_format {
        SampleFormat::F32 => {
            let mut emitter = emitter;
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    emitter.extend(
                        data.iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                    );
                },
                err_fn,
                None,
            )
        }
        SampleFormat::I16 => {
            let mut emitter = emitter;
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    emitter.extend(data.iter().copied());
                },
                err_fn,
                None,
            )
        }
        SampleFormat::U16 => {
            let mut emitter = emitter;
            device.build_input_stream(
                &stream_config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    emitter.extend(data.iter().map(|&s| (s as i32 - 32768) as i16));
                },
                err_fn,
                None,
            )
        }
        other => {
            let _ = ready_tx.send(Err(format!("unsupported sample format: {:?}", other)));
            return;
        }
    };

    let stream = match stream {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("failed to open input stream: {}", e)));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(format!("failed to start input stream: {}", e)));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    // Block until stop; dropping the stream releases the device and the
    // frame sender, which closes the channel on the consumer side.
    let _ = stop_rx.recv();
    drop(stream);
}

/// Groups raw device samples into fixed-cadence frames.
struct FrameEmitter {
    tx: mpsc::Sender<AudioFrame>,
    pending: Vec<i16>,
    samples_per_chunk: usize,
    sample_rate: u32,
    channels: u16,
    started: Instant,
}

impl FrameEmitter {
    fn extend(&mut self, samples: impl Iterator<Item = i16>) {
        self.pending.extend(samples);

        while self.pending.len() >= self.samples_per_chunk {
            let chunk: Vec<i16> = self.pending.drain(..self.samples_per_chunk).collect();
            let frame = AudioFrame {
                samples: chunk,
                sample_rate: self.sample_rate,
                channels: self.channels,
                timestamp_ms: self.started.elapsed().as_millis() as u64,
            };

            // The audio callback must never block; drop the frame if the
            // consumer has fallen 10 seconds behind.
            if self.tx.try_send(frame).is_err() {
                warn!("capture consumer lagging; dropping audio frame");
            }
        }
    }
}

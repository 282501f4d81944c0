use tokio::sync::mpsc;

use crate::error::VoiceError;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (frames are downsampled if the device runs higher)
    pub target_sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub target_channels: u16,
    /// Chunk cadence in milliseconds (affects latency)
    pub chunk_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz for the STT service
            target_channels: 1,        // Mono
            chunk_ms: 100,             // 100ms chunks
        }
    }
}

/// Microphone capture backend trait
///
/// The production implementation wraps cpal; tests substitute a fake that
/// feeds scripted frames.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Acquire the input device and start capturing.
    ///
    /// Returns a channel receiver that will receive audio frames at the
    /// configured cadence. Fails with `PermissionDenied` when access is
    /// refused or no device exists.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, VoiceError>;

    /// Release the input device. The frame channel closes once the last
    /// buffered frame has been delivered.
    async fn stop(&mut self);

    /// Check if the backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Condition a frame to the target format: downsample and fold to mono.
pub fn condition_frame(
    frame: AudioFrame,
    target_sample_rate: u32,
    target_channels: u16,
) -> AudioFrame {
    let mut processed = frame;

    if processed.sample_rate != target_sample_rate {
        processed = downsample_frame(processed, target_sample_rate);
    }

    if processed.channels != target_channels && target_channels == 1 {
        processed = stereo_to_mono(processed);
    }

    processed
}

/// Downsample an audio frame by decimation
fn downsample_frame(frame: AudioFrame, target_rate: u32) -> AudioFrame {
    if frame.sample_rate == target_rate {
        return frame;
    }

    let ratio = frame.sample_rate / target_rate;
    if ratio <= 1 {
        return frame; // Can't upsample
    }

    // Decimate: keep every Nth sample frame. Stepping whole frames keeps
    // interleaved channels aligned.
    let channels = frame.channels.max(1) as usize;
    let downsampled: Vec<i16> = frame
        .samples
        .chunks_exact(channels)
        .step_by(ratio as usize)
        .flatten()
        .copied()
        .collect();

    AudioFrame {
        samples: downsampled,
        sample_rate: target_rate,
        channels: frame.channels,
        timestamp_ms: frame.timestamp_ms,
    }
}

/// Convert stereo to mono by summing channels
fn stereo_to_mono(frame: AudioFrame) -> AudioFrame {
    if frame.channels == 1 {
        return frame;
    }

    if frame.channels != 2 {
        return frame; // Only support stereo -> mono
    }

    let mut mono_samples = Vec::with_capacity(frame.samples.len() / 2);

    // Sum left and right channels (no division to preserve volume)
    for chunk in frame.samples.chunks_exact(2) {
        let left = chunk[0] as i32;
        let right = chunk[1] as i32;
        let sum = left + right;
        let mono = sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        mono_samples.push(mono);
    }

    AudioFrame {
        samples: mono_samples,
        sample_rate: frame.sample_rate,
        channels: 1,
        timestamp_ms: frame.timestamp_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(samples: Vec<i16>, sample_rate: u32, channels: u16) -> AudioFrame {
        AudioFrame {
            samples,
            sample_rate,
            channels,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_downsample_by_decimation() {
        let input = frame((0..16).collect(), 32000, 1);
        let out = condition_frame(input, 16000, 1);

        assert_eq!(out.sample_rate, 16000);
        assert_eq!(out.samples, vec![0, 2, 4, 6, 8, 10, 12, 14]);
    }

    #[test]
    fn test_downsample_keeps_stereo_pairs_aligned() {
        // Interleaved [L, R] pairs; decimation drops whole pairs, so the fold
        // afterwards sums samples that belong to the same instant.
        let input = frame(vec![10, 20, 30, 40, 50, 60, 70, 80], 32000, 2);
        let out = condition_frame(input, 16000, 1);

        assert_eq!(out.sample_rate, 16000);
        assert_eq!(out.channels, 1);
        assert_eq!(out.samples, vec![30, 110]);
    }

    #[test]
    fn test_stereo_folds_to_mono() {
        let input = frame(vec![100, 200, -50, 50], 16000, 2);
        let out = condition_frame(input, 16000, 1);

        assert_eq!(out.channels, 1);
        assert_eq!(out.samples, vec![300, 0]);
    }

    #[test]
    fn test_mono_fold_saturates() {
        let input = frame(vec![i16::MAX, i16::MAX], 16000, 2);
        let out = condition_frame(input, 16000, 1);

        assert_eq!(out.samples, vec![i16::MAX]);
    }

    #[test]
    fn test_matching_format_passes_through() {
        let input = frame(vec![1, 2, 3], 16000, 1);
        let out = condition_frame(input.clone(), 16000, 1);

        assert_eq!(out.samples, input.samples);
        assert_eq!(out.sample_rate, 16000);
    }
}

use std::io::Cursor;

use anyhow::{Context, Result};

/// Encode accumulated PCM samples as a single in-memory WAV blob.
///
/// This is the finalized audio object handed to the authoritative
/// transcription call; nothing is written to disk.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buf = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec)
            .context("Failed to create WAV writer")?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .context("Failed to write sample to WAV")?;
        }

        writer.finalize().context("Failed to finalize WAV")?;
    }

    Ok(buf)
}

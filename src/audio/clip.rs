//! WAV encoding for recorded clips
//!
//! The speech-to-text endpoint takes a single mono 16-bit PCM WAV upload;
//! captured f32 samples are clamped and quantized here.

use crate::{PactumError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encode mono f32 samples as a 16-bit PCM WAV byte buffer
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    if samples.is_empty() {
        return Err(PactumError::InputError(
            "No audio was recorded. Please try speaking longer or check your microphone."
                .to_string(),
        ));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut buffer, spec)
            .map_err(|e| PactumError::TranscriptionError(format!("WAV writer: {}", e)))?;

        for &sample in samples {
            let quantized = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| PactumError::TranscriptionError(format!("WAV write: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| PactumError::TranscriptionError(format!("WAV finalize: {}", e)))?;
    }

    Ok(buffer.into_inner())
}

/// Duration of a mono clip in seconds
pub fn duration_secs(samples: &[f32], sample_rate: u32) -> f32 {
    if sample_rate == 0 {
        return 0.0;
    }
    samples.len() as f32 / sample_rate as f32
}

use crate::{PactumError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Handle to the default microphone.
///
/// Opening the device is the permission boundary: on platforms that gate
/// microphone access, a denied or missing device surfaces here as an
/// `AudioDeviceError`, and the caller may simply try `open` again after the
/// user grants access.
pub struct AudioInput {
    device: Device,
    config: StreamConfig,
}

impl AudioInput {
    /// Open the default input device
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();

        let device = host.default_input_device().ok_or_else(|| {
            PactumError::AudioDeviceError("No input device available".to_string())
        })?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| PactumError::AudioDeviceError(format!("Failed to get input config: {}", e)))?
            .into();

        Ok(Self { device, config })
    }

    /// Sample rate the device captures at
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start capturing; mono chunks are sent to `audio_tx` until the
    /// returned stream is dropped.
    pub fn start(&self, audio_tx: Sender<Vec<f32>>) -> Result<Stream> {
        let channels = self.config.channels as usize;

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Mix down to mono before buffering
                    let samples: Vec<f32> = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = audio_tx.try_send(samples) {
                        debug!("Dropping audio chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| PactumError::AudioDeviceError(format!("Failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| PactumError::AudioDeviceError(format!("Failed to start input stream: {}", e)))?;

        info!("Microphone capture started");
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_open_and_capture() {
        // CI machines may have no audio devices; only assert when one exists
        if let Ok(input) = AudioInput::open() {
            assert!(input.sample_rate() > 0);

            let (tx, _rx) = bounded(16);
            if let Ok(stream) = input.start(tx) {
                drop(stream);
            }
        }
    }
}

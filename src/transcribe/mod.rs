//! Voice recording state machine
//!
//! Owns the microphone for the duration of a clip. The flow is
//! `Idle -> Recording -> Uploading -> Idle`; a device-permission failure
//! returns straight to `Idle`, and pressing record again is the retry
//! affordance.

use crossbeam_channel::Receiver;
use tracing::{debug, info};

#[cfg(feature = "audio-io")]
use crate::audio::AudioInput;
use crate::Result;

/// Recorder state, driven only by explicit user clicks and by
/// transcription completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not recording
    Idle,
    /// Microphone open, buffering chunks
    Recording,
    /// Clip captured, transcription request outstanding
    Uploading,
}

/// A finished clip ready for the speech-to-text upload
#[derive(Debug, Clone)]
pub struct RecordedClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

pub struct Recorder {
    state: RecordingState,
    #[cfg(feature = "audio-io")]
    stream: Option<cpal::Stream>,
    chunk_rx: Option<Receiver<Vec<f32>>>,
    buffer: Vec<f32>,
    sample_rate: u32,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            state: RecordingState::Idle,
            #[cfg(feature = "audio-io")]
            stream: None,
            chunk_rx: None,
            buffer: Vec::new(),
            sample_rate: 0,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Open the microphone and start buffering.
    ///
    /// On failure (no device, or access denied) the recorder stays `Idle`
    /// and the error carries the remediation message; each failed attempt
    /// surfaces it exactly once.
    #[cfg(feature = "audio-io")]
    pub fn start(&mut self) -> Result<()> {
        if self.state != RecordingState::Idle {
            return Ok(());
        }

        let input = AudioInput::open()?;
        let (tx, rx) = crossbeam_channel::bounded(256);
        let stream = input.start(tx)?;

        self.sample_rate = input.sample_rate();
        self.buffer.clear();
        self.chunk_rx = Some(rx);
        self.stream = Some(stream);
        self.state = RecordingState::Recording;
        info!("Recording started at {} Hz", self.sample_rate);
        Ok(())
    }

    #[cfg(not(feature = "audio-io"))]
    pub fn start(&mut self) -> Result<()> {
        Err(crate::PactumError::AudioDeviceError(
            "Audio input is disabled in this build".to_string(),
        ))
    }

    /// Pull any buffered chunks off the capture channel. Called once per
    /// UI frame while recording.
    pub fn drain(&mut self) {
        if self.state != RecordingState::Recording {
            return;
        }
        if let Some(rx) = &self.chunk_rx {
            while let Ok(chunk) = rx.try_recv() {
                self.buffer.extend_from_slice(&chunk);
            }
        }
    }

    /// Stop capture and hand back the concatenated clip.
    ///
    /// Returns `None` unless currently recording. The recorder moves to
    /// `Uploading`; the caller must call [`finish_upload`](Self::finish_upload)
    /// once the transcription request resolves.
    pub fn stop(&mut self) -> Option<RecordedClip> {
        if self.state != RecordingState::Recording {
            return None;
        }

        #[cfg(feature = "audio-io")]
        {
            // Dropping the stream stops the capture callback
            self.stream = None;
        }
        self.drain_remaining();
        self.chunk_rx = None;
        self.state = RecordingState::Uploading;

        debug!("Recording stopped, {} samples buffered", self.buffer.len());
        Some(RecordedClip {
            samples: std::mem::take(&mut self.buffer),
            sample_rate: self.sample_rate,
        })
    }

    /// Discard the current recording without uploading
    pub fn cancel(&mut self) {
        #[cfg(feature = "audio-io")]
        {
            self.stream = None;
        }
        self.chunk_rx = None;
        self.buffer.clear();
        self.state = RecordingState::Idle;
        debug!("Recording cancelled");
    }

    /// Transcription finished (success or failure); back to idle
    pub fn finish_upload(&mut self) {
        if self.state == RecordingState::Uploading {
            self.state = RecordingState::Idle;
        }
    }

    fn drain_remaining(&mut self) {
        if let Some(rx) = &self.chunk_rx {
            while let Ok(chunk) = rx.try_recv() {
                self.buffer.extend_from_slice(&chunk);
            }
        }
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let recorder = Recorder::new();
        assert_eq!(recorder.state(), RecordingState::Idle);
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_stop_without_recording_is_noop() {
        let mut recorder = Recorder::new();
        assert!(recorder.stop().is_none());
        assert_eq!(recorder.state(), RecordingState::Idle);
    }

    #[test]
    fn test_failed_start_stays_idle() {
        // On machines without an input device, start() fails; the state
        // machine must remain idle so the button can retry.
        let mut recorder = Recorder::new();
        if recorder.start().is_err() {
            assert_eq!(recorder.state(), RecordingState::Idle);
        } else {
            recorder.cancel();
            assert_eq!(recorder.state(), RecordingState::Idle);
        }
    }

    #[test]
    fn test_finish_upload_only_from_uploading() {
        let mut recorder = Recorder::new();
        recorder.finish_upload();
        assert_eq!(recorder.state(), RecordingState::Idle);

        recorder.state = RecordingState::Uploading;
        recorder.finish_upload();
        assert_eq!(recorder.state(), RecordingState::Idle);
    }

    #[test]
    fn test_cancel_clears_buffer() {
        let mut recorder = Recorder::new();
        recorder.buffer.extend_from_slice(&[0.1, 0.2]);
        recorder.state = RecordingState::Recording;

        recorder.cancel();
        assert_eq!(recorder.state(), RecordingState::Idle);
        assert!(recorder.buffer.is_empty());
    }

    #[test]
    fn test_stop_takes_buffered_clip() {
        let mut recorder = Recorder::new();
        recorder.buffer.extend_from_slice(&[0.1, 0.2, 0.3]);
        recorder.sample_rate = 16000;
        recorder.state = RecordingState::Recording;

        let clip = recorder.stop().unwrap();
        assert_eq!(clip.samples, vec![0.1, 0.2, 0.3]);
        assert_eq!(clip.sample_rate, 16000);
        assert_eq!(recorder.state(), RecordingState::Uploading);
        assert!(recorder.buffer.is_empty());
    }
}

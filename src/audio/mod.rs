//! Microphone capture and clip encoding

pub mod clip;
#[cfg(feature = "audio-io")]
pub mod input;

#[cfg(feature = "audio-io")]
pub use input::AudioInput;

// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Single source of truth for the numeric codes reported by the CLI and
/// embedded in `TriageReport` write-error entries.
///
/// Error code range: 3001-3005
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// Input bytes could not be parsed as audio
    pub const DECODE: i32 = 3001;

    /// Waveform too short to produce a single analysis frame
    pub const INSUFFICIENT_AUDIO: i32 = 3002;

    /// Writing a segment file failed
    pub const IO_WRITE: i32 = 3003;

    /// Waveform metadata is invalid (e.g. zero sample rate)
    pub const INVALID_WAVEFORM: i32 = 3004;

    /// Configuration value out of range
    pub const INVALID_CONFIG: i32 = 3005;
}

/// Log an audio error with structured context
///
/// This function logs audio errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=AudioPipeline, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio-related errors
///
/// These errors cover decoding, segmentation, feature extraction and
/// segment persistence.
///
/// Error code ranges: 3001-3005
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Input could not be decoded as a WAV stream
    Decode { reason: String },

    /// Not enough samples to frame at least once
    InsufficientAudio { samples: usize, required: usize },

    /// Segment file could not be written
    IoWrite { path: String, reason: String },

    /// Waveform metadata is invalid
    InvalidWaveform { reason: String },

    /// Configuration rejected by validation
    InvalidConfig { reason: String },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::Decode { .. } => AudioErrorCodes::DECODE,
            AudioError::InsufficientAudio { .. } => AudioErrorCodes::INSUFFICIENT_AUDIO,
            AudioError::IoWrite { .. } => AudioErrorCodes::IO_WRITE,
            AudioError::InvalidWaveform { .. } => AudioErrorCodes::INVALID_WAVEFORM,
            AudioError::InvalidConfig { .. } => AudioErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::Decode { reason } => format!("Failed to decode audio: {}", reason),
            AudioError::InsufficientAudio { samples, required } => format!(
                "Insufficient audio: need at least {} samples for one analysis frame, got {}",
                required, samples
            ),
            AudioError::IoWrite { path, reason } => {
                format!("Failed to write {}: {}", path, reason)
            }
            AudioError::InvalidWaveform { reason } => format!("Invalid waveform: {}", reason),
            AudioError::InvalidConfig { reason } => format!("Invalid configuration: {}", reason),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        AudioError::Decode {
            reason: err.to_string(),
        }
    }
}

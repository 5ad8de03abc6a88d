// Error types for the cough triage pipeline
//
// This module defines custom error types for audio processing and classifier
// inference, providing structured error handling with stable numeric codes
// that hosts can report without parsing messages.

mod audio;
mod inference;

pub use audio::{log_audio_error, AudioError, AudioErrorCodes};
pub use inference::{log_inference_error, InferenceError, InferenceErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library and CLI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

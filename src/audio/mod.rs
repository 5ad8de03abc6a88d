// Audio module - waveform container and WAV decode/encode

pub mod wav;
pub mod waveform;

// Re-export commonly used types for convenience
pub use wav::{decode_wav_bytes, decode_wav_file, write_wav_file};
pub use waveform::Waveform;

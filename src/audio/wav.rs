// WAV codec - decode PCM/float WAV input and write 16-bit PCM segments
//
// Input may be any channel count; frames are averaged down to mono. Integer
// PCM is scaled by the format's positive full-scale value.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::audio::Waveform;
use crate::error::AudioError;

/// Decode a WAV file from disk into a mono waveform at its native rate.
pub fn decode_wav_file<P: AsRef<Path>>(path: P) -> Result<Waveform, AudioError> {
    let path = path.as_ref();
    let reader = hound::WavReader::open(path).map_err(|err| AudioError::Decode {
        reason: format!("opening {}: {}", path.display(), err),
    })?;
    let waveform = decode_reader(reader)?;
    log::info!(
        "[Wav] Decoded {} ({} samples @ {} Hz)",
        path.display(),
        waveform.len(),
        waveform.sample_rate()
    );
    Ok(waveform)
}

/// Decode an in-memory WAV buffer (e.g. an uploaded file body).
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<Waveform, AudioError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    decode_reader(reader)
}

fn decode_reader<R: Read>(mut reader: hound::WavReader<R>) -> Result<Waveform, AudioError> {
    let spec = reader.spec();

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, hound::Error>>()?,
        hound::SampleFormat::Int => {
            let max = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
            match spec.bits_per_sample {
                8 => reader
                    .samples::<i8>()
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, hound::Error>>()?,
                16 => reader
                    .samples::<i16>()
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, hound::Error>>()?,
                24 | 32 => reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, hound::Error>>()?,
                other => {
                    return Err(AudioError::Decode {
                        reason: format!("unsupported bits per sample {}", other),
                    })
                }
            }
        }
    };

    Waveform::from_interleaved(&interleaved, spec.channels, spec.sample_rate).map_err(|err| {
        AudioError::Decode {
            reason: err.to_string(),
        }
    })
}

/// Write mono samples as a 16-bit PCM WAV file.
///
/// Samples are clamped to [-1, 1]. The writer is finalized on success and
/// dropped (closing the file) on every error path.
pub fn write_wav_file<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), AudioError> {
    let path = path.as_ref();
    let io_err = |err: hound::Error| AudioError::IoWrite {
        path: path.display().to_string(),
        reason: err.to_string(),
    };

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(io_err)?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer.write_sample(value).map_err(io_err)?;
    }
    writer.finalize().map_err(io_err)
}

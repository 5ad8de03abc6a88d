// SegmentWriter - best-effort persistence of extracted segments
//
// Writes `segment_<n>.wav` files (16-bit PCM, source sample rate) for
// inspection and playback. A failed write never invalidates the in-memory
// segments; each failure is logged and returned to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::segmenter::Segment;
use crate::audio::write_wav_file;
use crate::error::{log_audio_error, AudioError};

pub struct SegmentWriter {
    dir: PathBuf,
}

impl SegmentWriter {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a 1-based segment index.
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("segment_{}.wav", index))
    }

    /// Write every segment, continuing past individual failures.
    ///
    /// # Returns
    /// `(written paths, errors)` in segment order
    pub fn write_all(&self, segments: &[Segment]) -> (Vec<PathBuf>, Vec<AudioError>) {
        let mut written = Vec::with_capacity(segments.len());
        let mut errors = Vec::new();

        if segments.is_empty() {
            return (written, errors);
        }

        if let Err(err) = fs::create_dir_all(&self.dir) {
            let err = AudioError::IoWrite {
                path: self.dir.display().to_string(),
                reason: err.to_string(),
            };
            log_audio_error(&err, "SegmentWriter::write_all");
            errors.push(err);
            return (written, errors);
        }

        for segment in segments {
            let path = self.path_for(segment.index);
            match write_wav_file(&path, &segment.samples, segment.sample_rate) {
                Ok(()) => {
                    log::info!(
                        "[SegmentWriter] Segment {} saved to {}",
                        segment.index,
                        path.display()
                    );
                    written.push(path);
                }
                Err(err) => {
                    log_audio_error(&err, "SegmentWriter::write_all");
                    errors.push(err);
                }
            }
        }

        (written, errors)
    }
}

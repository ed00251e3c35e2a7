//! KITTI-style stereo sequence manifest.
//!
//! A sequence directory looks like:
//!
//! ```text
//! <sequence>/times.txt          one capture time (seconds) per line
//! <sequence>/image_0/000000.png left camera
//! <sequence>/image_1/000000.png right camera
//! ```
//!
//! Image paths are derived from the frame index only; nothing is checked on
//! disk at load time; unreadable images surface when the frame is decoded.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Timestamp file, relative to the sequence directory.
pub const TIMES_FILE: &str = "times.txt";
/// Left camera subdirectory.
pub const LEFT_DIR: &str = "image_0";
/// Right camera subdirectory.
pub const RIGHT_DIR: &str = "image_1";
pub const IMAGE_EXT: &str = "png";
/// Zero-padded width of the image file stem.
pub const INDEX_WIDTH: usize = 6;

/// Errors raised while loading a sequence manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to open timestamp file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read timestamp file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid timestamp {value:?} at {}:{line}", .path.display())]
    InvalidTimestamp {
        path: PathBuf,
        line: usize,
        value: String,
    },
}

/// One synchronized stereo frame of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub index: usize,
    pub timestamp: f64,
    pub left_path: PathBuf,
    pub right_path: PathBuf,
}

/// Ordered frames of a recorded sequence, in file order.
#[derive(Debug, Clone)]
pub struct SequenceManifest {
    sequence_dir: PathBuf,
    frames: Vec<FrameRecord>,
}

impl SequenceManifest {
    /// Load `times.txt` from `sequence_dir` and derive the image paths.
    pub fn load<P: AsRef<Path>>(sequence_dir: P) -> Result<Self, ManifestError> {
        let sequence_dir = sequence_dir.as_ref().to_path_buf();
        let times_path = sequence_dir.join(TIMES_FILE);
        let file = File::open(&times_path).map_err(|source| ManifestError::Open {
            path: times_path.clone(),
            source,
        })?;
        let timestamps = parse_timestamps(BufReader::new(file), &times_path)?;
        let manifest = Self::from_timestamps(sequence_dir, timestamps);

        info!(
            "Loaded sequence manifest from {}: {} frames",
            manifest.sequence_dir.display(),
            manifest.len()
        );
        Ok(manifest)
    }

    /// Build a manifest from already-parsed timestamps, preserving their order.
    pub fn from_timestamps(sequence_dir: PathBuf, timestamps: Vec<f64>) -> Self {
        let frames = timestamps
            .into_iter()
            .enumerate()
            .map(|(index, timestamp)| {
                let (left_path, right_path) = image_paths(&sequence_dir, index);
                FrameRecord {
                    index,
                    timestamp,
                    left_path,
                    right_path,
                }
            })
            .collect();
        Self {
            sequence_dir,
            frames,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn get(&self, idx: usize) -> Option<&FrameRecord> {
        self.frames.get(idx)
    }

    pub fn frame_timestamp(&self, idx: usize) -> Option<f64> {
        self.frames.get(idx).map(|f| f.timestamp)
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.timestamp).collect()
    }
}

/// Left and right image paths for frame `index`.
///
/// `<sequence>/image_0/<index:06>.png`, `<sequence>/image_1/<index:06>.png`
pub fn image_paths(sequence_dir: &Path, index: usize) -> (PathBuf, PathBuf) {
    let file_name = format!("{:0width$}.{}", index, IMAGE_EXT, width = INDEX_WIDTH);
    (
        sequence_dir.join(LEFT_DIR).join(&file_name),
        sequence_dir.join(RIGHT_DIR).join(&file_name),
    )
}

/// Parse one timestamp per line. Blank (or whitespace-only) lines are skipped;
/// order is kept exactly as in the file.
fn parse_timestamps<R: BufRead>(reader: R, path: &Path) -> Result<Vec<f64>, ManifestError> {
    let mut timestamps = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        let ts: f64 = value
            .parse()
            .map_err(|_| ManifestError::InvalidTimestamp {
                path: path.to_path_buf(),
                line: line_num + 1,
                value: value.to_string(),
            })?;
        timestamps.push(ts);
    }
    Ok(timestamps)
}

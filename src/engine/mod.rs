//! Tracking engine collaborator.
//!
//! The replay harness only sees the engine through [`TrackingEngine`]:
//! construction from [`EngineOptions`], one blocking call per frame, then
//! trajectory export and shutdown. Frames are handed over as a
//! [`SensorFrame`] so the harness stays agnostic of the sensor modality.

pub mod baseline;
pub mod settings;
pub mod vocabulary;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::SE3;

pub use baseline::BaselineEngine;
pub use settings::EngineSettings;
pub use vocabulary::VocabularyInfo;

/// Sensor modality the engine is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sensor {
    Monocular,
    #[default]
    Stereo,
    Rgbd,
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sensor::Monocular => "monocular",
            Sensor::Stereo => "stereo",
            Sensor::Rgbd => "rgbd",
        };
        f.write_str(name)
    }
}

/// Images for one frame, tagged by modality.
#[derive(Debug)]
pub enum SensorFrame<'a, I> {
    Monocular { image: &'a I },
    Stereo { left: &'a I, right: &'a I },
    Rgbd { color: &'a I, depth: &'a I },
}

impl<I> SensorFrame<'_, I> {
    pub fn sensor(&self) -> Sensor {
        match self {
            SensorFrame::Monocular { .. } => Sensor::Monocular,
            SensorFrame::Stereo { .. } => Sensor::Stereo,
            SensorFrame::Rgbd { .. } => Sensor::Rgbd,
        }
    }
}

/// Resources and switches an engine is constructed with.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub vocab_path: PathBuf,
    pub settings_path: PathBuf,
    pub sensor: Sensor,
    pub use_viewer: bool,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Vocabulary error ({}): {reason}", .path.display())]
    Vocabulary { path: PathBuf, reason: String },
    #[error("Settings error ({}): {reason}", .path.display())]
    Settings { path: PathBuf, reason: String },
    #[error("Engine configured for {expected} input, got {got}")]
    SensorMismatch { expected: Sensor, got: Sensor },
    #[error("Frame rejected: {0}")]
    Frame(String),
    #[error("Failed to write trajectory {}: {source}", .path.display())]
    Trajectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Engine has been shut down")]
    ShutDown,
}

/// Opaque tracking engine driven by the replay harness.
///
/// `track_frame` must not return before the frame is fully accounted for
/// inside the engine; callers never submit a second frame concurrently.
pub trait TrackingEngine {
    type Image;

    fn track_frame(
        &mut self,
        frame: SensorFrame<'_, Self::Image>,
        timestamp: f64,
    ) -> Result<SE3, EngineError>;

    /// Persist the accumulated trajectory.
    fn save_trajectory(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Release internal resources. Safe to call more than once.
    fn shutdown(&mut self);
}

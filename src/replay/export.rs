//! Post-run trajectory export and engine shutdown.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::engine::{EngineError, TrackingEngine};

use super::scheduler::{PlaybackSession, PlaybackState};

/// Trajectory file written after a completed run, relative to the working directory.
pub const DEFAULT_TRAJECTORY_FILE: &str = "CameraTrajectory.txt";

/// Finalizes a completed run: save the trajectory, then shut the engine down.
#[derive(Debug, Clone)]
pub struct ResultExporter {
    output_path: PathBuf,
}

impl ResultExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Only a `Completed` session is exported; anything else is left untouched
    /// and `Ok(false)` is returned.
    pub fn export<E: TrackingEngine>(
        &self,
        engine: &mut E,
        session: &PlaybackSession,
    ) -> Result<bool, EngineError> {
        if session.state() != PlaybackState::Completed {
            warn!(
                "Skipping export: playback ended in state {:?}",
                session.state()
            );
            return Ok(false);
        }

        engine.save_trajectory(&self.output_path)?;
        engine.shutdown();
        info!("Trajectory exported to {}", self.output_path.display());
        Ok(true)
    }
}

impl Default for ResultExporter {
    fn default() -> Self {
        Self::new(DEFAULT_TRAJECTORY_FILE)
    }
}

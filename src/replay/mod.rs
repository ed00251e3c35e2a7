//! Dataset replay: drive a tracking engine through a recorded stereo
//! sequence at capture pace and report per-frame tracking latency.
//!
//! [`run_replay`] is the whole run behind the command line: load the
//! manifest, build the engine, play every frame, report timing, export.
//! [`run_replay_with`] takes the decoder, engine and clock explicitly.

pub mod clock;
pub mod export;
pub mod scheduler;
pub mod timing;

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::engine::{BaselineEngine, EngineError, EngineOptions, Sensor, TrackingEngine};
use crate::io::{FileImageDecoder, FrameDecodeError, ImageDecoder, ManifestError, SequenceManifest};

pub use clock::{Clock, MonotonicClock, SimulatedClock};
pub use export::{DEFAULT_TRAJECTORY_FILE, ResultExporter};
pub use scheduler::{PacingMode, PlaybackScheduler, PlaybackSession, PlaybackState};
pub use timing::{FrameLatencySample, TimingAggregator, TimingSummary};

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub vocab_path: PathBuf,
    pub settings_path: PathBuf,
    pub sequence_dir: PathBuf,
    pub output_path: PathBuf,
    pub sensor: Sensor,
    pub use_viewer: bool,
    pub pacing: PacingMode,
}

impl ReplayConfig {
    pub fn new(
        vocab_path: impl Into<PathBuf>,
        settings_path: impl Into<PathBuf>,
        sequence_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vocab_path: vocab_path.into(),
            settings_path: settings_path.into(),
            sequence_dir: sequence_dir.into(),
            output_path: PathBuf::from(DEFAULT_TRAJECTORY_FILE),
            sensor: Sensor::Stereo,
            use_viewer: false,
            pacing: PacingMode::Realtime,
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            vocab_path: self.vocab_path.clone(),
            settings_path: self.settings_path.clone(),
            sensor: self.sensor,
            use_viewer: self.use_viewer,
        }
    }
}

/// Any failure that ends a run. All of them are fatal for the whole run.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    FrameDecode(#[from] FrameDecodeError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ReplayError {
    pub fn is_fatal_decode(&self) -> bool {
        matches!(self, ReplayError::FrameDecode(_))
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub frames: usize,
    /// `None` when the sequence had no frames.
    pub timing: Option<TimingSummary>,
    pub trajectory_path: PathBuf,
}

/// Replay `config.sequence_dir` through the bundled engine in real time.
pub fn run_replay(config: &ReplayConfig) -> Result<RunReport, ReplayError> {
    let manifest = SequenceManifest::load(&config.sequence_dir)?;
    let mut engine = BaselineEngine::new(&config.engine_options())?;
    run_replay_with(config, &manifest, &FileImageDecoder, &mut engine, MonotonicClock)
}

/// Replay an already loaded manifest through `engine`.
///
/// The exporter runs only when playback completes; on abort the engine is
/// left as-is and the error is returned.
pub fn run_replay_with<D, E, C>(
    config: &ReplayConfig,
    manifest: &SequenceManifest,
    decoder: &D,
    engine: &mut E,
    clock: C,
) -> Result<RunReport, ReplayError>
where
    D: ImageDecoder,
    E: TrackingEngine<Image = D::Image>,
    C: Clock,
{
    info!("Start processing sequence ...");
    info!("Images in the sequence: {}", manifest.len());

    let session = PlaybackScheduler::new(manifest, decoder, clock)
        .with_pacing(config.pacing)
        .run(engine)?;

    let timing = session.timing().summary();
    match &timing {
        Some(summary) => info!(
            "Tracked {} frames: median {:.6}s, mean {:.6}s, max {:.6}s",
            summary.count,
            summary.median.as_secs_f64(),
            summary.mean.as_secs_f64(),
            summary.max.as_secs_f64()
        ),
        None => info!("Tracking time: no data"),
    }

    ResultExporter::new(&config.output_path).export(engine, &session)?;

    Ok(RunReport {
        frames: session.timing().len(),
        timing,
        trajectory_path: config.output_path.clone(),
    })
}

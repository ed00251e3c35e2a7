//! Frame loop: decode, track, measure, pace.
//!
//! Frames are submitted strictly one at a time and in manifest order. After
//! each frame the scheduler sleeps for whatever is left of the original
//! capture interval; when the engine overruns the interval the next frame
//! starts immediately, nothing is skipped to catch up.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::engine::{SensorFrame, TrackingEngine};
use crate::io::{FrameRecord, ImageDecoder, SequenceManifest};

use super::ReplayError;
use super::clock::Clock;
use super::timing::TimingAggregator;

/// Log a progress line every this many frames.
const PROGRESS_INTERVAL: usize = 100;

/// Whether the scheduler waits out the capture interval between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingMode {
    /// Approximate the original capture cadence.
    #[default]
    Realtime,
    /// Submit frames back to back.
    Unpaced,
}

/// Lifecycle of a playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NotStarted,
    Running,
    /// All frames processed. Terminal.
    Completed,
    /// A frame could not be decoded or tracked. Terminal.
    Aborted,
}

/// Transient state for one run.
#[derive(Debug)]
pub struct PlaybackSession {
    state: PlaybackState,
    cursor: usize,
    timing: TimingAggregator,
}

impl PlaybackSession {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            state: PlaybackState::NotStarted,
            cursor: 0,
            timing: TimingAggregator::with_capacity(capacity),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the next frame to process.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn timing(&self) -> &TimingAggregator {
        &self.timing
    }

    pub fn into_timing(self) -> TimingAggregator {
        self.timing
    }

    pub(super) fn transition(&mut self, next: PlaybackState) {
        debug!("Playback state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Target interval after frame `i`, in seconds.
///
/// The gap to the next timestamp; the last frame reuses the gap to its
/// predecessor, and a single-frame sequence gets 0.
pub fn target_interval(timestamps: &[f64], i: usize) -> f64 {
    let n = timestamps.len();
    if i + 1 < n {
        timestamps[i + 1] - timestamps[i]
    } else if i > 0 && i < n {
        timestamps[i] - timestamps[i - 1]
    } else {
        0.0
    }
}

/// Time left to wait after a frame took `elapsed`, or `None` when the
/// frame already used up the interval, the interval is not positive, or
/// the remainder does not fit in a `Duration`.
pub fn pacing_delay(target_secs: f64, elapsed: Duration) -> Option<Duration> {
    if !target_secs.is_finite() || target_secs <= 0.0 {
        return None;
    }
    let remaining = target_secs - elapsed.as_secs_f64();
    if remaining > 0.0 {
        Duration::try_from_secs_f64(remaining).ok()
    } else {
        None
    }
}

/// Drives one replay of a manifest through an engine.
pub struct PlaybackScheduler<'a, D, C> {
    manifest: &'a SequenceManifest,
    decoder: &'a D,
    clock: C,
    pacing: PacingMode,
}

impl<'a, D, C> PlaybackScheduler<'a, D, C>
where
    D: ImageDecoder,
    C: Clock,
{
    pub fn new(manifest: &'a SequenceManifest, decoder: &'a D, clock: C) -> Self {
        Self {
            manifest,
            decoder,
            clock,
            pacing: PacingMode::default(),
        }
    }

    pub fn with_pacing(mut self, pacing: PacingMode) -> Self {
        self.pacing = pacing;
        self
    }

    /// Process every frame once. Returns the completed session, or the
    /// error that aborted the run; the aborted session is discarded.
    pub fn run<E>(&self, engine: &mut E) -> Result<PlaybackSession, ReplayError>
    where
        E: TrackingEngine<Image = D::Image>,
    {
        let timestamps = self.manifest.timestamps();
        let total = self.manifest.len();
        let mut session = PlaybackSession::new(total);

        for frame in self.manifest.frames() {
            if session.state == PlaybackState::NotStarted {
                session.transition(PlaybackState::Running);
            }
            if let Err(e) = self.process_frame(engine, frame, &timestamps, &mut session) {
                error!("Aborting playback at frame {}: {}", frame.index, e);
                session.transition(PlaybackState::Aborted);
                return Err(e);
            }
            session.cursor = frame.index + 1;

            if session.cursor % PROGRESS_INTERVAL == 0 {
                info!("Processed {}/{} frames", session.cursor, total);
            }
        }

        session.transition(PlaybackState::Completed);
        Ok(session)
    }

    fn process_frame<E>(
        &self,
        engine: &mut E,
        frame: &FrameRecord,
        timestamps: &[f64],
        session: &mut PlaybackSession,
    ) -> Result<(), ReplayError>
    where
        E: TrackingEngine<Image = D::Image>,
    {
        let left = self.decoder.decode(&frame.left_path)?;
        let right = self.decoder.decode(&frame.right_path)?;

        let t1 = self.clock.now();
        engine.track_frame(
            SensorFrame::Stereo {
                left: &left,
                right: &right,
            },
            frame.timestamp,
        )?;
        let t2 = self.clock.now();

        let elapsed = t2.saturating_duration_since(t1);
        session.timing.record(frame.index, elapsed);

        let target = target_interval(timestamps, frame.index);
        let delay = match self.pacing {
            PacingMode::Realtime => pacing_delay(target, elapsed),
            PacingMode::Unpaced => None,
        };
        debug!(
            "Frame {} (ts={:.6}): tracked in {:.6}s, target {:.6}s, sleep {:?}",
            frame.index,
            frame.timestamp,
            elapsed.as_secs_f64(),
            target,
            delay
        );
        if let Some(delay) = delay {
            self.clock.sleep(delay);
        } else if self.pacing == PacingMode::Realtime && target > 0.0 {
            debug!(
                "Frame {} overran capture interval by {:.6}s",
                frame.index,
                elapsed.as_secs_f64() - target
            );
        }
        Ok(())
    }
}

//! Baseline engine - a headless stand-in for a full SLAM system.
//!
//! It honors the [`TrackingEngine`] contract without estimating motion: every
//! frame is checked, handed to a background worker over a bounded channel,
//! and recorded at the origin pose. Replaying a sequence against it measures
//! the harness overhead (decode + hand-off) with no tracking cost on top.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use image::DynamicImage;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::geometry::SE3;

use super::{
    EngineError, EngineOptions, EngineSettings, Sensor, SensorFrame, TrackingEngine,
    VocabularyInfo,
};

/// Capacity of the frame channel between the caller and the worker.
const FRAME_CHANNEL_CAPACITY: usize = 5;

/// Frame summary sent to the worker thread.
struct FrameMsg {
    index: usize,
    timestamp: f64,
    width: u32,
    height: u32,
}

/// Counters maintained by the worker thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineStats {
    pub frames_received: usize,
    pub last_timestamp: Option<f64>,
    pub pixels_seen: u64,
}

/// State shared between the caller and the worker thread.
#[derive(Default)]
struct SharedState {
    stats: RwLock<EngineStats>,
    shutdown_requested: AtomicBool,
}

impl SharedState {
    fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

pub struct BaselineEngine {
    sensor: Sensor,
    settings: EngineSettings,
    vocabulary: VocabularyInfo,

    shared: Arc<SharedState>,
    frame_sender: Option<Sender<FrameMsg>>,
    /// Worker acknowledges each frame index once it is recorded.
    ack_receiver: Receiver<usize>,
    worker_handle: Option<JoinHandle<()>>,

    /// (timestamp, T_wc) per tracked frame.
    trajectory: Vec<(f64, SE3)>,
}

impl BaselineEngine {
    /// Validate the resources and spawn the worker thread.
    pub fn new(options: &EngineOptions) -> Result<Self, EngineError> {
        let vocabulary = VocabularyInfo::read_header(&options.vocab_path)?;
        let settings = EngineSettings::load(&options.settings_path)?;

        info!(
            "Baseline engine: sensor={}, vocabulary k={} L={}, fps={:?}, bf={:?}",
            options.sensor, vocabulary.k, vocabulary.l, settings.camera_fps, settings.camera_bf
        );
        if options.use_viewer {
            warn!("Viewer requested but not available; running headless");
        }

        let shared = Arc::new(SharedState::default());
        let (frame_sender, frame_receiver) = bounded::<FrameMsg>(FRAME_CHANNEL_CAPACITY);
        let (ack_sender, ack_receiver) = unbounded::<usize>();
        let worker_handle = Self::spawn_worker(shared.clone(), frame_receiver, ack_sender);

        Ok(Self {
            sensor: options.sensor,
            settings,
            vocabulary,
            shared,
            frame_sender: Some(frame_sender),
            ack_receiver,
            worker_handle: Some(worker_handle),
            trajectory: Vec::new(),
        })
    }

    fn spawn_worker(
        shared: Arc<SharedState>,
        frame_receiver: Receiver<FrameMsg>,
        ack_sender: Sender<usize>,
    ) -> JoinHandle<()> {
        thread::spawn(move || {
            // Exits once the sender is dropped or shutdown is flagged.
            for msg in frame_receiver.iter() {
                if shared.is_shutdown_requested() {
                    break;
                }
                {
                    let mut stats = shared.stats.write();
                    stats.frames_received += 1;
                    stats.last_timestamp = Some(msg.timestamp);
                    stats.pixels_seen += u64::from(msg.width) * u64::from(msg.height);
                }
                if ack_sender.send(msg.index).is_err() {
                    break;
                }
            }
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn vocabulary(&self) -> VocabularyInfo {
        self.vocabulary
    }

    pub fn trajectory(&self) -> &[(f64, SE3)] {
        &self.trajectory
    }

    pub fn stats(&self) -> EngineStats {
        self.shared.stats.read().clone()
    }

    /// Dimensions of the primary image, checked against the secondary one.
    fn frame_dimensions(frame: &SensorFrame<'_, DynamicImage>) -> Result<(u32, u32), EngineError> {
        let (primary, secondary) = match frame {
            SensorFrame::Monocular { image } => (*image, None),
            SensorFrame::Stereo { left, right } => (*left, Some(*right)),
            SensorFrame::Rgbd { color, depth } => (*color, Some(*depth)),
        };
        let dims = (primary.width(), primary.height());
        if let Some(other) = secondary {
            let other_dims = (other.width(), other.height());
            if other_dims != dims {
                return Err(EngineError::Frame(format!(
                    "image size mismatch: {}x{} vs {}x{}",
                    dims.0, dims.1, other_dims.0, other_dims.1
                )));
            }
        }
        Ok(dims)
    }
}

impl TrackingEngine for BaselineEngine {
    type Image = DynamicImage;

    fn track_frame(
        &mut self,
        frame: SensorFrame<'_, DynamicImage>,
        timestamp: f64,
    ) -> Result<SE3, EngineError> {
        if frame.sensor() != self.sensor {
            return Err(EngineError::SensorMismatch {
                expected: self.sensor,
                got: frame.sensor(),
            });
        }
        let (width, height) = Self::frame_dimensions(&frame)?;
        let sender = self.frame_sender.as_ref().ok_or(EngineError::ShutDown)?;

        let index = self.trajectory.len();
        sender
            .send(FrameMsg {
                index,
                timestamp,
                width,
                height,
            })
            .map_err(|_| EngineError::ShutDown)?;
        // Block until the worker has recorded this frame.
        let acked = self.ack_receiver.recv().map_err(|_| EngineError::ShutDown)?;
        debug!("Frame {} acknowledged (ts={})", acked, timestamp);

        let pose = SE3::identity();
        self.trajectory.push((timestamp, pose.clone()));
        Ok(pose)
    }

    /// KITTI format: one row-major 3x4 `[R|t]` per line.
    fn save_trajectory(&mut self, path: &Path) -> Result<(), EngineError> {
        let io_err = |source| EngineError::Trajectory {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        for (_, pose) in &self.trajectory {
            writeln!(writer, "{}", pose).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;

        info!(
            "Saved trajectory with {} poses to {}",
            self.trajectory.len(),
            path.display()
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shared.request_shutdown();
        // Dropping the sender unblocks the worker if it is waiting on recv.
        self.frame_sender.take();
        if let Some(handle) = self.worker_handle.take() {
            if handle.join().is_err() {
                warn!("Baseline engine worker panicked");
            }
            let stats = self.stats();
            info!(
                "Baseline engine shut down: {} frames, {} pixels",
                stats.frames_received, stats.pixels_seen
            );
        }
    }
}

impl Drop for BaselineEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// tests/replay_scenarios.rs — End-to-end replay runs over on-disk sequences.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use image::{DynamicImage, GrayImage, Luma};
use tempfile::TempDir;

use vslam_replay::engine::{BaselineEngine, EngineError, SensorFrame, TrackingEngine};
use vslam_replay::geometry::SE3;
use vslam_replay::io::{FileImageDecoder, SequenceManifest};
use vslam_replay::replay::{
    PacingMode, ReplayConfig, ReplayError, SimulatedClock, run_replay, run_replay_with,
};

/// Write vocabulary, settings and a stereo sequence with `n_images` pairs.
fn make_sequence(times: &str, n_images: usize) -> (TempDir, ReplayConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("ORBvoc.txt"), "10 6  0 0\n").unwrap();
    fs::write(
        root.join("KITTI00-02.yaml"),
        "%YAML:1.0\nCamera.fps: 10\nCamera.bf: 386.1448\n",
    )
    .unwrap();

    let seq = root.join("00");
    fs::create_dir_all(seq.join("image_0")).unwrap();
    fs::create_dir_all(seq.join("image_1")).unwrap();
    fs::write(seq.join("times.txt"), times).unwrap();
    for i in 0..n_images {
        let name = format!("{:06}.png", i);
        let img = GrayImage::from_pixel(16, 8, Luma([(i * 40) as u8]));
        img.save(seq.join("image_0").join(&name)).unwrap();
        img.save(seq.join("image_1").join(&name)).unwrap();
    }

    let mut config = ReplayConfig::new(
        root.join("ORBvoc.txt"),
        root.join("KITTI00-02.yaml"),
        &seq,
    );
    config.output_path = root.join("CameraTrajectory.txt");
    (dir, config)
}

/// Wraps the baseline engine and counts export calls.
struct CountingEngine {
    inner: BaselineEngine,
    clock: Rc<SimulatedClock>,
    timestamps: Vec<f64>,
    saves: usize,
    shutdowns: usize,
}

impl CountingEngine {
    fn new(config: &ReplayConfig, clock: Rc<SimulatedClock>) -> Self {
        Self {
            inner: BaselineEngine::new(&config.engine_options()).unwrap(),
            clock,
            timestamps: Vec::new(),
            saves: 0,
            shutdowns: 0,
        }
    }
}

impl TrackingEngine for CountingEngine {
    type Image = DynamicImage;

    fn track_frame(
        &mut self,
        frame: SensorFrame<'_, DynamicImage>,
        timestamp: f64,
    ) -> Result<SE3, EngineError> {
        self.clock.advance(Duration::from_millis(20));
        self.timestamps.push(timestamp);
        self.inner.track_frame(frame, timestamp)
    }

    fn save_trajectory(&mut self, path: &Path) -> Result<(), EngineError> {
        self.saves += 1;
        self.inner.save_trajectory(path)
    }

    fn shutdown(&mut self) {
        self.shutdowns += 1;
        self.inner.shutdown();
    }
}

// ===== Scenarios =====

#[test]
fn three_frame_sequence_completes_and_exports_once() {
    let (_dir, config) = make_sequence("0.0\n0.1\n0.2\n", 3);
    let manifest = SequenceManifest::load(&config.sequence_dir).unwrap();
    assert_eq!(manifest.len(), 3);

    let clock = Rc::new(SimulatedClock::new());
    let mut engine = CountingEngine::new(&config, clock.clone());
    let report =
        run_replay_with(&config, &manifest, &FileImageDecoder, &mut engine, clock.clone())
            .unwrap();

    assert_eq!(report.frames, 3);
    assert_eq!(engine.timestamps, vec![0.0, 0.1, 0.2]);
    assert_eq!(engine.saves, 1);
    assert_eq!(engine.shutdowns, 1);

    let summary = report.timing.unwrap();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.median, Duration::from_millis(20));

    // 100 ms cadence minus 20 ms simulated tracking
    assert_eq!(clock.sleeps().len(), 3);

    let trajectory = fs::read_to_string(&report.trajectory_path).unwrap();
    assert_eq!(trajectory.lines().count(), 3);
}

#[test]
fn missing_image_aborts_without_export() {
    let (_dir, config) = make_sequence("0.0\n0.1\n0.2\n", 3);
    let missing = config.sequence_dir.join("image_0").join("000001.png");
    fs::remove_file(&missing).unwrap();

    let manifest = SequenceManifest::load(&config.sequence_dir).unwrap();
    let clock = Rc::new(SimulatedClock::new());
    let mut engine = CountingEngine::new(&config, clock.clone());
    let err = run_replay_with(&config, &manifest, &FileImageDecoder, &mut engine, clock)
        .unwrap_err();

    assert!(err.is_fatal_decode());
    match &err {
        ReplayError::FrameDecode(e) => assert_eq!(e.path, missing),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        format!("Failed to load image at: {}", missing.display())
    );
    // Index 2 never reached
    assert_eq!(engine.timestamps, vec![0.0]);
    assert_eq!(engine.saves, 0);
    assert_eq!(engine.shutdowns, 0);
    assert!(!config.output_path.exists());
}

#[test]
fn missing_right_image_is_also_fatal() {
    let (_dir, config) = make_sequence("0.0\n0.1\n", 2);
    let missing = config.sequence_dir.join("image_1").join("000000.png");
    fs::remove_file(&missing).unwrap();

    let mut config = config;
    config.pacing = PacingMode::Unpaced;
    match run_replay(&config) {
        Err(ReplayError::FrameDecode(e)) => assert_eq!(e.path, missing),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn run_replay_end_to_end() {
    let (_dir, mut config) = make_sequence("0.000000e+00\n\n1.000000e-02\n2.000000e-02\n", 3);
    config.pacing = PacingMode::Unpaced;

    let report = run_replay(&config).unwrap();
    assert_eq!(report.frames, 3);
    assert!(report.timing.is_some());

    let trajectory = fs::read_to_string(&config.output_path).unwrap();
    let first: Vec<f64> = trajectory
        .lines()
        .next()
        .unwrap()
        .split(' ')
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(first, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn empty_sequence_completes_with_no_data() {
    let (_dir, mut config) = make_sequence("\n\n", 0);
    config.pacing = PacingMode::Unpaced;

    let report = run_replay(&config).unwrap();
    assert_eq!(report.frames, 0);
    assert!(report.timing.is_none());
    assert_eq!(fs::read_to_string(&config.output_path).unwrap(), "");
}

#[test]
fn missing_timestamp_file_is_manifest_error() {
    let (_dir, config) = make_sequence("0.0\n", 1);
    fs::remove_file(config.sequence_dir.join("times.txt")).unwrap();

    let err = run_replay(&config).unwrap_err();
    assert!(matches!(err, ReplayError::Manifest(_)));
    assert!(!config.output_path.exists());
}

#[test]
fn missing_settings_is_engine_error() {
    let (_dir, mut config) = make_sequence("0.0\n", 1);
    config.settings_path = PathBuf::from("/no/such/settings.yaml");

    let err = run_replay(&config).unwrap_err();
    assert!(matches!(err, ReplayError::Engine(EngineError::Settings { .. })));
}

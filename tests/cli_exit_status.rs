// tests/cli_exit_status.rs — Exit status and stderr of the stereo_replay binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use image::{GrayImage, Luma};

/// Write vocabulary, settings and a 3-frame sequence at 10 ms cadence under `root`.
fn write_sequence(root: &Path) {
    fs::write(root.join("ORBvoc.txt"), "10 6  0 0\n").unwrap();
    fs::write(root.join("KITTI00-02.yaml"), "%YAML:1.0\nCamera.fps: 100\n").unwrap();

    let seq = root.join("00");
    fs::create_dir_all(seq.join("image_0")).unwrap();
    fs::create_dir_all(seq.join("image_1")).unwrap();
    fs::write(seq.join("times.txt"), "0.0\n0.01\n0.02\n").unwrap();
    for i in 0..3 {
        let name = format!("{:06}.png", i);
        let img = GrayImage::from_pixel(8, 8, Luma([100u8]));
        img.save(seq.join("image_0").join(&name)).unwrap();
        img.save(seq.join("image_1").join(&name)).unwrap();
    }
}

fn run_binary(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stereo_replay"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to launch stereo_replay")
}

#[test]
fn completed_run_exits_zero_and_writes_trajectory() {
    let dir = tempfile::tempdir().unwrap();
    write_sequence(dir.path());

    let out = run_binary(dir.path(), &["ORBvoc.txt", "KITTI00-02.yaml", "00"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("median tracking time:"));
    assert!(stdout.contains("mean tracking time:"));

    let trajectory = fs::read_to_string(dir.path().join("CameraTrajectory.txt")).unwrap();
    assert_eq!(trajectory.lines().count(), 3);
}

#[test]
fn missing_image_exits_one_and_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    write_sequence(dir.path());
    let missing = Path::new("00").join("image_0").join("000001.png");
    fs::remove_file(dir.path().join(&missing)).unwrap();

    let out = run_binary(dir.path(), &["ORBvoc.txt", "KITTI00-02.yaml", "00"]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains(&format!("Failed to load image at: {}", missing.display())),
        "stderr: {stderr}"
    );
    assert!(!dir.path().join("CameraTrajectory.txt").exists());
}

#[test]
fn wrong_arity_exits_one_with_usage() {
    let dir = tempfile::tempdir().unwrap();

    for args in [&[][..], &["ORBvoc.txt", "KITTI00-02.yaml"][..], &["a", "b", "c", "d"][..]] {
        let out = run_binary(dir.path(), args);
        assert_eq!(out.status.code(), Some(1), "args: {args:?}");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("Usage: ./stereo_replay"), "stderr: {stderr}");
    }
}

#[test]
fn engine_error_exits_one_and_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    write_sequence(dir.path());

    let out = run_binary(dir.path(), &["ORBvoc.txt", "missing.yaml", "00"]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("Settings error").count(), 1, "stderr: {stderr}");
}

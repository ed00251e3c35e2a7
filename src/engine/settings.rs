//! Engine settings resource (OpenCV-style YAML).
//!
//! Camera calibration files start with a `%YAML:1.0` directive that plain
//! YAML parsers reject, so directive lines are dropped before parsing.
//! Only the keys the harness reports on are read; everything else is ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineSettings {
    /// Nominal capture rate.
    #[serde(rename = "Camera.fps", default)]
    pub camera_fps: Option<f64>,
    /// Stereo baseline times fx.
    #[serde(rename = "Camera.bf", default)]
    pub camera_bf: Option<f64>,
}

impl EngineSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| EngineError::Settings {
            path: path.to_path_buf(),
            reason: format!("Failed to open settings file: {}", e),
        })?;
        Self::parse(&text).map_err(|reason| EngineError::Settings {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(text: &str) -> Result<Self, String> {
        let body: String = text
            .lines()
            .filter(|line| !line.starts_with('%'))
            .collect::<Vec<_>>()
            .join("\n");
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&body).map_err(|e| e.to_string())
    }
}

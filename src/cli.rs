//! Command-line surface of the `stereo_replay` binary.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use thiserror::Error;

use crate::replay::ReplayConfig;

pub const USAGE: &str =
    "Usage: ./stereo_replay path_to_vocabulary path_to_settings path_to_sequence";

#[derive(Parser, Debug)]
#[command(
    name = "stereo_replay",
    version,
    about = "Replay a KITTI-style stereo sequence through a tracking engine at capture pace"
)]
struct Args {
    /// ORB vocabulary file (DBoW2 text format)
    vocabulary: PathBuf,
    /// Engine settings file (camera calibration YAML)
    settings: PathBuf,
    /// Sequence directory containing times.txt, image_0/ and image_1/
    sequence: PathBuf,
}

/// Command line could not be turned into a run.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// Wrong number or shape of arguments.
    #[error("{}", USAGE)]
    Usage,
    /// `--help` / `--version`; carries clap's rendered output.
    #[error("{0}")]
    Info(String),
}

impl ArgumentError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ArgumentError::Usage => 1,
            ArgumentError::Info(_) => 0,
        }
    }
}

/// Parse `argv` (program name first) into a run configuration.
pub fn parse_args<I, T>(argv: I) -> Result<ReplayConfig, ArgumentError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Ok(ReplayConfig::new(args.vocabulary, args.settings, args.sequence)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Err(ArgumentError::Info(e.to_string()))
        }
        Err(_) => Err(ArgumentError::Usage),
    }
}

//! DBoW2 vocabulary resource check.
//!
//! Only the header is read here; the tree itself is the engine's business.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::EngineError;

/// Parameters from the vocabulary header line `k L [scoring weighting]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyInfo {
    /// Branching factor
    pub k: usize,
    /// Depth levels
    pub l: usize,
}

impl VocabularyInfo {
    pub fn read_header<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let err = |reason: String| EngineError::Vocabulary {
            path: path.to_path_buf(),
            reason,
        };

        let file =
            File::open(path).map_err(|e| err(format!("Failed to open vocabulary file: {}", e)))?;
        let mut header = String::new();
        BufReader::new(file)
            .read_line(&mut header)
            .map_err(|e| err(e.to_string()))?;
        Self::parse_header(&header).map_err(err)
    }

    fn parse_header(header: &str) -> Result<Self, String> {
        let parts: Vec<&str> = header.split_whitespace().collect();
        if parts.len() < 2 {
            return Err("Invalid header format, expected: k L [scoring weighting]".to_string());
        }
        let k: usize = parts[0]
            .parse()
            .map_err(|_| "Invalid k value".to_string())?;
        let l: usize = parts[1]
            .parse()
            .map_err(|_| "Invalid L value".to_string())?;
        Ok(Self { k, l })
    }
}

//! Dataset input: sequence manifests and image decoding.

pub mod decoder;
pub mod sequence;

pub use decoder::{FileImageDecoder, FrameDecodeError, ImageDecoder};
pub use sequence::{FrameRecord, ManifestError, SequenceManifest};

//! Encoder backend trait and shared error type.
//!
//! The [`EncoderBackend`] trait defines the two operations the re-encoder
//! needs: encode an asset at a quality, and verify that produced bytes decode.
//!
//! The production implementation is
//! [`JpegBackend`](super::rust_backend::JpegBackend), built on the `image`
//! crate's pure-Rust JPEG codec.

use super::params::{Asset, EncodedBlob, Quality};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for encoding backends.
///
/// Encoded size is assumed to be non-decreasing in quality for a fixed asset.
/// That is a property of the concrete codec, not something the re-encoder
/// checks.
pub trait EncoderBackend: Sync {
    /// Encode `asset` at `quality`.
    fn encode(&self, asset: &Asset, quality: Quality) -> Result<EncodedBlob, BackendError>;

    /// Whether `blob` decodes back into an image.
    fn verify(&self, blob: &EncodedBlob) -> bool;
}

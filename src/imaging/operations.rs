//! High-level image operations.
//!
//! These functions combine the quality schedule with backend execution. They
//! take a budget, decide which qualities to try, and call the backend.

use super::backend::{BackendError, EncoderBackend};
use super::params::{Asset, EncodedBlob, Quality};
use super::rust_backend::load_asset;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound for a shared image: 10 MiB.
pub const DEFAULT_MAX_SHARE_BYTES: u64 = 10_485_760;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Byte budget must be positive")]
    InvalidBudget,
    #[error("Encoding unavailable: {0}")]
    EncodingUnavailable(String),
}

/// Re-encode `asset` at decreasing quality until it fits in `max_bytes`.
///
/// Quality 1.0 is tried first and returned as-is when it fits. Otherwise the
/// levels 0.9, 0.8, ... 0.1 are tried in order, stopping at the first blob
/// within budget or at the 0.1 floor, for at most ten attempts. The last
/// attempt is returned even when it is still over budget.
///
/// If a reduced-quality attempt errors or the result fails
/// [`EncoderBackend::verify`], the quality-1.0 blob is returned instead.
///
/// Encoded size is not checked for monotonicity: with a codec whose size
/// does not shrink with quality the loop still stops at the floor, but the
/// result can be larger than an earlier attempt.
pub fn compress_to_limit(
    backend: &impl EncoderBackend,
    asset: &Asset,
    max_bytes: u64,
) -> Result<EncodedBlob, CompressError> {
    if max_bytes == 0 {
        return Err(CompressError::InvalidBudget);
    }

    let original = backend
        .encode(asset, Quality::MAX)
        .map_err(|e| CompressError::EncodingUnavailable(e.to_string()))?;
    tracing::debug!(quality = %Quality::MAX, bytes = original.len(), "encoded");
    if original.len() <= max_bytes {
        return Ok(original);
    }

    match reduce_quality(backend, asset, max_bytes) {
        Ok(blob) if backend.verify(&blob) => {
            if blob.len() > max_bytes {
                tracing::info!(
                    bytes = blob.len(),
                    max_bytes,
                    "quality floor reached, returning best effort"
                );
            }
            Ok(blob)
        }
        Ok(blob) => {
            tracing::warn!(quality = %blob.quality, "reduced blob does not decode, using original");
            Ok(original)
        }
        Err(e) => {
            tracing::warn!(error = %e, "re-encode failed, using original");
            Ok(original)
        }
    }
}

/// Walk the schedule below 1.0 and return the last attempt.
fn reduce_quality(
    backend: &impl EncoderBackend,
    asset: &Asset,
    max_bytes: u64,
) -> Result<EncodedBlob, BackendError> {
    let mut quality = Quality::from_tenths(9);
    loop {
        let blob = backend.encode(asset, quality)?;
        tracing::debug!(%quality, bytes = blob.len(), "encoded");
        if blob.len() <= max_bytes {
            return Ok(blob);
        }
        match quality.step_down() {
            Some(next) => quality = next,
            None => return Ok(blob),
        }
    }
}

/// What a share action hands to the system share facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Re-encoded JPEG within (or as close as possible to) the budget.
    Compressed(EncodedBlob),
    /// The source file's bytes, unmodified, because nothing could be encoded.
    Original(Vec<u8>),
}

impl ShareOutcome {
    pub fn bytes(&self) -> &[u8] {
        match self {
            ShareOutcome::Compressed(blob) => &blob.bytes,
            ShareOutcome::Original(bytes) => bytes,
        }
    }

    pub fn quality(&self) -> Option<Quality> {
        match self {
            ShareOutcome::Compressed(blob) => Some(blob.quality),
            ShareOutcome::Original(_) => None,
        }
    }
}

/// Load `source` and prepare it for sharing under `max_bytes`.
///
/// Never fails because of the encoder: if no encoding can be produced the
/// original file bytes are shared. Only I/O, unsupported-format and decode
/// errors propagate.
pub fn prepare_share(
    backend: &impl EncoderBackend,
    source: &Path,
    max_bytes: u64,
) -> Result<ShareOutcome, ShareError> {
    let asset = load_asset(source)?;
    match compress_to_limit(backend, &asset, max_bytes) {
        Ok(blob) => Ok(ShareOutcome::Compressed(blob)),
        Err(CompressError::EncodingUnavailable(reason)) => {
            tracing::warn!(source = %source.display(), %reason, "sharing original file");
            Ok(ShareOutcome::Original(std::fs::read(source)?))
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Error, Debug)]
pub enum ShareError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Compress(#[from] CompressError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of exporting one file.
#[derive(Debug)]
pub struct ShareReport {
    pub source: PathBuf,
    pub result: Result<ExportedFile, ShareError>,
}

/// A blob written to disk for sharing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub bytes: u64,
    pub quality: Option<Quality>,
}

/// Output file stem for each source, unique within the batch.
///
/// Sources sharing a stem (`photo.png`, `photo.tiff`) get a numeric suffix
/// in input order: `photo`, `photo-2`. Names are compared case-insensitively
/// so the exports stay distinct on case-folding filesystems.
pub fn share_stems(sources: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    sources
        .iter()
        .map(|source| {
            let stem = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let mut candidate = stem.clone();
            let mut n = 2;
            while !taken.insert(candidate.to_lowercase()) {
                candidate = format!("{stem}-{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Output path for a shared file: compressed blobs are always `.jpg`,
/// originals keep their source extension.
pub fn export_path(
    stem: &str,
    source: &Path,
    output_dir: &Path,
    outcome: &ShareOutcome,
) -> PathBuf {
    let name = match outcome {
        ShareOutcome::Compressed(_) => format!("{stem}-share.jpg"),
        ShareOutcome::Original(_) => match source.extension() {
            Some(ext) => format!("{stem}-share.{}", ext.to_string_lossy()),
            None => format!("{stem}-share"),
        },
    };
    output_dir.join(name)
}

/// Prepare and write each source into `output_dir`, in parallel.
///
/// Every source gets its own report and its own output file; one failure
/// does not stop the others. Reports are returned in input order.
pub fn export_for_share(
    backend: &impl EncoderBackend,
    sources: &[PathBuf],
    output_dir: &Path,
    max_bytes: u64,
) -> Vec<ShareReport> {
    let stems = share_stems(sources);
    sources
        .par_iter()
        .zip(stems.par_iter())
        .map(|(source, stem)| ShareReport {
            source: source.clone(),
            result: export_one(backend, source, stem, output_dir, max_bytes),
        })
        .collect()
}

fn export_one(
    backend: &impl EncoderBackend,
    source: &Path,
    stem: &str,
    output_dir: &Path,
    max_bytes: u64,
) -> Result<ExportedFile, ShareError> {
    let outcome = prepare_share(backend, source, max_bytes)?;
    let path = export_path(stem, source, output_dir, &outcome);
    std::fs::write(&path, outcome.bytes())?;
    Ok(ExportedFile {
        path,
        bytes: outcome.bytes().len() as u64,
        quality: outcome.quality(),
    })
}

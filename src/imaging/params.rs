//! Parameter types for image encoding.
//!
//! These types describe *what* to encode, not *how*. They sit between the
//! [`operations`](super::operations) module (which decides which qualities to
//! try) and the [`backend`](super::backend) (which produces the bytes), so the
//! search logic can be tested against a mock encoder.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality in tenths (0.1–1.0). Clamped on construction.
//! - [`Asset`] — An immutable decoded image.
//! - [`EncodedBlob`] — Encoded bytes plus the quality they were produced at.

use super::calculations::Size;
use image::DynamicImage;

/// Lossy encoding quality, stored as integer tenths (1 = 0.1, 10 = 1.0).
///
/// Tenths keep the re-encoder's step schedule exact: ten distinct levels
/// with no accumulated floating-point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: Quality = Quality(10);
    /// Lowest level the re-encoder will try.
    pub const FLOOR: Quality = Quality(1);

    pub fn from_tenths(tenths: u8) -> Self {
        Self(tenths.clamp(Self::FLOOR.0, Self::MAX.0))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        self.0 as f32 / 10.0
    }

    /// The same quality on the 1–100 scale JPEG encoders take.
    pub fn jpeg_value(self) -> u8 {
        self.0 * 10
    }

    /// The next level down, or `None` at the floor.
    pub fn step_down(self) -> Option<Self> {
        (self > Self::FLOOR).then(|| Self(self.0 - 1))
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::MAX
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.as_f32())
    }
}

/// A decoded image ready for layout or encoding.
#[derive(Debug, Clone)]
pub struct Asset {
    image: DynamicImage,
}

impl Asset {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn size(&self) -> Size {
        Size::from((self.image.width(), self.image.height()))
    }
}

impl From<DynamicImage> for Asset {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// Bytes produced by one encode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    pub bytes: Vec<u8>,
    pub quality: Quality,
}

impl EncodedBlob {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

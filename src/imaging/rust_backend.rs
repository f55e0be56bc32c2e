//! Pure Rust encoding backend built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Verify | `image::load_from_memory_with_format` |

use super::backend::{BackendError, EncoderBackend};
use super::params::{Asset, EncodedBlob, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has an extension with a compiled-in decoder.
///
/// Paths without an extension are accepted; their format is sniffed from
/// the content.
pub fn is_supported_input(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => supported_input_extensions()
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(ext)),
        None => true,
    }
}

/// Load and decode an image from disk.
///
/// Unsupported extensions are rejected before the file is opened.
pub fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    if !is_supported_input(path) {
        return Err(BackendError::ProcessingFailed(format!(
            "Unsupported input format: {} (expected one of {})",
            path.display(),
            supported_input_extensions().join(", ")
        )));
    }
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Load an image from disk as an [`Asset`].
pub fn load_asset(path: &Path) -> Result<Asset, BackendError> {
    load_image(path).map(Asset::new)
}

/// JPEG backend using the `image` crate.
///
/// Alpha is dropped before encoding since JPEG has no alpha channel.
pub struct JpegBackend;

impl JpegBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderBackend for JpegBackend {
    fn encode(&self, asset: &Asset, quality: Quality) -> Result<EncodedBlob, BackendError> {
        let rgb = asset.image().to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality.jpeg_value())
            .encode_image(&rgb)
            .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
        Ok(EncodedBlob { bytes, quality })
    }

    fn verify(&self, blob: &EncodedBlob) -> bool {
        image::load_from_memory_with_format(&blob.bytes, ImageFormat::Jpeg).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, RgbImage};

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    fn gradient_asset(width: u32, height: u32) -> Asset {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        Asset::new(DynamicImage::ImageRgb8(img))
    }

    /// Create a small valid PNG file with the given dimensions.
    fn create_test_png(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        image::codecs::png::PngEncoder::new(writer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    #[test]
    fn encode_produces_verifiable_jpeg() {
        let backend = JpegBackend::new();
        let blob = backend.encode(&gradient_asset(64, 48), Quality::MAX).unwrap();

        assert!(!blob.is_empty());
        assert_eq!(&blob.bytes[..2], &[0xFF, 0xD8]);
        assert!(backend.verify(&blob));
    }

    #[test]
    fn encode_keeps_dimensions() {
        let backend = JpegBackend::new();
        let blob = backend
            .encode(&gradient_asset(120, 80), Quality::from_tenths(5))
            .unwrap();
        let decoded = image::load_from_memory(&blob.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn encode_drops_alpha() {
        let rgba = image::RgbaImage::from_pixel(16, 16, image::Rgba([10, 20, 30, 40]));
        let asset = Asset::new(DynamicImage::ImageRgba8(rgba));
        let blob = JpegBackend::new().encode(&asset, Quality::MAX).unwrap();
        assert!(JpegBackend::new().verify(&blob));
    }

    #[test]
    fn lower_quality_is_smaller() {
        let backend = JpegBackend::new();
        let asset = gradient_asset(256, 256);
        let high = backend.encode(&asset, Quality::MAX).unwrap();
        let low = backend.encode(&asset, Quality::FLOOR).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn verify_rejects_garbage() {
        let blob = EncodedBlob {
            bytes: vec![1, 2, 3, 4],
            quality: Quality::MAX,
        };
        assert!(!JpegBackend::new().verify(&blob));
    }

    #[test]
    fn load_image_reads_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("source.png");
        create_test_png(&path, 30, 20);

        let img = load_image(&path).unwrap();
        assert_eq!((img.width(), img.height()), (30, 20));
    }

    #[test]
    fn load_image_nonexistent_file_errors() {
        let result = load_image(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn supported_input_ignores_case_and_accepts_no_extension() {
        assert!(is_supported_input(Path::new("/in/DAWN.JPG")));
        assert!(is_supported_input(Path::new("/in/scan.Tiff")));
        assert!(is_supported_input(Path::new("/in/noext")));
        assert!(!is_supported_input(Path::new("/in/raw.heic")));
        assert!(!is_supported_input(Path::new("/in/notes.txt")));
    }

    #[test]
    fn load_image_rejects_unsupported_extension_before_reading() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("photo.heic");
        create_test_png(&path, 10, 10);

        let result = load_image(&path);
        assert!(
            matches!(&result, Err(BackendError::ProcessingFailed(msg)) if msg.contains("Unsupported input format"))
        );
        // Missing file with an unsupported extension is rejected without I/O
        let missing = load_image(Path::new("/nonexistent/raw.heic"));
        assert!(matches!(missing, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn load_asset_reports_image_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("source.png");
        create_test_png(&path, 48, 36);

        let asset = load_asset(&path).unwrap();
        assert_eq!(asset.size(), crate::imaging::Size::new(48.0, 36.0));
    }

    #[test]
    fn load_image_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let result = load_image(&path);
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}

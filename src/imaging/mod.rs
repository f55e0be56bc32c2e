//! Image geometry and share encoding — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Layout** | [`compute_layout`] (aspect-fill + centering) |
//! | **Zoom** | [`zoomed_insets`] with [`ZoomBounds`] |
//! | **Decode** | `image::ImageReader` |
//! | **Share encode** | [`compress_to_limit`] over `image`'s JPEG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for viewer geometry (unit testable)
//! - **Parameters**: Quality, asset and blob types
//! - **Backend**: [`EncoderBackend`] trait + [`JpegBackend`]
//! - **Operations**: The quality search and share export on top of a backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, EncoderBackend};
pub use calculations::{
    Frame, Insets, LayoutError, LayoutResult, Size, ZoomBounds, center_insets, compute_layout,
    zoomed_insets,
};
pub use operations::{
    CompressError, DEFAULT_MAX_SHARE_BYTES, ExportedFile, ShareError, ShareOutcome, ShareReport,
    compress_to_limit, export_for_share, prepare_share,
};
pub use params::{Asset, EncodedBlob, Quality};
pub use rust_backend::{JpegBackend, is_supported_input, load_asset, load_image};

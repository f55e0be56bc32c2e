//! Pure calculation functions for viewer geometry.
//!
//! All functions here are pure and testable without any I/O or images. The
//! hosting view calls [`compute_layout`] whenever the asset or its own bounds
//! change, and [`zoomed_insets`] on every zoom callback.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LayoutError {
    #[error("Invalid asset dimensions: {width}x{height}")]
    InvalidDimension { width: f64, height: f64 },
    #[error("Invalid viewport dimensions: {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Width/height pair in abstract units (pixels or points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Finite and non-negative; a zero-area viewport lays out to a 0x0 frame.
    fn is_viewport(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

/// Content insets applied by the scroll view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Destination rectangle for the image view. `x` and `y` are always 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Output of a layout pass, at zoom scale 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    pub frame: Frame,
    pub insets: Insets,
    /// Factor applied to the asset size to produce `frame`.
    pub scale: f64,
}

/// Calculate the aspect-fill frame and centering insets for an asset.
///
/// The asset is scaled by the larger of the two axis ratios so it covers the
/// viewport, overflowing along the other axis. Insets only carry slack when
/// the scaled content is smaller than the viewport along an axis.
///
/// A non-positive or non-finite asset fails with
/// [`LayoutError::InvalidDimension`]; a negative or non-finite viewport
/// fails with [`LayoutError::InvalidViewport`]. In both cases the caller
/// skips the layout pass instead of applying NaN or infinite geometry.
///
/// # Examples
/// ```
/// # use image_feed::imaging::{Size, compute_layout};
/// // 200x100 in a 300x300 viewport → scale 3.0, frame 600x300
/// let layout = compute_layout(Size::new(200.0, 100.0), Size::new(300.0, 300.0)).unwrap();
/// assert_eq!(layout.scale, 3.0);
/// assert_eq!((layout.frame.width, layout.frame.height), (600.0, 300.0));
/// ```
pub fn compute_layout(asset: Size, viewport: Size) -> Result<LayoutResult, LayoutError> {
    if !asset.is_drawable() {
        return Err(LayoutError::InvalidDimension {
            width: asset.width,
            height: asset.height,
        });
    }
    if !viewport.is_viewport() {
        return Err(LayoutError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let width_ratio = viewport.width / asset.width;
    let height_ratio = viewport.height / asset.height;
    let scale = width_ratio.max(height_ratio);

    let scaled = asset.scaled(scale);
    let frame = Frame {
        x: 0.0,
        y: 0.0,
        width: scaled.width,
        height: scaled.height,
    };

    Ok(LayoutResult {
        frame,
        insets: center_insets(viewport, scaled),
        scale,
    })
}

/// Symmetric insets that center `content` inside `viewport`, clamped at zero.
pub fn center_insets(viewport: Size, content: Size) -> Insets {
    let horizontal = ((viewport.width - content.width) * 0.5).max(0.0);
    let vertical = ((viewport.height - content.height) * 0.5).max(0.0);

    Insets {
        top: vertical,
        left: horizontal,
        bottom: vertical,
        right: horizontal,
    }
}

/// Allowed zoom range for the single-image viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl ZoomBounds {
    /// Clamp `zoom` into range; NaN is treated as 1.0.
    pub fn clamp(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_nan() { 1.0 } else { zoom };
        zoom.max(self.min).min(self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 1.25,
        }
    }
}

/// Re-center the laid-out content after the user zooms.
///
/// The zoom is clamped to `bounds` first; the layout frame is the content at
/// zoom 1.0.
pub fn zoomed_insets(
    layout: &LayoutResult,
    viewport: Size,
    zoom: f64,
    bounds: ZoomBounds,
) -> Insets {
    let zoom = bounds.clamp(zoom);
    center_insets(viewport, layout.frame.size().scaled(zoom))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(asset: (f64, f64), viewport: (f64, f64)) -> LayoutResult {
        compute_layout(
            Size::new(asset.0, asset.1),
            Size::new(viewport.0, viewport.1),
        )
        .unwrap()
    }

    // =========================================================================
    // compute_layout tests
    // =========================================================================

    #[test]
    fn layout_wide_asset_in_square_viewport() {
        // widthRatio 1.5, heightRatio 3.0 → scale 3.0 → 600x300
        let result = layout((200.0, 100.0), (300.0, 300.0));
        assert_eq!(result.scale, 3.0);
        assert_eq!(
            result.frame,
            Frame {
                x: 0.0,
                y: 0.0,
                width: 600.0,
                height: 300.0
            }
        );
        assert_eq!(result.insets, Insets::default());
    }

    #[test]
    fn layout_tall_asset_in_landscape_viewport() {
        // 100x400 in 800x600: ratios 8.0 / 1.5 → 800x3200
        let result = layout((100.0, 400.0), (800.0, 600.0));
        assert_eq!(result.scale, 8.0);
        assert_eq!(result.frame.width, 800.0);
        assert_eq!(result.frame.height, 3200.0);
    }

    #[test]
    fn layout_scales_down_large_asset() {
        // 4000x3000 in 400x800: ratios 0.1 / 0.2667 → height matches
        let result = layout((4000.0, 3000.0), (400.0, 800.0));
        assert!((result.frame.height - 800.0).abs() < 1e-9);
        assert!(result.frame.width > 400.0);
    }

    #[test]
    fn layout_same_aspect_fills_exactly() {
        let result = layout((400.0, 300.0), (800.0, 600.0));
        assert_eq!(result.scale, 2.0);
        assert_eq!(result.frame.size(), Size::new(800.0, 600.0));
        assert_eq!(result.insets, Insets::default());
    }

    #[test]
    fn layout_covers_at_least_one_axis() {
        let assets = [(1.0, 1.0), (3.0, 7.0), (1920.0, 1080.0), (13.5, 0.25)];
        let viewports = [(320.0, 568.0), (1024.0, 768.0), (1.0, 1000.0), (0.5, 0.5)];
        for &asset in &assets {
            for &viewport in &viewports {
                let r = layout(asset, viewport);
                let eps = 1e-9;
                assert!(
                    r.frame.width + eps >= viewport.0 || r.frame.height + eps >= viewport.1,
                    "{asset:?} in {viewport:?} covers neither axis"
                );
            }
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let asset = Size::new(1234.0, 567.0);
        let viewport = Size::new(390.0, 844.0);
        let first = compute_layout(asset, viewport).unwrap();
        let second = compute_layout(asset, viewport).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn layout_reruns_after_rotation() {
        let asset = Size::new(200.0, 100.0);
        let portrait = compute_layout(asset, Size::new(300.0, 600.0)).unwrap();
        let landscape = compute_layout(asset, Size::new(600.0, 300.0)).unwrap();
        assert_eq!(portrait.frame.size(), Size::new(1200.0, 600.0));
        assert_eq!(landscape.frame.size(), Size::new(600.0, 300.0));
    }

    #[test]
    fn layout_zero_width_is_invalid() {
        let result = compute_layout(Size::new(0.0, 100.0), Size::new(300.0, 300.0));
        assert!(matches!(result, Err(LayoutError::InvalidDimension { .. })));
    }

    #[test]
    fn layout_zero_height_is_invalid() {
        let result = compute_layout(Size::new(100.0, 0.0), Size::new(300.0, 300.0));
        assert!(matches!(result, Err(LayoutError::InvalidDimension { .. })));
    }

    #[test]
    fn layout_negative_or_nan_is_invalid() {
        assert!(compute_layout(Size::new(-5.0, 10.0), Size::new(1.0, 1.0)).is_err());
        assert!(compute_layout(Size::new(f64::NAN, 10.0), Size::new(1.0, 1.0)).is_err());
        assert!(compute_layout(Size::new(f64::INFINITY, 10.0), Size::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn layout_nan_or_negative_viewport_is_invalid() {
        let asset = Size::new(200.0, 100.0);
        for viewport in [
            Size::new(f64::NAN, 1.0),
            Size::new(1.0, f64::INFINITY),
            Size::new(-300.0, 300.0),
        ] {
            assert!(matches!(
                compute_layout(asset, viewport),
                Err(LayoutError::InvalidViewport { .. })
            ));
        }
    }

    #[test]
    fn layout_zero_viewport_collapses_to_empty_frame() {
        let result = layout((200.0, 100.0), (0.0, 0.0));
        assert_eq!(result.frame.size(), Size::new(0.0, 0.0));
        assert_eq!(result.insets, Insets::default());
    }

    // =========================================================================
    // center_insets tests
    // =========================================================================

    #[test]
    fn center_insets_undersized_content() {
        let insets = center_insets(Size::new(300.0, 500.0), Size::new(100.0, 300.0));
        assert_eq!(
            insets,
            Insets {
                top: 100.0,
                left: 100.0,
                bottom: 100.0,
                right: 100.0
            }
        );
    }

    #[test]
    fn center_insets_clamps_oversized_content() {
        let insets = center_insets(Size::new(300.0, 300.0), Size::new(600.0, 200.0));
        assert_eq!(insets.left, 0.0);
        assert_eq!(insets.right, 0.0);
        assert_eq!(insets.top, 50.0);
        assert_eq!(insets.bottom, 50.0);
    }

    // =========================================================================
    // zoom tests
    // =========================================================================

    #[test]
    fn zoom_bounds_default_range() {
        let bounds = ZoomBounds::default();
        assert_eq!(bounds.min, 0.1);
        assert_eq!(bounds.max, 1.25);
    }

    #[test]
    fn zoom_bounds_clamp() {
        let bounds = ZoomBounds::default();
        assert_eq!(bounds.clamp(0.01), 0.1);
        assert_eq!(bounds.clamp(0.5), 0.5);
        assert_eq!(bounds.clamp(3.0), 1.25);
        assert_eq!(bounds.clamp(f64::NAN), 1.0);
    }

    #[test]
    fn zoomed_out_content_is_centered() {
        // 600x300 frame in 300x300, zoom 0.5 → 300x150 content, 75 vertical slack
        let result = layout((200.0, 100.0), (300.0, 300.0));
        let insets = zoomed_insets(
            &result,
            Size::new(300.0, 300.0),
            0.5,
            ZoomBounds::default(),
        );
        assert_eq!(insets.left, 0.0);
        assert_eq!(insets.top, 75.0);
        assert_eq!(insets.bottom, 75.0);
    }

    #[test]
    fn zoom_beyond_max_is_clamped_before_centering() {
        let result = layout((100.0, 100.0), (200.0, 200.0));
        let insets = zoomed_insets(&result, Size::new(200.0, 200.0), 10.0, ZoomBounds::default());
        assert_eq!(insets, Insets::default());
    }

    #[test]
    fn zoom_at_min_centers_both_axes() {
        let result = layout((100.0, 100.0), (200.0, 200.0));
        let insets = zoomed_insets(&result, Size::new(200.0, 200.0), 0.0, ZoomBounds::default());
        // 200x200 frame at 0.1 → 20x20 content
        assert!((insets.left - 90.0).abs() < 1e-9);
        assert!((insets.top - 90.0).abs() < 1e-9);
    }
}

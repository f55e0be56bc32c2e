//! Bottom gradient strip drawn over feed thumbnails.
//!
//! The strip fades from fully transparent at its top edge to the opaque
//! overlay colour at the image's bottom edge, so white date text stays
//! legible over bright photos. Its bottom corners are rounded to match the
//! card's corner radius.
//!
//! ```text
//! ┌──────────────────────┐
//! │                      │
//! │        photo         │
//! │                      │  ← alpha 0.0
//! │░░░░░░░░░░░░░░░░░░░░░░│
//! │▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓│
//! ╰██████████████████████╯  ← alpha 1.0
//! ```

use image::{Rgba, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Hex color must have 3, 6 or 8 digits, got {0}")]
    InvalidLength(usize),
    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// Parse a hex colour string into RGBA.
///
/// Leading and trailing non-alphanumeric characters (such as `#`) are
/// ignored. Accepted forms: `RGB` (12-bit), `RRGGBB`, and `AARRGGBB`.
///
/// ```
/// # use image_feed::overlay::parse_hex;
/// assert_eq!(parse_hex("#1A1B22").unwrap().0, [0x1A, 0x1B, 0x22, 0xFF]);
/// assert_eq!(parse_hex("f00").unwrap().0, [0xFF, 0x00, 0x00, 0xFF]);
/// ```
pub fn parse_hex(input: &str) -> Result<Rgba<u8>, ColorError> {
    let hex = input.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    let value = u32::from_str_radix(hex, 16)
        .ok()
        .filter(|_| hex.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| ColorError::InvalidDigit(input.to_string()))?;

    let [a, r, g, b] = match hex.len() {
        3 => {
            let expand = |nibble: u32| ((nibble & 0xF) * 17) as u8;
            [0xFF, expand(value >> 8), expand(value >> 4), expand(value)]
        }
        6 => {
            let [_, r, g, b] = value.to_be_bytes();
            [0xFF, r, g, b]
        }
        8 => value.to_be_bytes(),
        len => return Err(ColorError::InvalidLength(len)),
    };
    Ok(Rgba([r, g, b, a]))
}

/// Gradient strip anchored to the bottom edge of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientOverlay {
    pub color: Rgba<u8>,
    /// Strip height in pixels.
    pub height: u32,
    /// Radius of the rounded bottom-left and bottom-right corners.
    pub corner_radius: u32,
}

impl Default for GradientOverlay {
    fn default() -> Self {
        Self {
            color: Rgba([0x1A, 0x1B, 0x22, 0xFF]),
            height: 30,
            corner_radius: 16,
        }
    }
}

impl GradientOverlay {
    /// Overlay opacity for a row of the strip (0 = top row).
    ///
    /// Linear from 0.0 at the top edge to 1.0 at the bottom edge, scaled by
    /// the colour's own alpha.
    pub fn alpha_at(&self, row: u32) -> f32 {
        let ramp = if self.height <= 1 {
            1.0
        } else {
            row.min(self.height - 1) as f32 / (self.height - 1) as f32
        };
        ramp * (self.color[3] as f32 / 255.0)
    }

    /// Blend the strip onto the bottom of `image` in place.
    ///
    /// A strip taller than the image is clipped; pixels cut away by the
    /// rounded corners are left untouched.
    pub fn apply(&self, image: &mut RgbaImage) {
        let (width, height) = image.dimensions();
        let strip = self.height.min(height);
        let top = height - strip;
        // Rows above the image are clipped, so the ramp offset keeps the
        // bottom row fully opaque.
        let skipped = self.height - strip;

        for y in top..height {
            let alpha = self.alpha_at(y - top + skipped);
            for x in 0..width {
                if !self.inside_corners(x, y, width, height) {
                    continue;
                }
                let pixel = image.get_pixel_mut(x, y);
                *pixel = blend(*pixel, self.color, alpha);
            }
        }
    }

    /// Whether the pixel centre lies inside the rounded bottom corners.
    fn inside_corners(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        let r = self.corner_radius.min(width / 2).min(height) as f32;
        if r == 0.0 {
            return true;
        }
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let (w, h) = (width as f32, height as f32);
        if py < h - r {
            return true;
        }
        let cx = if px < r {
            r
        } else if px > w - r {
            w - r
        } else {
            return true;
        };
        let cy = h - r;
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= r * r
    }
}

/// Source-over blend of an opaque colour at `alpha` onto `dst`.
fn blend(dst: Rgba<u8>, color: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let mix = |d: u8, s: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    let out_alpha = alpha * 255.0 + dst[3] as f32 * (1.0 - alpha);
    Rgba([
        mix(dst[0], color[0]),
        mix(dst[1], color[1]),
        mix(dst[2], color[2]),
        out_alpha.round().min(255.0) as u8,
    ])
}

//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Layout
//!
//! ```text
//! Asset 200x100 in viewport 300x300
//!     Scale: 3
//!     Frame: 600x300
//!     Insets: top 0, left 0, bottom 0, right 0
//! ```
//!
//! ## Share
//!
//! ```text
//! 001-dawn.png → out/001-dawn-share.jpg
//!     Size: 9.6 MiB
//!     Quality: 0.7
//! broken.png
//!     Error: Processing failed: ...
//! ```

use crate::imaging::{Insets, LayoutResult, ShareReport, Size};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a dimension without a trailing `.0` for whole numbers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn format_size(size: Size) -> String {
    format!("{}x{}", format_number(size.width), format_number(size.height))
}

fn format_insets(insets: &Insets) -> String {
    format!(
        "top {}, left {}, bottom {}, right {}",
        format_number(insets.top),
        format_number(insets.left),
        format_number(insets.bottom),
        format_number(insets.right)
    )
}

/// Human-readable byte count (B, KiB, MiB).
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

/// Format a layout pass, plus the zoomed insets when a zoom was requested.
pub fn format_layout(
    asset: Size,
    viewport: Size,
    layout: &LayoutResult,
    zoomed: Option<(f64, Insets)>,
) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Asset {} in viewport {}",
            format_size(asset),
            format_size(viewport)
        ),
        format!("{}Scale: {}", indent(1), format_number(layout.scale)),
        format!("{}Frame: {}", indent(1), format_size(layout.frame.size())),
        format!("{}Insets: {}", indent(1), format_insets(&layout.insets)),
    ];
    if let Some((zoom, insets)) = zoomed {
        lines.push(format!("{}Zoom {}", indent(1), format_number(zoom)));
        lines.push(format!("{}Insets: {}", indent(2), format_insets(&insets)));
    }
    lines
}

pub fn print_layout(
    asset: Size,
    viewport: Size,
    layout: &LayoutResult,
    zoomed: Option<(f64, Insets)>,
) {
    for line in format_layout(asset, viewport, layout, zoomed) {
        println!("{}", line);
    }
}

/// Format share results: one header per source, with size and quality or the error.
pub fn format_share_reports(reports: &[ShareReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for report in reports {
        let name = report
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| report.source.display().to_string());
        match &report.result {
            Ok(exported) => {
                lines.push(format!("{} → {}", name, exported.path.display()));
                lines.push(format!("{}Size: {}", indent(1), format_bytes(exported.bytes)));
                match exported.quality {
                    Some(q) => lines.push(format!("{}Quality: {}", indent(1), q)),
                    None => lines.push(format!("{}Original (not re-encoded)", indent(1))),
                }
            }
            Err(e) => {
                lines.push(name);
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
    }
    let ok = reports.iter().filter(|r| r.result.is_ok()).count();
    lines.push(format!("Shared {} of {} images", ok, reports.len()));
    lines
}

pub fn print_share_reports(reports: &[ShareReport]) {
    for line in format_share_reports(reports) {
        println!("{}", line);
    }
}

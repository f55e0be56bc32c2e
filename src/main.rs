use clap::{Parser, Subcommand};
use image::{DynamicImage, ImageFormat};
use image_feed::imaging::{self, JpegBackend, Size};
use image_feed::{config, logging, output};
use std::path::{Path, PathBuf};

/// Parse a `WIDTHxHEIGHT` pair such as `1920x1080` or `390.5x844`.
fn parse_size(value: &str) -> Result<Size, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid dimension '{s}': {e}"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

#[derive(Parser)]
#[command(name = "image-feed")]
#[command(about = "Layout, share compression and overlays for a photo feed viewer")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Log every encode attempt
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the aspect-fill frame and centering insets for an image
    Layout {
        /// Asset size in pixels, e.g. 4032x3024
        #[arg(
            long,
            value_parser = parse_size,
            required_unless_present = "image",
            conflicts_with = "image"
        )]
        asset: Option<Size>,
        /// Read the asset size from an image file instead
        #[arg(long)]
        image: Option<PathBuf>,
        /// Viewport size, e.g. 390x844
        #[arg(long, value_parser = parse_size)]
        viewport: Size,
        /// Also report insets at this zoom scale (clamped to the configured range)
        #[arg(long)]
        zoom: Option<f64>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Re-encode images as JPEG under the share byte budget
    Share {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Directory for the exported files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Override the configured byte budget
        #[arg(long)]
        max_bytes: Option<u64>,
    },
    /// Draw the feed gradient strip onto an image
    Overlay { input: PathBuf, output: PathBuf },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Layout {
            asset,
            image,
            viewport,
            zoom,
            json,
        } => {
            let asset = match (asset, image) {
                (Some(size), _) => size,
                (None, Some(path)) => imaging::load_asset(&path)?.size(),
                (None, None) => return Err("either --asset or --image is required".into()),
            };
            let layout = match imaging::compute_layout(asset, viewport) {
                Ok(layout) => layout,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping layout");
                    return Ok(());
                }
            };
            let bounds = config::load_config(&cli.config)?.viewer.zoom_bounds();
            let zoomed = zoom.map(|z| {
                let z = bounds.clamp(z);
                (z, imaging::zoomed_insets(&layout, viewport, z, bounds))
            });
            if json {
                let value = serde_json::json!({
                    "layout": layout,
                    "zoom": zoomed.map(|(zoom, insets)| serde_json::json!({
                        "scale": zoom,
                        "insets": insets,
                    })),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                output::print_layout(asset, viewport, &layout, zoomed);
            }
        }
        Command::Share {
            files,
            out_dir,
            max_bytes,
        } => {
            let feed_config = config::load_config(&cli.config)?;
            let max_bytes = max_bytes.unwrap_or(feed_config.share.max_bytes);
            init_thread_pool(&feed_config.processing);
            std::fs::create_dir_all(&out_dir)?;
            let reports =
                imaging::export_for_share(&JpegBackend::new(), &files, &out_dir, max_bytes);
            output::print_share_reports(&reports);
        }
        Command::Overlay { input, output } => {
            let overlay = config::load_config(&cli.config)?.overlay.to_overlay()?;
            let mut canvas = imaging::load_image(&input)?.to_rgba8();
            overlay.apply(&mut canvas);
            save_canvas(DynamicImage::ImageRgba8(canvas), &output)?;
            println!("{} → {}", input.display(), output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Save, dropping alpha for formats that cannot store it.
fn save_canvas(canvas: DynamicImage, path: &Path) -> Result<(), image::ImageError> {
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(canvas.to_rgb8()).save(path),
        _ => canvas.save(path),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

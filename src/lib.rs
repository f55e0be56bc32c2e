//! # Image Feed
//!
//! The non-UI core of a photo feed viewer: the geometry the single-image
//! screen recomputes on every layout and zoom pass, the size-bounded JPEG
//! re-encoding done before an image is handed to the share sheet, and the
//! gradient strip drawn over feed thumbnails.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Aspect-fill layout, zoom re-centering, share compression |
//! | [`overlay`] | Hex colours and the bottom gradient strip for feed cells |
//! | [`config`] | `config.toml` loading, merging over defaults, validation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup for the CLI |
//!
//! # Design Decisions
//!
//! ## Layout Is a Function, Not an Observer
//!
//! A view toolkit re-runs layout from lifecycle callbacks and property
//! observers. Here it is [`imaging::compute_layout`]: asset size and viewport
//! size in, frame and insets out. The host calls it whenever either input
//! changes (new image, rotation) and applies the result; nothing is cached.
//!
//! ## Linear Quality Search
//!
//! [`imaging::compress_to_limit`] steps quality down by exactly 0.1 from 1.0
//! to 0.1 and stops at the first blob within budget. At most ten encodes, a
//! predictable worst case for a blocking share action, and the chosen level
//! is always one of ten known values. Quality is stored as integer tenths so
//! the schedule carries no floating-point drift.
//!
//! ## Never Block the Share
//!
//! The budget is best effort. If the floor is reached the last attempt is
//! shared anyway; if a reduced encode fails or does not decode, the
//! full-quality encode is shared; if nothing encodes at all,
//! [`imaging::prepare_share`] shares the original file bytes.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod overlay;

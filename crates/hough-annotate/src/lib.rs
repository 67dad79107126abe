//! Annotate images with circles found by a two-pass Hough transform.
//!
//! This crate provides:
//! - the fixed two-pass policy ([`NARROW_RADIUS_PASS`], [`WIDE_RADIUS_PASS`]),
//! - the annotation entry points that draw a dot and a ring for every circle,
//! - a polar "unwrap" of a circular region into a rectangular strip,
//! - JSON config / report helpers and (feature `cli`) the `hough-annotate` binary.
//!
//! ## Quickstart
//!
//! ```no_run
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("photo.jpg")?.decode()?.to_rgba8();
//! let annotated = hough_annotate::annotate_circles(img);
//! annotated.save("photo_circles.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Buffer ownership
//!
//! [`annotate_circles`] consumes the caller's buffer, draws onto it and hands
//! the same buffer back. Clone first if the unannotated image is still needed.
//! [`annotate_circles_in_place`] draws through a `&mut` borrow and returns a
//! report of what was found.
//!
//! ## API map
//! - `hough_annotate::core`: image views, smoothing, logger setup.
//! - `hough_annotate::circles`: the gradient Hough detector.

pub use hough_annotate_core as core;
pub use hough_circles as circles;

pub use hough_circles::{Circle, HoughError, HoughParams};

mod annotate;
mod draw;
mod io;
mod passes;
mod unwrap;

pub use annotate::{
    annotate_circles, annotate_circles_in_place, annotate_with_policy, rgba_image_from_raw,
    AnnotationReport, DetectError, PassReport,
};
pub use draw::{draw_circle_marker, MarkerStyle};
pub use io::{AnnotateConfig, AnnotateReport, IoError};
pub use passes::{
    AnnotationPolicy, ConfigError, DetectionPass, NARROW_RADIUS_PASS, WIDE_RADIUS_PASS,
};
pub use unwrap::{unwrap_polar, UnwrapError, UnwrapParams, MAX_OUTPUT_HEIGHT};

//! Core types and utilities shared by the `hough-annotate` crates.
//!
//! Buffers are plain row-major byte slices wrapped in light view types, so
//! the detector and the platform bridge can share them without copying.
//! Filtering is delegated to `imageproc`.

mod image;
mod logger;
mod smooth;

pub use image::{sample_bilinear_rgba, GrayImage, GrayImageView, RgbaImageView};
pub use smooth::{gaussian_blur_3x3, gaussian_kernel_3, gray_from_rgba, preprocess_rgba};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

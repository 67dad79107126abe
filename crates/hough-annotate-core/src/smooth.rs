//! Intensity conversion and small-kernel smoothing.

use image::{ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;
use log::warn;

use crate::{GrayImage, GrayImageView, RgbaImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Standard deviation of the pre-detection smoothing kernel.
const PREPROCESS_SIGMA: f32 = 1.0;

/// Convert RGBA to 8-bit intensity with ITU-R BT.601 weights. Alpha is ignored.
pub fn gray_from_rgba(src: &RgbaImageView<'_>) -> GrayImage {
    let mut out = GrayImage::new(src.width, src.height);
    for (dst, px) in out.data.iter_mut().zip(src.data.chunks_exact(4)) {
        let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        *dst = y.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Normalised 3-tap Gaussian for the given sigma.
pub fn gaussian_kernel_3(sigma: f32) -> [f32; 3] {
    let side = (-0.5 / (sigma * sigma)).exp();
    let norm = 1.0 + 2.0 * side;
    [side / norm, 1.0 / norm, side / norm]
}

/// Separable 3x3 Gaussian blur with replicated borders.
///
/// Filtering runs in `f32` and rounds once at the end.
pub fn gaussian_blur_3x3(src: &GrayImageView<'_>, sigma: f32) -> GrayImage {
    let (w, h) = (src.width, src.height);
    if w == 0 || h == 0 {
        return GrayImage::new(w, h);
    }
    let samples: Vec<f32> = src.data.iter().map(|&v| v as f32).collect();
    let Some(img) = u32::try_from(w)
        .ok()
        .zip(u32::try_from(h).ok())
        .and_then(|(w32, h32)| ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(w32, h32, samples))
    else {
        warn!("cannot blur a {w}x{h} view over {} bytes", src.data.len());
        return GrayImage {
            width: w,
            height: h,
            data: src.data.to_vec(),
        };
    };

    let blurred = separable_filter_equal(&img, &gaussian_kernel_3(sigma));
    GrayImage {
        width: w,
        height: h,
        data: blurred
            .into_raw()
            .into_iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect(),
    }
}

/// Intensity conversion followed by the 3x3, sigma = 1 smoothing that
/// precedes circle detection.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src), fields(width = src.width, height = src.height))
)]
pub fn preprocess_rgba(src: &RgbaImageView<'_>) -> GrayImage {
    let gray = gray_from_rgba(src);
    gaussian_blur_3x3(&gray.view(), PREPROCESS_SIGMA)
}

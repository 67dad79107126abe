//! Edge extraction: Canny edge map plus per-pixel Sobel gradients.

use hough_annotate_core::GrayImageView;
use image::GrayImage;
use imageproc::edges::canny;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::HoughError;

/// An edge pixel with its (unnormalised) intensity gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EdgePoint {
    pub x: f32,
    pub y: f32,
    pub gx: f32,
    pub gy: f32,
}

impl EdgePoint {
    /// Unit gradient direction. `None` for a zero gradient.
    #[inline]
    pub fn direction(&self) -> Option<(f32, f32)> {
        let mag = self.gx.hypot(self.gy);
        if mag <= f32::EPSILON {
            return None;
        }
        Some((self.gx / mag, self.gy / mag))
    }
}

pub(crate) fn to_gray_image(img: &GrayImageView<'_>) -> Result<GrayImage, HoughError> {
    let invalid = || HoughError::InvalidImage {
        width: img.width,
        height: img.height,
        len: img.data.len(),
    };
    let expected = img.width.checked_mul(img.height).ok_or_else(invalid)?;
    if img.data.len() != expected {
        return Err(invalid());
    }
    let w = u32::try_from(img.width).map_err(|_| invalid())?;
    let h = u32::try_from(img.height).map_err(|_| invalid())?;
    GrayImage::from_raw(w, h, img.data.to_vec()).ok_or_else(invalid)
}

/// Canny edge pixels that carry a usable gradient direction.
pub(crate) fn edge_points(img: &GrayImage, low: f32, high: f32) -> Vec<EdgePoint> {
    let edges = canny(img, low, high);
    let gx = horizontal_sobel(img);
    let gy = vertical_sobel(img);

    edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] > 0)
        .filter_map(|(x, y, _)| {
            let dx = gx.get_pixel(x, y)[0] as f32;
            let dy = gy.get_pixel(x, y)[0] as f32;
            if dx == 0.0 && dy == 0.0 {
                return None;
            }
            Some(EdgePoint {
                x: x as f32,
                y: y as f32,
                gx: dx,
                gy: dy,
            })
        })
        .collect()
}

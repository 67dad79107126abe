//! Polar unwrap: map a circular region onto a rectangular strip.
//!
//! Destination column `x` sweeps the angle `theta = pi * (x / h - 1)` over a
//! full turn and destination row `y` the normalised distance `y / h` from the
//! center, so the output is `2h` wide and `h` tall.

use std::f32::consts::PI;

use hough_annotate_core::{sample_bilinear_rgba, RgbaImageView};
use hough_circles::Circle;
use image::{Rgba, RgbaImage};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Tallest strip produced; the RGBA buffer is `2h * h * 4` bytes.
pub const MAX_OUTPUT_HEIGHT: u32 = 16_384;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UnwrapError {
    #[error("unwrap radius must be positive and finite (radius={radius})")]
    InvalidRadius { radius: f32 },
    #[error("unwrap center must be finite")]
    InvalidCenter,
    #[error("invalid unwrap output height {height}")]
    InvalidOutputHeight { height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnwrapParams {
    /// Center of the circular region in source pixels.
    pub center: Point2<f32>,
    /// Radius of the region in source pixels.
    pub radius: f32,
    /// Output height; the output width is twice this.
    pub output_height: u32,
}

impl Default for UnwrapParams {
    fn default() -> Self {
        Self {
            center: Point2::new(150.0, 150.0),
            radius: 150.0,
            output_height: 300,
        }
    }
}

impl UnwrapParams {
    /// Unwrap the disc covered by a detected circle.
    pub fn around(circle: &Circle, output_height: u32) -> Self {
        Self {
            center: circle.center,
            radius: circle.radius,
            output_height,
        }
    }

    pub fn validate(&self) -> Result<(), UnwrapError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(UnwrapError::InvalidRadius {
                radius: self.radius,
            });
        }
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(UnwrapError::InvalidCenter);
        }
        let h = self.output_height as usize;
        let fits = h
            .checked_mul(2)
            .and_then(|n| n.checked_mul(h))
            .and_then(|n| n.checked_mul(4))
            .is_some_and(|n| n <= isize::MAX as usize);
        if self.output_height == 0 || self.output_height > MAX_OUTPUT_HEIGHT || !fits {
            return Err(UnwrapError::InvalidOutputHeight {
                height: self.output_height,
            });
        }
        Ok(())
    }

    /// `(width, height)` of the unwrapped image.
    pub fn output_size(&self) -> (u32, u32) {
        (self.output_height.saturating_mul(2), self.output_height)
    }
}

/// Unwrap the circular region described by `params` out of `src`.
///
/// Sources outside `src` read as transparent black.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(src, params), fields(width = src.width(), height = src.height()))
)]
pub fn unwrap_polar(src: &RgbaImage, params: &UnwrapParams) -> Result<RgbaImage, UnwrapError> {
    params.validate()?;
    let (out_w, out_h) = params.output_size();
    let h = out_h as f32;
    let view = RgbaImageView {
        width: src.width() as usize,
        height: src.height() as usize,
        data: src.as_raw(),
    };

    Ok(RgbaImage::from_fn(out_w, out_h, |x, y| {
        let theta = PI * (x as f32 / h - 1.0);
        let r = params.radius * (y as f32 / h);
        let (sin_t, cos_t) = theta.sin_cos();
        let sx = params.center.x + r * cos_t;
        let sy = params.center.y + r * sin_t;
        Rgba(sample_bilinear_rgba(&view, sx, sy))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadrant_image() -> RgbaImage {
        // left half red, right half green
        RgbaImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            }
        })
    }

    #[test]
    fn output_is_twice_as_wide_as_tall() {
        let params = UnwrapParams {
            center: Point2::new(50.0, 50.0),
            radius: 40.0,
            output_height: 32,
        };
        let out = unwrap_polar(&quadrant_image(), &params).expect("unwrap");
        assert_eq!(out.dimensions(), (64, 32));
    }

    #[test]
    fn first_row_samples_the_center() {
        let src = RgbaImage::from_pixel(20, 20, Rgba([9, 8, 7, 255]));
        let params = UnwrapParams {
            center: Point2::new(10.0, 10.0),
            radius: 8.0,
            output_height: 10,
        };
        let out = unwrap_polar(&src, &params).expect("unwrap");
        assert!((0..out.width()).all(|x| out.get_pixel(x, 0).0 == [9, 8, 7, 255]));
    }

    #[test]
    fn angle_sweep_visits_both_halves() {
        let params = UnwrapParams {
            center: Point2::new(50.0, 50.0),
            radius: 40.0,
            output_height: 40,
        };
        let out = unwrap_polar(&quadrant_image(), &params).expect("unwrap");
        // theta = -pi at x = 0 points left, theta = 0 at x = h points right
        assert_eq!(out.get_pixel(0, 30).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(40, 30).0, [0, 255, 0, 255]);
    }

    #[test]
    fn outside_source_is_transparent() {
        let src = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let params = UnwrapParams {
            center: Point2::new(500.0, 500.0),
            radius: 5.0,
            output_height: 4,
        };
        let out = unwrap_polar(&src, &params).expect("unwrap");
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 0]));

        let empty = RgbaImage::new(0, 0);
        let out = unwrap_polar(&empty, &UnwrapParams::default()).expect("unwrap");
        assert_eq!(out.dimensions(), (600, 300));
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn rejects_invalid_params() {
        let params = UnwrapParams {
            radius: 0.0,
            ..UnwrapParams::default()
        };
        assert!(matches!(
            unwrap_polar(&quadrant_image(), &params),
            Err(UnwrapError::InvalidRadius { .. })
        ));

        let params = UnwrapParams {
            output_height: 0,
            ..UnwrapParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(UnwrapError::InvalidOutputHeight { height: 0 })
        );
    }

    #[test]
    fn oversized_output_is_rejected_without_allocating() {
        for height in [MAX_OUTPUT_HEIGHT + 1, (1 << 31) - 1, u32::MAX] {
            let params = UnwrapParams {
                output_height: height,
                ..UnwrapParams::default()
            };
            assert_eq!(
                unwrap_polar(&quadrant_image(), &params),
                Err(UnwrapError::InvalidOutputHeight { height })
            );
        }
        let params = UnwrapParams {
            output_height: MAX_OUTPUT_HEIGHT,
            ..UnwrapParams::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn around_uses_circle_geometry() {
        let c = Circle {
            center: Point2::new(12.0, 34.0),
            radius: 56.0,
            votes: 1,
        };
        let p = UnwrapParams::around(&c, 64);
        assert_eq!(p.center, c.center);
        assert_eq!(p.radius, 56.0);
        assert_eq!(p.output_size(), (128, 64));
    }
}

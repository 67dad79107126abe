use hough_annotate_core::{preprocess_rgba, RgbaImageView};
use hough_circles::{detect_circles, Circle, HoughParams};
use image::RgbaImage;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::draw::draw_circle_marker;
use crate::passes::{AnnotationPolicy, ConfigError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced when wrapping a raw pixel buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("invalid RGBA image buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid RGBA image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Circles found by one detection pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub name: String,
    pub params: HoughParams,
    pub circles: Vec<Circle>,
}

/// What an annotation call found and drew.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub width: u32,
    pub height: u32,
    pub passes: Vec<PassReport>,
}

impl AnnotationReport {
    pub fn total_circles(&self) -> usize {
        self.passes.iter().map(|p| p.circles.len()).sum()
    }

    /// `(pass index, circle)` for every circle, in drawing order.
    pub fn circles(&self) -> impl Iterator<Item = (usize, &Circle)> + '_ {
        self.passes
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.circles.iter().map(move |c| (i, c)))
    }
}

/// Annotate `image` with the default two-pass policy and return it.
///
/// The buffer passed in is the buffer returned: markers are drawn directly
/// onto it. An image with no pixels is returned untouched.
pub fn annotate_circles(mut image: RgbaImage) -> RgbaImage {
    annotate_circles_in_place(&mut image);
    image
}

/// Annotate `image` in place with the default two-pass policy.
pub fn annotate_circles_in_place(image: &mut RgbaImage) -> AnnotationReport {
    run_passes(image, &AnnotationPolicy::default())
}

/// Annotate `image` in place with a custom policy.
///
/// The policy is validated before anything is drawn.
pub fn annotate_with_policy(
    image: &mut RgbaImage,
    policy: &AnnotationPolicy,
) -> Result<AnnotationReport, ConfigError> {
    policy.validate()?;
    Ok(run_passes(image, policy))
}

#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(image, policy),
        fields(width = image.width(), height = image.height(), passes = policy.passes.len())
    )
)]
fn run_passes(image: &mut RgbaImage, policy: &AnnotationPolicy) -> AnnotationReport {
    let (width, height) = image.dimensions();
    let mut report = AnnotationReport {
        width,
        height,
        passes: Vec::with_capacity(policy.passes.len()),
    };
    if width == 0 || height == 0 {
        debug!("empty image, nothing to annotate");
        return report;
    }

    let gray = {
        let view = RgbaImageView {
            width: width as usize,
            height: height as usize,
            data: image.as_raw(),
        };
        preprocess_rgba(&view)
    };

    for pass in &policy.passes {
        let circles = match detect_circles(&gray.view(), &pass.params) {
            Ok(circles) => circles,
            Err(err) => {
                warn!("pass `{}` skipped: {err}", pass.name);
                Vec::new()
            }
        };
        info!("pass `{}`: {} circles", pass.name, circles.len());
        for c in &circles {
            debug!(
                "  ({:.1}, {:.1}) r={:.1}",
                c.center.x, c.center.y, c.radius
            );
            draw_circle_marker(image, c, &policy.style);
        }
        report.passes.push(PassReport {
            name: pass.name.clone(),
            params: pass.params,
            circles,
        });
    }
    report
}

/// Wrap a tightly packed RGBA8 buffer.
pub fn rgba_image_from_raw(
    width: u32,
    height: u32,
    pixels: Vec<u8>,
) -> Result<RgbaImage, DetectError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(DetectError::InvalidDimensions { width, height })?;
    if pixels.len() != expected {
        return Err(DetectError::InvalidBuffer {
            expected,
            got: pixels.len(),
        });
    }
    RgbaImage::from_raw(width, height, pixels).ok_or(DetectError::InvalidDimensions { width, height })
}

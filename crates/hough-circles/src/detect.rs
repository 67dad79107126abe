use hough_annotate_core::GrayImageView;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::accumulator::Accumulator;
use crate::edges::{edge_points, to_gray_image};
use crate::fit::refine_center;
use crate::radius::estimate_radius;
use crate::{HoughError, HoughParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A detected circle in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
    /// Edge points supporting the chosen radius.
    pub votes: u32,
}

impl Circle {
    /// Center rounded to the nearest pixel.
    pub fn center_px(&self) -> (i32, i32) {
        (self.center.x.round() as i32, self.center.y.round() as i32)
    }

    /// Radius rounded to the nearest pixel.
    pub fn radius_px(&self) -> i32 {
        self.radius.round() as i32
    }
}

/// Detect circles in an 8-bit intensity image.
///
/// Returns circles ordered by accumulator strength. An image with no data or
/// no edges yields an empty list.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, params),
        fields(width = img.width, height = img.height, min_r = params.min_radius, max_r = params.max_radius)
    )
)]
pub fn detect_circles(
    img: &GrayImageView<'_>,
    params: &HoughParams,
) -> Result<Vec<Circle>, HoughError> {
    params.validate()?;
    if img.width == 0 || img.height == 0 {
        return Ok(Vec::new());
    }
    let gray = to_gray_image(img)?;

    let (low, high) = params.canny_thresholds();
    let points = edge_points(&gray, low, high);
    if points.is_empty() {
        debug!("no edge points above threshold {high}");
        return Ok(Vec::new());
    }

    let (min_r, max_r) = params.radius_range(img.width, img.height);
    let mut acc = Accumulator::new(img.width, img.height, params.dp)?;
    for p in &points {
        acc.vote(p, min_r, max_r);
    }

    let peaks = acc.peaks(params.acc_threshold);
    debug!(
        "{} edge points, {} center candidates",
        points.len(),
        peaks.len()
    );

    let min_dist2 = params.min_dist * params.min_dist;
    let mut circles: Vec<Circle> = Vec::new();
    for peak in peaks {
        let center = refine_center(
            peak.center,
            &points,
            min_r as f32,
            max_r as f32,
            params.dp,
        );
        let crowded = circles
            .iter()
            .any(|c| (c.center - center).norm_squared() < min_dist2);
        if crowded {
            continue;
        }
        let Some(est) = estimate_radius(center, &points, min_r as f32, max_r as f32, params.dp)
        else {
            continue;
        };
        if est.support <= params.acc_threshold {
            continue;
        }
        debug!(
            "circle at ({:.1}, {:.1}) r={:.1} votes={:.1} support={}",
            center.x,
            center.y,
            est.radius,
            peak.votes,
            est.support
        );
        circles.push(Circle {
            center,
            radius: est.radius,
            votes: est.support,
        });
    }
    Ok(circles)
}

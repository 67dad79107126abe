use serde::{Deserialize, Serialize};

/// Errors reported for an unusable detector configuration or input buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HoughError {
    #[error("accumulator resolution must be finite and at least 1 (dp={dp})")]
    InvalidResolution { dp: f32 },

    #[error("minimum center distance must be non-negative and finite (min_dist={min_dist})")]
    InvalidMinDist { min_dist: f32 },

    #[error("edge threshold must be positive and finite (edge_threshold={threshold})")]
    InvalidEdgeThreshold { threshold: f32 },

    #[error("invalid radius range [{min}, {max}]")]
    InvalidRadiusRange { min: u32, max: u32 },

    #[error("image buffer does not match its dimensions ({width}x{height}, {len} bytes)")]
    InvalidImage {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("accumulator of {cols}x{rows} cells is too large")]
    AccumulatorTooLarge { cols: usize, rows: usize },
}

/// Gradient Hough transform parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Inverse ratio of accumulator resolution to image resolution.
    /// `1.0` votes at full resolution, `2.0` at half. Must be at least 1.
    pub dp: f32,
    /// Minimum distance in pixels between accepted centers.
    pub min_dist: f32,
    /// Canny high threshold. The low threshold is half of it.
    pub edge_threshold: f32,
    /// Minimum vote count for a center, and minimum edge support for its radius.
    pub acc_threshold: u32,
    /// Smallest radius searched, in pixels.
    pub min_radius: u32,
    /// Largest radius searched, in pixels. `0` means the larger image side.
    pub max_radius: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            dp: 1.0,
            min_dist: 20.0,
            edge_threshold: 100.0,
            acc_threshold: 100,
            min_radius: 0,
            max_radius: 0,
        }
    }
}

impl HoughParams {
    /// Check that the parameters describe a searchable configuration.
    pub fn validate(&self) -> Result<(), HoughError> {
        if !(self.dp.is_finite() && self.dp >= 1.0) {
            return Err(HoughError::InvalidResolution { dp: self.dp });
        }
        if !(self.min_dist.is_finite() && self.min_dist >= 0.0) {
            return Err(HoughError::InvalidMinDist {
                min_dist: self.min_dist,
            });
        }
        if !(self.edge_threshold.is_finite() && self.edge_threshold > 0.0) {
            return Err(HoughError::InvalidEdgeThreshold {
                threshold: self.edge_threshold,
            });
        }
        if self.max_radius != 0 && self.min_radius > self.max_radius {
            return Err(HoughError::InvalidRadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        Ok(())
    }

    /// Radius bounds resolved against the image size.
    pub(crate) fn radius_range(&self, width: usize, height: usize) -> (u32, u32) {
        let max = if self.max_radius == 0 {
            width.max(height) as u32
        } else {
            self.max_radius
        };
        (self.min_radius.min(max), max)
    }

    /// Canny `(low, high)` thresholds.
    pub(crate) fn canny_thresholds(&self) -> (f32, f32) {
        let high = self.edge_threshold;
        let low = (0.5 * high).max(1.0).min(high);
        (low, high)
    }
}

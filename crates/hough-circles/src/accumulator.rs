//! Center accumulator: gradient-direction voting, smoothing and peak extraction.

use image::{ImageBuffer, Luma};
use imageproc::filter::gaussian_blur_f32;
use nalgebra::Point2;

use crate::edges::EdgePoint;
use crate::HoughError;

/// Gaussian sigma, in cells, applied to the vote map before peak picking.
const ACC_SIGMA: f32 = 1.0;
/// A peak must dominate every cell within this radius, in cells.
const NMS_RADIUS: i32 = 2;

pub(crate) struct Accumulator {
    cols: usize,
    rows: usize,
    dp: f32,
    votes: Vec<f32>,
}

/// A local maximum of the smoothed vote map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Peak {
    /// Sub-cell position in image pixels.
    pub center: Point2<f32>,
    /// Raw votes in the 3x3 cell window around the maximum.
    pub votes: f32,
    score: f32,
}

impl Accumulator {
    pub fn new(width: usize, height: usize, dp: f32) -> Result<Self, HoughError> {
        let cols = ((width as f32 / dp).ceil() as usize).max(1);
        let rows = ((height as f32 / dp).ceil() as usize).max(1);
        let too_large = || HoughError::AccumulatorTooLarge { cols, rows };
        // cell grid is wrapped in an `ImageBuffer`, so both sides must fit u32
        if u32::try_from(cols).is_err() || u32::try_from(rows).is_err() {
            return Err(too_large());
        }
        let len = cols.checked_mul(rows).ok_or_else(too_large)?;
        Ok(Self {
            cols,
            rows,
            dp,
            votes: vec![0.0; len],
        })
    }

    #[cfg(test)]
    pub fn at(&self, col: usize, row: usize) -> f32 {
        self.votes[row * self.cols + col]
    }

    /// Cast one vote per radius on both sides of the edge, along its gradient.
    ///
    /// Each vote is split bilinearly over the four nearest cells.
    pub fn vote(&mut self, p: &EdgePoint, min_r: u32, max_r: u32) {
        let Some((ux, uy)) = p.direction() else {
            return;
        };
        let inv = 1.0 / self.dp;
        let (x0, y0) = (p.x * inv, p.y * inv);
        let (x_max, y_max) = ((self.cols - 1) as f32, (self.rows - 1) as f32);

        for sign in [1.0f32, -1.0] {
            for r in min_r..=max_r {
                let step = sign * r as f32 * inv;
                let cx = x0 + ux * step;
                let cy = y0 + uy * step;
                // moving outward along the ray never re-enters the grid
                if cx < 0.0 || cy < 0.0 || cx > x_max || cy > y_max {
                    break;
                }
                self.deposit(cx, cy);
            }
        }
    }

    fn deposit(&mut self, x: f32, y: f32) {
        let (x0, y0) = (x.floor() as usize, y.floor() as usize);
        let (fx, fy) = (x - x0 as f32, y - y0 as f32);
        let x1 = (x0 + 1).min(self.cols - 1);
        let y1 = (y0 + 1).min(self.rows - 1);
        let c = self.cols;
        self.votes[y0 * c + x0] += (1.0 - fx) * (1.0 - fy);
        self.votes[y0 * c + x1] += fx * (1.0 - fy);
        self.votes[y1 * c + x0] += (1.0 - fx) * fy;
        self.votes[y1 * c + x1] += fx * fy;
    }

    /// Maxima of the smoothed vote map whose raw 3x3 vote mass exceeds
    /// `threshold`, strongest first.
    ///
    /// Smoothing turns the flat top left by a wide radius band into a single
    /// hump; equal neighbours resolve to the earlier cell.
    pub fn peaks(&self, threshold: u32) -> Vec<Peak> {
        let (cols, rows) = (self.cols, self.rows);
        let Some(raw) =
            ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(cols as u32, rows as u32, self.votes.clone())
        else {
            return Vec::new();
        };
        let smoothed = gaussian_blur_f32(&raw, ACC_SIGMA);
        let s = smoothed.as_raw();
        let nms_r2 = NMS_RADIUS * NMS_RADIUS;

        let mut out = Vec::new();
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                let idx = y as usize * cols + x as usize;
                let val = s[idx];
                if val <= 0.0 {
                    continue;
                }
                let mut is_max = true;
                'nms: for dy in -NMS_RADIUS..=NMS_RADIUS {
                    for dx in -NMS_RADIUS..=NMS_RADIUS {
                        if (dx == 0 && dy == 0) || dx * dx + dy * dy > nms_r2 {
                            continue;
                        }
                        let (nx, ny) = (x + dx, y + dy);
                        if nx < 0 || ny < 0 || nx >= cols as i32 || ny >= rows as i32 {
                            continue;
                        }
                        let nidx = ny as usize * cols + nx as usize;
                        if s[nidx] > val || (s[nidx] == val && nidx < idx) {
                            is_max = false;
                            break 'nms;
                        }
                    }
                }
                if !is_max {
                    continue;
                }
                let votes = self.window_sum(x, y);
                if votes <= threshold as f32 {
                    continue;
                }
                out.push(Peak {
                    center: self.refine(s, x, y),
                    votes,
                    score: val,
                });
            }
        }
        out.sort_by(|a, b| b.score.total_cmp(&a.score));
        out
    }

    fn window_sum(&self, x: i32, y: i32) -> f32 {
        let mut sum = 0.0;
        for ny in (y - 1).max(0)..=(y + 1).min(self.rows as i32 - 1) {
            for nx in (x - 1).max(0)..=(x + 1).min(self.cols as i32 - 1) {
                sum += self.votes[ny as usize * self.cols + nx as usize];
            }
        }
        sum
    }

    /// Weighted centroid of the smoothed map over the 3x3 window, in pixels.
    fn refine(&self, s: &[f32], x: i32, y: i32) -> Point2<f32> {
        let (mut sw, mut sx, mut sy) = (0.0f32, 0.0f32, 0.0f32);
        for ny in (y - 1).max(0)..=(y + 1).min(self.rows as i32 - 1) {
            for nx in (x - 1).max(0)..=(x + 1).min(self.cols as i32 - 1) {
                let w = s[ny as usize * self.cols + nx as usize];
                sw += w;
                sx += w * nx as f32;
                sy += w * ny as f32;
            }
        }
        let (cx, cy) = if sw > 0.0 {
            (sx / sw, sy / sw)
        } else {
            (x as f32, y as f32)
        };
        Point2::new(cx * self.dp, cy * self.dp)
    }
}

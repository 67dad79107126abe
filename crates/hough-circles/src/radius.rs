//! Radius selection for a fixed center.

use nalgebra::Point2;

use crate::edges::EdgePoint;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RadiusEstimate {
    pub radius: f32,
    /// Edge points in the winning distance bin.
    pub support: u32,
}

/// Pick the radius with the best edge support around `center`.
///
/// Distances to all edge points inside `[min_r, max_r]` are sorted and cut
/// into runs no wider than `bin`. A run's radius is its median distance; the
/// winner maximises `count / radius`, so a small tight circle is not beaten by
/// a large one simply because its perimeter holds more pixels.
pub(crate) fn estimate_radius(
    center: Point2<f32>,
    points: &[EdgePoint],
    min_r: f32,
    max_r: f32,
    bin: f32,
) -> Option<RadiusEstimate> {
    let lo = min_r.max(1.0);
    let mut dists: Vec<f32> = points
        .iter()
        .map(|p| (p.x - center.x).hypot(p.y - center.y))
        .filter(|&d| d >= lo && d <= max_r)
        .collect();
    if dists.is_empty() {
        return None;
    }
    dists.sort_by(f32::total_cmp);

    let mut best: Option<RadiusEstimate> = None;
    let mut start = 0usize;
    for j in 1..=dists.len() {
        if j < dists.len() && dists[j] - dists[start] <= bin {
            continue;
        }
        let count = (j - start) as u32;
        let r_cur = dists[(start + j - 1) / 2];
        let better = match best {
            None => true,
            Some(b) => count as f32 * b.radius > b.support as f32 * r_cur,
        };
        if better {
            best = Some(RadiusEstimate {
                radius: r_cur,
                support: count,
            });
        }
        start = j;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ring(cx: f32, cy: f32, r: f32, n: usize) -> Vec<EdgePoint> {
        (0..n)
            .map(|k| {
                let t = std::f32::consts::TAU * k as f32 / n as f32;
                EdgePoint {
                    x: cx + r * t.cos(),
                    y: cy + r * t.sin(),
                    gx: t.cos(),
                    gy: t.sin(),
                }
            })
            .collect()
    }

    #[test]
    fn recovers_ring_radius() {
        let pts = ring(50.0, 40.0, 20.0, 120);
        let est = estimate_radius(Point2::new(50.0, 40.0), &pts, 10.0, 30.0, 1.0)
            .expect("radius found");
        assert_abs_diff_eq!(est.radius, 20.0, epsilon = 0.01);
        assert_eq!(est.support, 120);
    }

    #[test]
    fn prefers_denser_ring_per_unit_radius() {
        let mut pts = ring(0.0, 0.0, 10.0, 60);
        pts.extend(ring(0.0, 0.0, 25.0, 100));
        let est = estimate_radius(Point2::new(0.0, 0.0), &pts, 5.0, 30.0, 1.0)
            .expect("radius found");
        assert_abs_diff_eq!(est.radius, 10.0, epsilon = 0.01);
    }

    #[test]
    fn points_outside_bounds_are_ignored() {
        let pts = ring(0.0, 0.0, 40.0, 50);
        assert!(estimate_radius(Point2::new(0.0, 0.0), &pts, 5.0, 30.0, 1.0).is_none());
    }
}

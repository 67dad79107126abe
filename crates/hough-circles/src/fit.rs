//! Algebraic least-squares circle fit and center refinement.

use nalgebra::{Matrix3, Point2, Vector3};

use crate::edges::EdgePoint;

/// Minimum |cos| between an edge gradient and the ray from the center.
const RADIAL_COS: f32 = 0.9;
/// Fewest edge points a refit is attempted on.
const MIN_FIT_POINTS: usize = 8;

/// Fit `x² + y² + D x + E y + F = 0` to `points` in the least-squares sense.
///
/// Points are shifted to their centroid before building the normal
/// equations. Returns `(center, radius)`, or `None` for fewer than three
/// points or a degenerate (collinear) set.
pub(crate) fn fit_circle(points: &[Point2<f32>]) -> Option<(Point2<f32>, f32)> {
    if points.len() < 3 {
        return None;
    }
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let my = points.iter().map(|p| p.y as f64).sum::<f64>() / n;

    let mut a = Matrix3::<f64>::zeros();
    let mut b = Vector3::<f64>::zeros();
    for p in points {
        let (u, v) = (p.x as f64 - mx, p.y as f64 - my);
        let row = Vector3::new(u, v, 1.0);
        a += row * row.transpose();
        b -= row * (u * u + v * v);
    }
    let sol = a.lu().solve(&b)?;
    let (cu, cv) = (-0.5 * sol[0], -0.5 * sol[1]);
    let r2 = cu * cu + cv * cv - sol[2];
    if !(r2.is_finite() && r2 > 0.0) {
        return None;
    }
    Some((
        Point2::new((mx + cu) as f32, (my + cv) as f32),
        r2.sqrt() as f32,
    ))
}

/// Move an accumulator center onto the circle its edges describe.
///
/// Edges within the radius band (widened by two cells) whose gradient points
/// along the ray from `center` are refit. The refit is kept only when its
/// radius stays in the band and the center moves by less than half the band
/// plus three cells; otherwise `center` is returned unchanged.
pub(crate) fn refine_center(
    center: Point2<f32>,
    points: &[EdgePoint],
    min_r: f32,
    max_r: f32,
    dp: f32,
) -> Point2<f32> {
    let (lo, hi) = (min_r - 2.0 * dp, max_r + 2.0 * dp);
    let support: Vec<Point2<f32>> = points
        .iter()
        .filter(|p| {
            let (dx, dy) = (p.x - center.x, p.y - center.y);
            let d = dx.hypot(dy);
            if d < lo.max(1.0) || d > hi {
                return false;
            }
            p.direction()
                .is_some_and(|(ux, uy)| ((ux * dx + uy * dy) / d).abs() >= RADIAL_COS)
        })
        .map(|p| Point2::new(p.x, p.y))
        .collect();
    if support.len() < MIN_FIT_POINTS {
        return center;
    }

    let Some((fitted, radius)) = fit_circle(&support) else {
        return center;
    };
    let max_shift = 0.5 * (max_r - min_r) + 3.0 * dp;
    let in_band = radius >= min_r - dp && radius <= max_r + dp;
    if in_band && (fitted - center).norm() <= max_shift {
        fitted
    } else {
        center
    }
}

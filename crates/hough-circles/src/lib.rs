//! Gradient Hough circle detector.
//!
//! Given a single-channel intensity image, returns `(center, radius)`
//! candidates matching a circular edge pattern. The detector follows the
//! usual gradient-voting scheme:
//!
//! 1. Canny edges (high threshold = `edge_threshold`, low = half of it).
//! 2. Every edge pixel votes along its Sobel gradient direction, both ways,
//!    for every radius in `[min_radius, max_radius]`.
//! 3. The accumulator is Gaussian-smoothed; local maxima whose vote mass
//!    exceeds `acc_threshold` become center candidates, strongest first.
//! 4. Each candidate is refit to the edges around it by least squares.
//! 5. Each center keeps the radius with the best edge support (per unit
//!    radius) and is accepted if that support exceeds `acc_threshold` and it
//!    lies at least `min_dist` from every center accepted before it.
//!
//! ```no_run
//! use hough_annotate_core::GrayImageView;
//! use hough_circles::{detect_circles, HoughParams};
//!
//! # fn main() -> Result<(), hough_circles::HoughError> {
//! let pixels = vec![0u8; 320 * 240];
//! let view = GrayImageView { width: 320, height: 240, data: &pixels };
//! let params = HoughParams { min_radius: 10, max_radius: 40, ..HoughParams::default() };
//! for c in detect_circles(&view, &params)? {
//!     println!("({:.1}, {:.1}) r={:.1}", c.center.x, c.center.y, c.radius);
//! }
//! # Ok(())
//! # }
//! ```

mod accumulator;
mod detect;
mod edges;
mod fit;
mod params;
mod radius;

pub use detect::{detect_circles, Circle};
pub use params::{HoughError, HoughParams};

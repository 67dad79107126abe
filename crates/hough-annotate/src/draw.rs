use hough_circles::Circle;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use serde::{Deserialize, Serialize};

/// How a detected circle is marked on the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Radius of the filled dot at the center.
    pub dot_radius: i32,
    pub dot_color: [u8; 4],
    /// Ring width in pixels, centred on the circle radius.
    pub ring_thickness: u32,
    pub ring_color: [u8; 4],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            dot_radius: 3,
            dot_color: [255, 0, 0, 255],
            ring_thickness: 2,
            ring_color: [0, 0, 255, 255],
        }
    }
}

/// Draw a filled dot at the circle center and a ring at its radius.
///
/// Both are clipped to the image.
pub fn draw_circle_marker(image: &mut RgbaImage, circle: &Circle, style: &MarkerStyle) {
    let center = circle.center_px();
    draw_filled_circle_mut(image, center, style.dot_radius, Rgba(style.dot_color));
    draw_ring_band(
        image,
        center,
        circle.radius_px(),
        style.ring_thickness,
        Rgba(style.ring_color),
    );
}

/// Fill every pixel whose distance `d` from `center` satisfies
/// `r - t/2 <= d < r + t - t/2`.
fn draw_ring_band(
    image: &mut RgbaImage,
    center: (i32, i32),
    radius: i32,
    thickness: u32,
    color: Rgba<u8>,
) {
    if thickness == 0 || radius < 0 {
        return;
    }
    let (w, h) = (image.width() as i64, image.height() as i64);
    let (cx, cy) = (center.0 as i64, center.1 as i64);
    let half = thickness as i64 / 2;
    let inner = (radius as i64 - half).max(0);
    let outer = radius as i64 + thickness as i64 - half;
    let (inner2, outer2) = (inner * inner, outer * outer);

    let x_range = (cx - outer).max(0)..=(cx + outer).min(w - 1);
    for y in (cy - outer).max(0)..=(cy + outer).min(h - 1) {
        let dy = y - cy;
        for x in x_range.clone() {
            let dx = x - cx;
            let d2 = dx * dx + dy * dy;
            if d2 >= inner2 && d2 < outer2 {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

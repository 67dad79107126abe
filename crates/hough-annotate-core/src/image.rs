/// Borrowed single-channel 8-bit image.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned single-channel 8-bit image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Borrowed RGBA 8-bit image, 4 bytes per pixel, tightly packed rows.
#[derive(Clone, Copy, Debug)]
pub struct RgbaImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h*4
}

#[inline]
fn get_rgba(src: &RgbaImageView<'_>, x: i32, y: i32) -> [f32; 4] {
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return [0.0; 4];
    }
    let idx = (y as usize * src.width + x as usize) * 4;
    let px = &src.data[idx..idx + 4];
    [px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32]
}

/// Per-channel bilinear sample. Pixels outside the image read as transparent
/// black, so samples straddling the border fade out instead of smearing.
#[inline]
pub fn sample_bilinear_rgba(src: &RgbaImageView<'_>, x: f32, y: f32) -> [u8; 4] {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = get_rgba(src, x0, y0);
    let p10 = get_rgba(src, x0 + 1, y0);
    let p01 = get_rgba(src, x0, y0 + 1);
    let p11 = get_rgba(src, x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_sample_interpolates_each_channel() {
        let data = [0u8, 0, 0, 255, 100, 200, 50, 255];
        let view = RgbaImageView {
            width: 2,
            height: 1,
            data: &data,
        };
        assert_eq!(sample_bilinear_rgba(&view, 0.5, 0.0), [50, 100, 25, 255]);
    }

    #[test]
    fn rgba_sample_outside_is_transparent() {
        let data = [10u8, 20, 30, 255];
        let view = RgbaImageView {
            width: 1,
            height: 1,
            data: &data,
        };
        assert_eq!(sample_bilinear_rgba(&view, 0.0, 0.0), [10, 20, 30, 255]);
        assert_eq!(sample_bilinear_rgba(&view, -5.0, 3.0), [0, 0, 0, 0]);
    }
}

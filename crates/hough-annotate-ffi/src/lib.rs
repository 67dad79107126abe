//! C ABI over `hough-annotate`.
//!
//! The host converts its native image (for example a `UIImage` drawn into a
//! `CGBitmapContext`) into an RGBA8 bitmap, calls [`ha_annotate_rgba8`] on it
//! and wraps the same memory back into a native image. Rows may be padded:
//! `stride_bytes` is the distance between row starts.
//!
//! Every function returns one of the `HA_STATUS_*` codes. Panics never cross
//! the boundary; they are reported as [`HA_STATUS_INTERNAL`].

use std::ffi::{c_char, c_int, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use hough_annotate::{annotate_circles_in_place, rgba_image_from_raw, AnnotationReport};
use log::warn;

pub const HA_STATUS_OK: c_int = 0;
pub const HA_STATUS_NULL_POINTER: c_int = -1;
pub const HA_STATUS_INVALID_ARGUMENT: c_int = -2;
pub const HA_STATUS_INTERNAL: c_int = -3;

/// One detected circle, in pixel coordinates of the annotated bitmap.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HaCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// 0 for the narrow radius pass, 1 for the wide radius pass.
    pub pass_index: u32,
}

/// Annotate an RGBA8 bitmap in place with the default two-pass policy.
///
/// A zero `width` or `height` is accepted and leaves the buffer untouched.
///
/// # Safety
///
/// `pixels` must point to at least `stride_bytes * (height - 1) + width * 4`
/// writable bytes that stay valid and unaliased for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn ha_annotate_rgba8(
    pixels: *mut u8,
    width: u32,
    height: u32,
    stride_bytes: usize,
) -> c_int {
    match guarded(|| annotate_strided(pixels, width, height, stride_bytes)) {
        Ok(_) => HA_STATUS_OK,
        Err(status) => status,
    }
}

/// Like [`ha_annotate_rgba8`], and also report the detected circles.
///
/// Up to `capacity` circles are copied to `out_circles` in drawing order;
/// `out_count` receives the total number found, which may exceed `capacity`.
/// `out_circles` may be null when `capacity` is zero.
///
/// # Safety
///
/// Same requirements on `pixels` as [`ha_annotate_rgba8`]. `out_circles`
/// must be valid for `capacity` writes and `out_count` for one write.
#[no_mangle]
pub unsafe extern "C" fn ha_annotate_rgba8_report(
    pixels: *mut u8,
    width: u32,
    height: u32,
    stride_bytes: usize,
    out_circles: *mut HaCircle,
    capacity: usize,
    out_count: *mut usize,
) -> c_int {
    if out_count.is_null() || (out_circles.is_null() && capacity > 0) {
        return HA_STATUS_NULL_POINTER;
    }
    let report = match guarded(|| annotate_strided(pixels, width, height, stride_bytes)) {
        Ok(report) => report,
        Err(status) => return status,
    };

    let circles: Vec<HaCircle> = report
        .circles()
        .map(|(pass, c)| HaCircle {
            x: c.center.x,
            y: c.center.y,
            radius: c.radius,
            pass_index: pass as u32,
        })
        .collect();
    let copied = circles.len().min(capacity);
    if copied > 0 {
        // SAFETY: caller guarantees `out_circles` holds `capacity` slots.
        slice::from_raw_parts_mut(out_circles, copied).copy_from_slice(&circles[..copied]);
    }
    *out_count = circles.len();
    HA_STATUS_OK
}

/// Static, NUL-terminated description of a status code.
#[no_mangle]
pub extern "C" fn ha_status_str(status: c_int) -> *const c_char {
    let msg: &'static CStr = match status {
        HA_STATUS_OK => c"ok",
        HA_STATUS_NULL_POINTER => c"null pointer argument",
        HA_STATUS_INVALID_ARGUMENT => c"invalid image dimensions or stride",
        HA_STATUS_INTERNAL => c"internal error",
        _ => c"unknown status",
    };
    msg.as_ptr()
}

/// Crate version as a static, NUL-terminated string.
#[no_mangle]
pub extern "C" fn ha_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr().cast()
}

fn guarded<T>(f: impl FnOnce() -> Result<T, c_int>) -> Result<T, c_int> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        warn!("panic caught at the C boundary");
        Err(HA_STATUS_INTERNAL)
    })
}

/// Gather the strided rows into a packed image, annotate it and scatter the
/// rows back. Row padding is never touched.
fn annotate_strided(
    pixels: *mut u8,
    width: u32,
    height: u32,
    stride_bytes: usize,
) -> Result<AnnotationReport, c_int> {
    if pixels.is_null() {
        return Err(HA_STATUS_NULL_POINTER);
    }
    if width == 0 || height == 0 {
        return Ok(AnnotationReport::default());
    }

    let row_bytes = (width as usize)
        .checked_mul(4)
        .ok_or(HA_STATUS_INVALID_ARGUMENT)?;
    if stride_bytes < row_bytes {
        return Err(HA_STATUS_INVALID_ARGUMENT);
    }
    let span = stride_bytes
        .checked_mul(height as usize - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or(HA_STATUS_INVALID_ARGUMENT)?;

    // SAFETY: caller guarantees `span` valid, unaliased bytes at `pixels`.
    let buf = unsafe { slice::from_raw_parts_mut(pixels, span) };

    let mut packed = Vec::with_capacity(row_bytes * height as usize);
    for row in buf.chunks(stride_bytes) {
        packed.extend_from_slice(&row[..row_bytes]);
    }
    let mut img =
        rgba_image_from_raw(width, height, packed).map_err(|_| HA_STATUS_INVALID_ARGUMENT)?;

    let report = annotate_circles_in_place(&mut img);

    for (dst, src) in buf
        .chunks_mut(stride_bytes)
        .zip(img.as_raw().chunks_exact(row_bytes))
    {
        dst[..row_bytes].copy_from_slice(src);
    }
    Ok(report)
}

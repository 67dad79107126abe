use hough_annotate::circles::detect_circles;
use hough_annotate::core::{preprocess_rgba, RgbaImageView};
use hough_annotate::{
    annotate_circles, annotate_circles_in_place, draw_circle_marker, AnnotationReport, Circle,
    MarkerStyle, NARROW_RADIUS_PASS, WIDE_RADIUS_PASS,
};
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn disc_image(size: u32, cx: f32, cy: f32, r: f32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        if dx * dx + dy * dy <= r * r {
            WHITE
        } else {
            BLACK
        }
    })
}

fn near(report: &AnnotationReport, pass: usize, cx: f32, cy: f32, r: f32) -> Option<Circle> {
    report.passes[pass].circles.iter().copied().find(|c| {
        (c.center.x - cx).abs() <= 2.0 && (c.center.y - cy).abs() <= 2.0 && (c.radius - r).abs() <= 2.0
    })
}

#[test]
fn empty_image_is_identity() {
    let img = RgbaImage::new(0, 0);
    assert_eq!(annotate_circles(img.clone()), img);
}

#[test]
fn blank_200x200_image_is_unchanged() {
    let img = RgbaImage::from_pixel(200, 200, Rgba([128, 128, 128, 255]));
    let mut out = img.clone();
    let report = annotate_circles_in_place(&mut out);
    assert_eq!(report.total_circles(), 0);
    assert_eq!(out, img);
}

#[test]
fn image_without_circles_is_unchanged() {
    let img = RgbaImage::from_fn(200, 200, |x, _| if x < 100 { BLACK } else { WHITE });
    let out = annotate_circles(img.clone());
    assert_eq!(out, img);
}

#[test]
fn narrow_pass_finds_and_marks_a_radius_76_disc() {
    init_logs();
    let img = disc_image(220, 110.0, 110.0, 76.0);
    let mut out = img.clone();
    let report = annotate_circles_in_place(&mut out);

    let c = near(&report, 0, 110.0, 110.0, 76.0)
        .unwrap_or_else(|| panic!("narrow pass missed the disc: {report:?}"));

    let style = MarkerStyle::default();
    assert_eq!(out.get_pixel(110, 110).0, style.dot_color);

    let (cx, cy) = c.center_px();
    let ring_hit = (cx + c.radius_px() - 3..=cx + c.radius_px() + 1)
        .any(|x| out.get_pixel(x as u32, cy as u32).0 == style.ring_color);
    assert!(ring_hit, "no ring pixel on row {cy} near x={}", cx + c.radius_px());
}

#[test]
fn wide_pass_finds_a_radius_66_disc() {
    init_logs();
    let img = disc_image(220, 110.0, 110.0, 66.0);
    let mut out = img.clone();
    let report = annotate_circles_in_place(&mut out);
    assert!(
        near(&report, 1, 110.0, 110.0, 66.0).is_some(),
        "wide pass missed the disc: {report:?}"
    );
    assert_eq!(out.get_pixel(110, 110).0, MarkerStyle::default().dot_color);
}

#[test]
fn output_keeps_dimensions_and_layout() {
    let img = disc_image(220, 110.0, 110.0, 66.0);
    let out = annotate_circles(img.clone());
    assert_eq!(out.dimensions(), img.dimensions());
    assert_eq!(out.as_raw().len(), img.as_raw().len());
}

#[test]
fn by_value_call_returns_the_callers_buffer() {
    let img = disc_image(220, 110.0, 110.0, 76.0);
    let ptr = img.as_raw().as_ptr();
    let out = annotate_circles(img);
    assert_eq!(out.as_raw().as_ptr(), ptr);
}

#[test]
fn in_place_and_by_value_agree() {
    let img = disc_image(220, 110.0, 110.0, 76.0);
    let mut in_place = img.clone();
    annotate_circles_in_place(&mut in_place);
    assert_eq!(annotate_circles(img), in_place);
}

#[test]
fn reannotating_keeps_earlier_markers() {
    let original = disc_image(220, 110.0, 110.0, 76.0);
    let first = annotate_circles(original.clone());
    let second = annotate_circles(first.clone());

    let mut marked = 0;
    for (x, y, px) in first.enumerate_pixels() {
        if px != original.get_pixel(x, y) {
            marked += 1;
            assert_ne!(
                second.get_pixel(x, y),
                original.get_pixel(x, y),
                "marker at ({x}, {y}) was erased"
            );
        }
    }
    assert!(marked > 0);
    assert_eq!(second.dimensions(), original.dimensions());
}

#[test]
fn both_bands_in_one_image() {
    init_logs();
    let original = RgbaImage::from_fn(420, 220, |x, y| {
        let d2 = |cx: f32, cy: f32| {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            dx * dx + dy * dy
        };
        if d2(110.0, 110.0) <= 76.0 * 76.0 || d2(310.0, 110.0) <= 66.0 * 66.0 {
            WHITE
        } else {
            BLACK
        }
    });
    let mut annotated = original.clone();
    let report = annotate_circles_in_place(&mut annotated);

    assert!(near(&report, 0, 110.0, 110.0, 76.0).is_some(), "{report:?}");
    assert!(near(&report, 1, 310.0, 110.0, 66.0).is_some(), "{report:?}");

    // both passes see the unannotated smoothed image
    let gray = preprocess_rgba(&RgbaImageView {
        width: 420,
        height: 220,
        data: original.as_raw(),
    });
    let narrow = detect_circles(&gray.view(), &NARROW_RADIUS_PASS).expect("narrow pass");
    let wide = detect_circles(&gray.view(), &WIDE_RADIUS_PASS).expect("wide pass");
    assert_eq!(report.passes[0].circles, narrow);
    assert_eq!(report.passes[1].circles, wide);

    // wide-pass markers are drawn over narrow-pass markers
    let style = MarkerStyle::default();
    let mut expected = original.clone();
    for c in narrow.iter().chain(&wide) {
        draw_circle_marker(&mut expected, c, &style);
    }
    assert_eq!(annotated, expected);
}

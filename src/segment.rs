use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use palette::{Hsv, IntoColor, Srgb};

/// HSV bounds of one named color, in the 8-bit convention of the upstream
/// pipeline: hue in `0..=180`, saturation and value in `0..=255`, bounds
/// inclusive on both ends.
///
/// A color whose hue straddles the 0/180 wrap point carries a second
/// disjoint range in `wraparound`; a pixel matches if it falls in either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
    pub wraparound: Option<([u8; 3], [u8; 3])>,
}

impl ColorRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self {
            lower,
            upper,
            wraparound: None,
        }
    }

    pub const fn with_wraparound(
        lower: [u8; 3],
        upper: [u8; 3],
        wrap_lower: [u8; 3],
        wrap_upper: [u8; 3],
    ) -> Self {
        Self {
            lower,
            upper,
            wraparound: Some((wrap_lower, wrap_upper)),
        }
    }

    fn contains(&self, hsv: [u8; 3]) -> bool {
        in_range(hsv, &self.lower, &self.upper)
            || match &self.wraparound {
                Some((lower, upper)) => in_range(hsv, lower, upper),
                None => false,
            }
    }
}

/// The hold colors of the upstream wall setup. Red is the one color whose
/// hue wraps around the 0/180 boundary and therefore needs two ranges.
pub const DEFAULT_COLOR_RANGES: &[(&str, ColorRange)] = &[
    ("gelb", ColorRange::new([20, 100, 100], [30, 255, 255])),
    ("tuerkis", ColorRange::new([80, 100, 100], [95, 255, 255])),
    ("lila", ColorRange::new([140, 100, 100], [160, 255, 255])),
    (
        "rot",
        ColorRange::with_wraparound([0, 120, 70], [10, 255, 255], [170, 120, 70], [180, 255, 255]),
    ),
    ("blau", ColorRange::new([100, 100, 70], [130, 255, 255])),
    ("orange", ColorRange::new([10, 100, 100], [20, 255, 255])),
    ("weiss", ColorRange::new([0, 0, 220], [180, 40, 255])),
];

#[inline]
fn in_range(value: [u8; 3], lower: &[u8; 3], upper: &[u8; 3]) -> bool {
    value
        .iter()
        .zip(lower.iter().zip(upper.iter()))
        .all(|(v, (lo, hi))| lo <= v && v <= hi)
}

/// RGB pixel to 8-bit HSV (hue halved into `0..=180`, saturation and value
/// scaled into `0..=255`).
fn rgb_to_hsv_8bit(r: u8, g: u8, b: u8) -> [u8; 3] {
    let rgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let hsv: Hsv = rgb.into_color();

    [
        (hsv.hue.into_positive_degrees() * 0.5).round() as u8,
        (hsv.saturation * 255.0).round() as u8,
        (hsv.value * 255.0).round() as u8,
    ]
}

/// Boolean mask (0 or 255) of the pixels whose HSV value falls in `range`.
pub fn color_mask(image: &RgbImage, range: &ColorRange) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let hsv = rgb_to_hsv_8bit(pixel[0], pixel[1], pixel[2]);

        if range.contains(hsv) {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }

    mask
}

/// Speckle cleanup applied to every color mask: one erosion pass followed by
/// two dilation passes with a fixed 5x5 structuring element.
pub fn cleanup_mask(mask: &GrayImage) -> GrayImage {
    let eroded = erode(mask, Norm::LInf, 2);
    let dilated = dilate(&eroded, Norm::LInf, 2);
    dilate(&dilated, Norm::LInf, 2)
}

/// Build the color-filtered image: every pixel covered by at least one
/// cleaned per-color mask keeps its original value, everything else is
/// black.
///
/// ```text
/// Parameters
/// ----------
/// image : RgbImage
///     The input image.
/// table : List[(str, ColorRange)]
///     Named HSV ranges to segment by, e.g. `DEFAULT_COLOR_RANGES`.
///
/// Returns
/// -------
/// RgbImage
///     The union of all per-color masked regions.
/// ```
pub fn segment_colors(image: &RgbImage, table: &[(&str, ColorRange)]) -> RgbImage {
    let mut filtered = RgbImage::new(image.width(), image.height());

    for (name, range) in table {
        let mask = cleanup_mask(&color_mask(image, range));

        log::debug!(
            "color {}: {} mask pixels",
            name,
            mask.pixels().filter(|p| p[0] > 0).count()
        );

        for (x, y, pixel) in mask.enumerate_pixels() {
            if pixel[0] > 0 {
                filtered.put_pixel(x, y, *image.get_pixel(x, y));
            }
        }
    }

    filtered
}

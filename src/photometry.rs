use image::RgbImage;

use crate::face_detector::FaceBounds;

/// Mean luminance of the frame, via grayscale conversion.
pub(crate) fn mean_luminance(image: &RgbImage) -> f64 {
    let gray = image::imageops::grayscale(image);
    let pixels = gray.as_raw();
    if pixels.is_empty() {
        return 0.0;
    }
    let sum: u64 = pixels.iter().map(|&v| v as u64).sum();
    sum as f64 / pixels.len() as f64
}

/// Fraction of unmasked pixels that are white-ish.
///
/// A pixel counts as white-ish when all three channels are strictly above
/// `white_floor`. The `exclusion` box, expanded by `margin` pixels on each
/// side, removes the subject from consideration; with no exclusion the
/// whole frame is measured. Returns 0 when the mask covers everything.
pub(crate) fn background_white_ratio(
    image: &RgbImage,
    exclusion: Option<&FaceBounds>,
    white_floor: u8,
    margin: u32,
) -> f64 {
    let (width, height) = image.dimensions();
    let masked = exclusion.map(|face| expand_to_mask(face, margin, width, height));

    let mut unmasked = 0u64;
    let mut whiteish = 0u64;

    for (x, y, pixel) in image.enumerate_pixels() {
        if let Some((x0, y0, x1, y1)) = masked {
            if x >= x0 && x < x1 && y >= y0 && y < y1 {
                continue;
            }
        }
        unmasked += 1;
        if pixel.0.iter().all(|&channel| channel > white_floor) {
            whiteish += 1;
        }
    }

    if unmasked == 0 {
        return 0.0;
    }
    whiteish as f64 / unmasked as f64
}

/// Expand a face box by `margin` on each side, clamped to the frame.
/// Returns half-open pixel bounds (x0, y0, x1, y1).
fn expand_to_mask(face: &FaceBounds, margin: u32, width: u32, height: u32) -> (u32, u32, u32, u32) {
    let margin = margin as f64;
    let x0 = (face.x - margin).max(0.0) as u32;
    let y0 = (face.y - margin).max(0.0) as u32;
    let x1 = (face.x + face.width + margin).ceil().min(width as f64) as u32;
    let y1 = (face.y + face.height + margin).ceil().min(height as f64) as u32;
    (x0, y0, x1, y1)
}

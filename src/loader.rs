use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::error::DvPhotoError;
use crate::jfif_density;
use crate::CANONICAL_EDGE;

/// A decoded submission, flattened to RGB at its original dimensions.
pub(crate) struct LoadedPhoto {
    pub raster: RgbImage,
    pub format: ImageFormat,
    /// Density declared in the JFIF header, if the input carried one.
    pub dpi: Option<(u16, u16)>,
}

/// Detect the input image format from the raw bytes.
pub(crate) fn sniff_format(input: &[u8]) -> Result<ImageFormat, DvPhotoError> {
    image::guess_format(input).map_err(|e| DvPhotoError::Decode(e.to_string()))
}

/// Decode input bytes and flatten any alpha channel onto white.
pub(crate) fn load(input: &[u8]) -> Result<LoadedPhoto, DvPhotoError> {
    let format = sniff_format(input)?;
    let decoded =
        image::load_from_memory(input).map_err(|e| DvPhotoError::Decode(e.to_string()))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(DvPhotoError::ZeroDimensions);
    }

    let dpi = if format == ImageFormat::Jpeg {
        jfif_density::declared_dpi(input)
    } else {
        None
    };

    Ok(LoadedPhoto {
        raster: flatten_alpha(&decoded),
        format,
        dpi,
    })
}

/// Stretch the raster to the canonical square if it isn't already there.
///
/// The aspect ratio is intentionally not preserved. Returns the working
/// raster and whether a resize was applied.
pub(crate) fn normalize(raster: RgbImage) -> (RgbImage, bool) {
    if raster.dimensions() == (CANONICAL_EDGE, CANONICAL_EDGE) {
        return (raster, false);
    }
    let stretched = imageops::resize(&raster, CANONICAL_EDGE, CANONICAL_EDGE, FilterType::Lanczos3);
    (stretched, true)
}

/// Flatten alpha channel by compositing onto a white background.
pub(crate) fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    let rgba: RgbaImage = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        // Composite over white (255, 255, 255)
        let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
        let mut buffer = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
        encoder
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    #[test]
    fn load_reports_intrinsic_format() {
        let png = make_test_png(100, 80);
        let photo = load(&png).unwrap();
        assert_eq!(photo.format, ImageFormat::Png);
        assert_eq!(photo.raster.dimensions(), (100, 80));
        assert_eq!(photo.dpi, None);
    }

    #[test]
    fn load_rejects_undecodable_input() {
        assert!(load(b"not an image").is_err());
    }

    #[test]
    fn normalize_passes_canonical_through() {
        let raster = RgbImage::new(CANONICAL_EDGE, CANONICAL_EDGE);
        let (out, resized) = normalize(raster);
        assert!(!resized);
        assert_eq!(out.dimensions(), (CANONICAL_EDGE, CANONICAL_EDGE));
    }

    #[test]
    fn normalize_stretches_to_canonical_square() {
        let raster = RgbImage::new(300, 400);
        let (out, resized) = normalize(raster);
        assert!(resized);
        assert_eq!(out.dimensions(), (CANONICAL_EDGE, CANONICAL_EDGE));
    }

    #[test]
    fn flatten_alpha_composites_over_white() {
        // Fully transparent pixel should become white
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([255, 0, 0, 0]));
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let rgb = flatten_alpha(&dynamic);
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn flatten_alpha_preserves_opaque() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([100, 150, 200, 255]));
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let rgb = flatten_alpha(&dynamic);
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([100, 150, 200]));
    }

    #[test]
    fn flatten_alpha_blends_semitransparent() {
        let mut rgba = RgbaImage::new(1, 1);
        // 50% transparent red blends toward white
        rgba.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
        let dynamic = DynamicImage::ImageRgba8(rgba);
        let rgb = flatten_alpha(&dynamic);
        let pixel = rgb.get_pixel(0, 0);
        assert!((pixel.0[0] as i16 - 255).abs() <= 1);
        assert!((pixel.0[1] as i16 - 127).abs() <= 2);
        assert!((pixel.0[2] as i16 - 127).abs() <= 2);
    }
}

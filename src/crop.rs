use crate::face_detector::FaceBounds;
use crate::CANONICAL_EDGE;

/// Headroom above the face box, as a fraction of face height.
const HEADROOM: f64 = 0.5;

/// Reach below the face center, as a fraction of face height. Covers the
/// chin and shoulders for a head-and-shoulders composition.
const TORSO_REACH: f64 = 1.2;

/// Vertical crop window within the source raster. The full width is
/// always retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub top: u32,
    pub bottom: u32,
}

impl CropWindow {
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(1)
    }
}

/// Derive the head-and-shoulders crop window from the primary face box.
///
/// The window spans from half a face-height above the box to 1.2
/// face-heights below the face center, clamped to the raster. The face
/// height is the only size reference, matching ID-photo headroom
/// conventions.
pub fn head_and_shoulders_window(face: &FaceBounds, raster_height: u32) -> CropWindow {
    let top = (face.y - face.height * HEADROOM).round().max(0.0) as u32;
    let top = top.min(raster_height);

    let face_center_y = face.y + face.height / 2.0;
    let bottom = (face_center_y + face.height * TORSO_REACH)
        .round()
        .min(raster_height as f64) as u32;

    CropWindow {
        top,
        bottom: bottom.max(top),
    }
}

/// Remap a face box through the crop-and-stretch transform.
///
/// The crop retains the full width, so only the vertical axis changes:
/// the window is shifted to the origin and stretched back to the
/// canonical edge. The returned box is valid on the re-normalized
/// 600×600 raster.
pub fn remap_into_canonical(face: &FaceBounds, window: CropWindow) -> FaceBounds {
    let scale_y = CANONICAL_EDGE as f64 / window.height() as f64;
    FaceBounds {
        x: face.x,
        y: (face.y - window.top as f64) * scale_y,
        width: face.width,
        height: face.height * scale_y,
        confidence: face.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: f64, y: f64, width: f64, height: f64) -> FaceBounds {
        FaceBounds {
            x,
            y,
            width,
            height,
            confidence: 10.0,
        }
    }

    #[test]
    fn centered_face_window() {
        // top = 150 - 100 = 50, bottom = 250 + 240 = 490
        let window = head_and_shoulders_window(&face(200.0, 150.0, 200.0, 200.0), 600);
        assert_eq!(window, CropWindow { top: 50, bottom: 490 });
        assert_eq!(window.height(), 440);
    }

    #[test]
    fn window_top_clamps_at_zero() {
        // top = 30 - 50 < 0
        let window = head_and_shoulders_window(&face(200.0, 30.0, 100.0, 100.0), 600);
        assert_eq!(window.top, 0);
        assert_eq!(window.bottom, 200); // 80 + 120
    }

    #[test]
    fn window_bottom_clamps_at_raster() {
        // bottom = 500 + 240 > 600
        let window = head_and_shoulders_window(&face(200.0, 400.0, 200.0, 200.0), 600);
        assert_eq!(window.top, 300);
        assert_eq!(window.bottom, 600);
    }

    #[test]
    fn remap_scales_vertical_axis_only() {
        let original = face(200.0, 150.0, 200.0, 200.0);
        let window = CropWindow { top: 50, bottom: 490 };
        let mapped = remap_into_canonical(&original, window);

        let scale = 600.0 / 440.0;
        assert_eq!(mapped.x, 200.0);
        assert_eq!(mapped.width, 200.0);
        assert!((mapped.y - 100.0 * scale).abs() < 1e-9);
        assert!((mapped.height - 200.0 * scale).abs() < 1e-9);
    }

    #[test]
    fn remap_of_full_window_is_identity() {
        let original = face(100.0, 100.0, 150.0, 150.0);
        let window = CropWindow { top: 0, bottom: 600 };
        let mapped = remap_into_canonical(&original, window);
        assert_eq!(mapped.y, 100.0);
        assert_eq!(mapped.height, 150.0);
    }
}

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

impl FaceBounds {
    /// Bounding-box area in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Pluggable frontal-face detection backend.
///
/// Implement this trait to provide a custom detector (ONNX, dlib, etc.)
/// and pass it to [`crate::PhotoValidator::face_detector`]. Coordinates
/// returned by `detect_faces` are valid only for the raster they were
/// computed on; any resize or crop invalidates them.
pub trait FaceDetector: Send + Sync {
    /// Detect frontal faces in a row-major grayscale buffer of
    /// `width` × `height` bytes.
    fn detect_faces(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;

    /// Count eyes strictly within `face` on the same grayscale buffer.
    ///
    /// Returns `None` when the backend has no eye detection capability,
    /// in which case the occlusion check is skipped entirely.
    fn count_eyes(
        &self,
        _gray: &[u8],
        _width: u32,
        _height: u32,
        _face: &FaceBounds,
    ) -> Option<usize> {
        None
    }
}

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::DvPhotoError;
use crate::face_detector::{FaceBounds, FaceDetector};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The SeetaFace model is loaded from a caller-supplied path on
/// construction. The detector is tuned for ID-photo inputs: faces
/// smaller than 100×100 px are ignored to suppress false positives on
/// low-resolution uploads, and the pyramid step is roughly 1.1× per
/// level.
///
/// SeetaFace is a frontal-face model with no eye cascade, so
/// [`FaceDetector::count_eyes`] reports no capability and the occlusion
/// check is skipped for this backend.
pub struct RustfaceDetector {
    model: rustface::Model,
}

/// Minimum detectable face size in pixels.
const MIN_FACE_SIZE: u32 = 100;

impl RustfaceDetector {
    /// Load a SeetaFace model (e.g. `seeta_fd_frontal_v1.0.bin`) from disk.
    pub fn from_model_file(path: &Path) -> Result<Self, DvPhotoError> {
        let file = File::open(path).map_err(|e| DvPhotoError::Model(e.to_string()))?;
        let model = rustface::read_model(BufReader::new(file))
            .map_err(|e| DvPhotoError::Model(e.to_string()))?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect_faces(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(2.0);
        // Pyramid shrink factor per level; 0.9 ≈ a 1.1× scale step.
        detector.set_pyramid_scale_factor(0.9);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, RgbImage};
use tracing::{debug, info};

use crate::error::DvPhotoError;
use crate::policy::PolicyThresholds;

/// Prefix for every persisted artifact filename.
pub(crate) const ARTIFACT_PREFIX: &str = "dvphoto";

/// Outcome of persisting an artifact under the size ceiling.
#[derive(Debug)]
pub(crate) enum PersistOutcome {
    /// The artifact was written and is within the ceiling.
    Saved { name: String, size_kb: f64 },
    /// The artifact exceeded the ceiling and has been deleted.
    OverLimit { size_kb: f64 },
}

/// Encode the frame as JPEG and persist it under a collision-resistant
/// name, enforcing the size ceiling.
///
/// The filename combines the fixed prefix, the submission's stem, and a
/// nanosecond timestamp, so concurrent submissions never collide without
/// coordination. If the written file exceeds the ceiling it is deleted
/// before returning; no over-limit artifact remains addressable.
pub(crate) fn persist_within_limit(
    frame: &RgbImage,
    output_dir: &Path,
    stem: &str,
    thresholds: &PolicyThresholds,
) -> Result<PersistOutcome, DvPhotoError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, thresholds.jpeg_quality);
    encoder
        .write_image(
            frame.as_raw(),
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| DvPhotoError::Encode(e.to_string()))?;

    let name = format!("{ARTIFACT_PREFIX}-{stem}-{}.jpg", timestamp_nanos());
    let path = output_dir.join(&name);

    fs::write(&path, &buffer).map_err(|e| DvPhotoError::Write(e.to_string()))?;
    let size_kb = buffer.len() as f64 / 1024.0;
    debug!(name = %name, size_kb, "artifact written");

    if !thresholds.size_ok(size_kb) {
        fs::remove_file(&path).map_err(|e| DvPhotoError::Write(e.to_string()))?;
        info!(size_kb, limit_kb = thresholds.max_artifact_kb, "artifact over size ceiling, deleted");
        return Ok(PersistOutcome::OverLimit { size_kb });
    }

    Ok(PersistOutcome::Saved { name, size_kb })
}

fn timestamp_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_frame() -> RgbImage {
        RgbImage::from_pixel(64, 64, image::Rgb([255, 255, 255]))
    }

    #[test]
    fn saves_artifact_with_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let outcome =
            persist_within_limit(&white_frame(), dir.path(), "photo", &PolicyThresholds::default())
                .unwrap();

        match outcome {
            PersistOutcome::Saved { name, size_kb } => {
                assert!(name.starts_with("dvphoto-photo-"));
                assert!(name.ends_with(".jpg"));
                assert!(size_kb > 0.0);
                assert!(dir.path().join(&name).exists());
            }
            other => panic!("expected Saved, got {other:?}"),
        }
    }

    #[test]
    fn sequential_saves_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let thresholds = PolicyThresholds::default();
        let first = persist_within_limit(&white_frame(), dir.path(), "photo", &thresholds).unwrap();
        let second = persist_within_limit(&white_frame(), dir.path(), "photo", &thresholds).unwrap();

        match (first, second) {
            (PersistOutcome::Saved { name: a, .. }, PersistOutcome::Saved { name: b, .. }) => {
                assert_ne!(a, b);
            }
            other => panic!("expected two saves, got {other:?}"),
        }
    }

    #[test]
    fn over_limit_artifact_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let thresholds = PolicyThresholds {
            max_artifact_kb: 0.01,
            ..PolicyThresholds::default()
        };
        let outcome =
            persist_within_limit(&white_frame(), dir.path(), "photo", &thresholds).unwrap();

        assert!(matches!(outcome, PersistOutcome::OverLimit { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_directory_is_a_write_error() {
        let result = persist_within_limit(
            &white_frame(),
            Path::new("/nonexistent-output-dir"),
            "photo",
            &PolicyThresholds::default(),
        );
        assert!(matches!(result, Err(DvPhotoError::Write(_))));
    }
}

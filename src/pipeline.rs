use std::path::Path;

use image::imageops::{self, FilterType};
use image::ImageFormat;
use tracing::debug;

use crate::artifact::{self, PersistOutcome};
use crate::crop;
use crate::error::DvPhotoError;
use crate::face_detector::{FaceBounds, FaceDetector};
use crate::loader;
use crate::photometry;
use crate::policy::{self, Issue, PolicyThresholds};
use crate::{ComplianceResult, CANONICAL_EDGE};

/// Declared resolution a scanned submission must carry.
const SCANNED_DPI: u16 = 300;

/// One submission moving through the pipeline.
pub(crate) struct Submission<'a> {
    pub input: &'a [u8],
    pub stem: &'a str,
    pub scanned: bool,
}

/// Run every compliance stage over the submission and persist the
/// artifact if the policy passes.
///
/// Stages run in strict sequence: load → normalize → face location →
/// composition crop → photometrics → policy decision → artifact write.
/// Only the geometric stages are skipped when no single face exists;
/// every other check still runs so one submission cycle reports every
/// detectable defect.
pub(crate) fn run(
    submission: &Submission<'_>,
    detector: &dyn FaceDetector,
    thresholds: &PolicyThresholds,
    output_dir: &Path,
) -> Result<ComplianceResult, DvPhotoError> {
    let mut issues: Vec<Issue> = Vec::new();
    let mut fixes: Vec<Issue> = Vec::new();

    let photo = loader::load(submission.input)?;
    let original_dimensions = photo.raster.dimensions();
    debug!(
        format = ?photo.format,
        width = original_dimensions.0,
        height = original_dimensions.1,
        dpi = ?photo.dpi,
        "submission decoded"
    );

    if photo.format != ImageFormat::Jpeg {
        issues.push(Issue::format_invalid());
    }

    let (raster, resized) = loader::normalize(photo.raster);
    if resized {
        if submission.scanned {
            issues.push(Issue::dimension_invalid());
        } else {
            fixes.push(Issue::dimension_auto_fixed());
        }
        debug!("stretched raster to canonical square");
    }

    if submission.scanned {
        // A scanned print must already be at the canonical dimensions;
        // flagging here as well as at normalization collapses in the
        // dedupe pass.
        if original_dimensions != (CANONICAL_EDGE, CANONICAL_EDGE) {
            issues.push(Issue::dimension_invalid());
        }
        match photo.dpi {
            Some((SCANNED_DPI, SCANNED_DPI)) => {}
            _ => issues.push(Issue::resolution_invalid()),
        }
    }

    let gray = imageops::grayscale(&raster);
    let faces = detector.detect_faces(gray.as_raw(), raster.width(), raster.height());
    debug!(face_count = faces.len(), "frontal face detection complete");

    let single_face = match faces.len() {
        0 => {
            issues.push(Issue::no_face_detected());
            None
        }
        1 => primary_face(&faces).cloned(),
        _ => {
            issues.push(Issue::multiple_faces_detected());
            None
        }
    };

    if let Some(face) = &single_face {
        if let Some(eye_count) =
            detector.count_eyes(gray.as_raw(), raster.width(), raster.height(), face)
        {
            debug!(eye_count, "eye detection complete");
            if eye_count < 2 {
                issues.push(Issue::possible_occlusion());
            }
        }
    }

    // Composition crop needs exactly one face; without it the photometric
    // stages measure the un-cropped canonical raster.
    let (frame, frame_face) = match &single_face {
        Some(face) => {
            let window = crop::head_and_shoulders_window(face, raster.height());
            let cropped =
                imageops::crop_imm(&raster, 0, window.top, raster.width(), window.height())
                    .to_image();
            let stretched =
                imageops::resize(&cropped, CANONICAL_EDGE, CANONICAL_EDGE, FilterType::Lanczos3);
            let remapped = crop::remap_into_canonical(face, window);
            debug!(top = window.top, bottom = window.bottom, "composition crop applied");
            (stretched, Some(remapped))
        }
        None => (raster, None),
    };

    let brightness = photometry::mean_luminance(&frame);
    if !thresholds.brightness_ok(brightness) {
        issues.push(Issue::too_dark());
    }

    let coverage = photometry::background_white_ratio(
        &frame,
        frame_face.as_ref(),
        thresholds.white_intensity,
        thresholds.face_mask_margin,
    );
    if !thresholds.background_ok(coverage) {
        issues.push(Issue::background_not_white());
    }
    debug!(brightness, coverage, "photometric analysis complete");

    let issues = policy::dedupe_issues(issues);
    if !issues.is_empty() {
        return Ok(ComplianceResult::Fail { issues });
    }

    match artifact::persist_within_limit(&frame, output_dir, submission.stem, thresholds)? {
        PersistOutcome::Saved { name, .. } => Ok(ComplianceResult::Pass {
            fixes_applied: fixes.into_iter().map(|fix| fix.message).collect(),
            artifact_name: name,
        }),
        PersistOutcome::OverLimit { size_kb } => Ok(ComplianceResult::Fail {
            issues: vec![Issue::file_too_large(size_kb, thresholds.max_artifact_kb)],
        }),
    }
}

/// Deterministic primary-face selection: largest bounding-box area,
/// detector order breaking exact ties.
fn primary_face(faces: &[FaceBounds]) -> Option<&FaceBounds> {
    faces.iter().max_by(|a, b| {
        a.area()
            .partial_cmp(&b.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Brightness floor of the current policy revision.
pub const BRIGHTNESS_FLOOR_STRICT: f64 = 100.0;

/// Brightness floor of the earlier, more permissive revision.
pub const BRIGHTNESS_FLOOR_LENIENT: f64 = 80.0;

/// Background coverage minimum of the current policy revision.
pub const BACKGROUND_COVERAGE_STRICT: f64 = 0.85;

/// Background coverage minimum of the earlier, more permissive revision.
pub const BACKGROUND_COVERAGE_LENIENT: f64 = 0.45;

/// The kind of requirement a submission violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The input was not encoded as JPEG.
    FormatInvalid,
    /// A scanned submission did not arrive at the canonical dimensions.
    DimensionInvalid,
    /// A non-canonical input was stretched to 600×600. Recorded as an
    /// applied fix on the success path, never as a violation.
    DimensionAutoFixed,
    /// A scanned submission did not declare a 300 DPI resolution.
    ResolutionInvalid,
    /// No frontal face was found.
    NoFaceDetected,
    /// More than one frontal face was found.
    MultipleFacesDetected,
    /// Fewer than two eyes were found within the face; glasses or a
    /// face covering may be obscuring it.
    PossibleOcclusion,
    /// Mean brightness fell below the policy floor.
    TooDark,
    /// Background whiteness coverage fell below the policy minimum.
    BackgroundNotWhite,
    /// The saved artifact exceeded the file-size ceiling.
    FileTooLarge,
}

/// One detected violation of a documented requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Which requirement was violated.
    pub kind: IssueKind,
    /// Human-readable description, also the deduplication key.
    pub message: String,
}

impl Issue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn format_invalid() -> Self {
        Self::new(
            IssueKind::FormatInvalid,
            "Image is not in JPEG format. Please provide a JPEG image.",
        )
    }

    pub(crate) fn dimension_auto_fixed() -> Self {
        Self::new(
            IssueKind::DimensionAutoFixed,
            "Resized image to 600x600 pixels.",
        )
    }

    pub(crate) fn dimension_invalid() -> Self {
        Self::new(
            IssueKind::DimensionInvalid,
            "For scanned images, please provide an image with 2x2 inches (51x51 mm) dimensions.",
        )
    }

    pub(crate) fn resolution_invalid() -> Self {
        Self::new(
            IssueKind::ResolutionInvalid,
            "Scanned image does not have a resolution of 300 DPI.",
        )
    }

    pub(crate) fn no_face_detected() -> Self {
        Self::new(
            IssueKind::NoFaceDetected,
            "No face detected in the image. Please ensure the face is visible.",
        )
    }

    pub(crate) fn multiple_faces_detected() -> Self {
        Self::new(
            IssueKind::MultipleFacesDetected,
            "Multiple faces detected. Please ensure only one face is visible in the image.",
        )
    }

    pub(crate) fn possible_occlusion() -> Self {
        Self::new(
            IssueKind::PossibleOcclusion,
            "Fewer than two eyes detected. Remove glasses or face coverings and resubmit.",
        )
    }

    pub(crate) fn too_dark() -> Self {
        Self::new(
            IssueKind::TooDark,
            "Image is too dark. Ensure the face is well-lit.",
        )
    }

    pub(crate) fn background_not_white() -> Self {
        Self::new(
            IssueKind::BackgroundNotWhite,
            "Background is not sufficiently white. Ensure a plain white or off-white background.",
        )
    }

    pub(crate) fn file_too_large(actual_kb: f64, limit_kb: f64) -> Self {
        Self::new(
            IssueKind::FileTooLarge,
            format!(
                "Image file size is {actual_kb:.2} KB, which exceeds the {limit_kb:.0} KB limit."
            ),
        )
    }
}

/// Numeric thresholds the policy engine evaluates measurements against.
///
/// Two threshold revisions exist for brightness and background coverage;
/// the stricter pair is the default. Construct with `Default` and
/// override fields as needed.
#[derive(Debug, Clone)]
pub struct PolicyThresholds {
    /// Minimum mean brightness. A value exactly at the floor passes.
    pub brightness_floor: f64,
    /// Minimum background whiteness coverage, in `[0, 1]`.
    pub background_coverage_floor: f64,
    /// Per-channel intensity a pixel must strictly exceed to count as
    /// white-ish.
    pub white_intensity: u8,
    /// Margin in pixels added around the face box when masking the
    /// subject out of the background measurement.
    pub face_mask_margin: u32,
    /// JPEG quality used when persisting the artifact.
    pub jpeg_quality: u8,
    /// Ceiling on the persisted artifact size, in kilobytes.
    pub max_artifact_kb: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            brightness_floor: BRIGHTNESS_FLOOR_STRICT,
            background_coverage_floor: BACKGROUND_COVERAGE_STRICT,
            white_intensity: 230,
            face_mask_margin: 20,
            jpeg_quality: 85,
            max_artifact_kb: 240.0,
        }
    }
}

impl PolicyThresholds {
    /// Failure triggers only strictly below the floor.
    pub(crate) fn brightness_ok(&self, brightness: f64) -> bool {
        brightness >= self.brightness_floor
    }

    pub(crate) fn background_ok(&self, coverage: f64) -> bool {
        coverage >= self.background_coverage_floor
    }

    pub(crate) fn size_ok(&self, size_kb: f64) -> bool {
        size_kb <= self.max_artifact_kb
    }
}

/// Drop repeated issues, keyed by message, preserving first-seen order.
///
/// The same physical defect can be flagged by more than one check path;
/// the report must name it once.
pub(crate) fn dedupe_issues(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| seen.insert(issue.message.clone()))
        .collect()
}

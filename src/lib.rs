//! DV photo compliance: validate, auto-correct, and persist ID photos.
//!
//! A staged pipeline checks a submitted photograph against fixed
//! ID-photo requirements (JPEG format, 600×600 canonical size, a single
//! well-lit frontal face, plain light background, bounded output size),
//! auto-corrects what it can (stretch-resize to the canonical square),
//! and persists a compliant artifact as JPEG.
//!
//! # Example
//!
//! ```no_run
//! use dvphoto::{ComplianceResult, PhotoValidator};
//!
//! # fn detector() -> Box<dyn dvphoto::FaceDetector> { unimplemented!() }
//! let raw_bytes = std::fs::read("photo.jpg").unwrap();
//! let result = PhotoValidator::new(raw_bytes)
//!     .unwrap()
//!     .source_stem("photo")
//!     .face_detector(detector())
//!     .validate(std::path::Path::new("artifacts"))
//!     .unwrap();
//!
//! match result {
//!     ComplianceResult::Pass { artifact_name, .. } => println!("saved {artifact_name}"),
//!     ComplianceResult::Fail { issues } => {
//!         for issue in issues {
//!             println!("{}", issue.message);
//!         }
//!     }
//! }
//! ```
#![warn(missing_docs)]

mod artifact;
mod crop;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod jfif_density;
mod loader;
mod photometry;
mod pipeline;
mod policy;
#[cfg(feature = "rustface")]
/// SeetaFace-based face detector backend.
pub mod rustface_backend;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error type returned by dvphoto operations.
pub use error::DvPhotoError;
/// Face detection trait and face bounding-box type.
pub use face_detector::{FaceBounds, FaceDetector};
/// Compliance issue types and policy thresholds.
pub use policy::{
    Issue, IssueKind, PolicyThresholds, BACKGROUND_COVERAGE_LENIENT, BACKGROUND_COVERAGE_STRICT,
    BRIGHTNESS_FLOOR_LENIENT, BRIGHTNESS_FLOOR_STRICT,
};
#[cfg(feature = "rustface")]
/// Detector backend that loads a SeetaFace model from disk.
pub use rustface_backend::RustfaceDetector;

/// Edge length in pixels of the canonical working raster all stages
/// operate on after normalization.
pub const CANONICAL_EDGE: u32 = 600;

/// Terminal result of one pipeline invocation.
///
/// Constructed exactly once per submission and never mutated. A `Pass`
/// guarantees the named artifact exists in the output directory and is
/// within the size ceiling; a `Fail` carries every detected defect,
/// deduplicated, so the submitter can fix everything in one cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceResult {
    /// The submission met every requirement.
    Pass {
        /// Auto-corrections applied on the way to compliance.
        fixes_applied: Vec<String>,
        /// Filename of the persisted artifact within the output directory.
        artifact_name: String,
    },
    /// The submission violated at least one requirement.
    Fail {
        /// Deduplicated violations, in first-detected order.
        issues: Vec<Issue>,
    },
}

/// Builder for validating identity photo submissions.
///
/// Decodes enough of the input on construction to reject undecodable
/// bytes early, then runs the full compliance pipeline on
/// [`validate`](Self::validate).
pub struct PhotoValidator {
    input: Vec<u8>,
    source_stem: String,
    scanned: bool,
    thresholds: PolicyThresholds,
    detector: Option<Box<dyn FaceDetector>>,
}

impl PhotoValidator {
    /// Create a new validator from raw image bytes (JPEG, PNG, or WebP).
    pub fn new(input: Vec<u8>) -> Result<Self, DvPhotoError> {
        // Validate that the input looks like a decodable raster
        loader::sniff_format(&input)?;

        Ok(Self {
            input,
            source_stem: "photo".to_string(),
            scanned: false,
            thresholds: PolicyThresholds::default(),
            detector: None,
        })
    }

    /// Set the original filename stem used in the artifact name
    /// (default: `"photo"`).
    pub fn source_stem(mut self, stem: impl Into<String>) -> Self {
        self.source_stem = stem.into();
        self
    }

    /// Mark the submission as a scanned print (default: false).
    ///
    /// Scanned submissions must arrive at the canonical 600×600
    /// dimensions and declare a 300 DPI resolution; a non-canonical size
    /// is a violation rather than an auto-fixable defect.
    pub fn scanned(mut self, scanned: bool) -> Self {
        self.scanned = scanned;
        self
    }

    /// Override the policy thresholds (default: the strict revision).
    pub fn thresholds(mut self, thresholds: PolicyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Provide the face detector implementation.
    ///
    /// With the `rustface` feature, [`RustfaceDetector`] is a ready-made
    /// backend; any [`FaceDetector`] implementation works.
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Run every compliance check and persist the artifact on pass.
    ///
    /// `output_dir` must be an existing writable directory; the artifact
    /// filename is generated internally and returned in the result.
    /// Returns `Err` only for fatal conditions (undecodable input, disk
    /// failure, missing detector); every compliance defect is reported
    /// through [`ComplianceResult::Fail`].
    pub fn validate(self, output_dir: &Path) -> Result<ComplianceResult, DvPhotoError> {
        let detector = self.detector.ok_or(DvPhotoError::DetectorUnavailable)?;
        let submission = pipeline::Submission {
            input: &self.input,
            stem: &self.source_stem,
            scanned: self.scanned,
        };
        pipeline::run(&submission, detector.as_ref(), &self.thresholds, output_dir)
    }
}

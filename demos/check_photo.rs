//! Check a photo against the DV compliance rules and print the verdict.
//!
//! Usage:
//!   cargo run --example check_photo --features rustface -- <photo> <model-file> [output-dir]
//!
//! `<model-file>` is a SeetaFace frontal model (seeta_fd_frontal_v1.0.bin).

#[cfg(feature = "rustface")]
fn main() {
    use std::path::Path;

    use dvphoto::{ComplianceResult, PhotoValidator, RustfaceDetector};

    let mut args = std::env::args().skip(1);
    let photo_path = args.next().expect("usage: check_photo <photo> <model-file> [output-dir]");
    let model_path = args.next().expect("usage: check_photo <photo> <model-file> [output-dir]");
    let output_dir = args.next().unwrap_or_else(|| ".".to_string());

    let input = std::fs::read(&photo_path)
        .unwrap_or_else(|e| panic!("failed to read {photo_path}: {e}"));
    let detector = RustfaceDetector::from_model_file(Path::new(&model_path))
        .unwrap_or_else(|e| panic!("failed to load model {model_path}: {e}"));

    let stem = Path::new(&photo_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("photo");

    let result = PhotoValidator::new(input)
        .unwrap()
        .source_stem(stem)
        .face_detector(Box::new(detector))
        .validate(Path::new(&output_dir))
        .unwrap();

    match result {
        ComplianceResult::Pass {
            fixes_applied,
            artifact_name,
        } => {
            println!("PASS: saved {artifact_name}");
            for fix in fixes_applied {
                println!("  fixed: {fix}");
            }
        }
        ComplianceResult::Fail { issues } => {
            println!("FAIL:");
            for issue in issues {
                println!("  {}", issue.message);
            }
        }
    }
}

#[cfg(not(feature = "rustface"))]
fn main() {
    eprintln!("rebuild with --features rustface to run this demo");
}

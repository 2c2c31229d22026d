use thiserror::Error;

/// Fatal pipeline errors. Compliance defects are never errors; they are
/// reported through the result's issue list.
#[derive(Debug, Error)]
pub enum DvPhotoError {
    /// The input bytes could not be decoded as a raster image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The decoded image has a zero dimension.
    #[error("image dimensions are zero")]
    ZeroDimensions,

    /// The working raster could not be encoded as JPEG.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// The artifact could not be written to (or removed from) the
    /// output directory.
    #[error("failed to persist artifact: {0}")]
    Write(String),

    /// The face detection model could not be loaded.
    #[error("failed to load face detection model: {0}")]
    Model(String),

    /// No face detector was supplied.
    #[error("no face detector configured; supply one with `PhotoValidator::face_detector`")]
    DetectorUnavailable,
}

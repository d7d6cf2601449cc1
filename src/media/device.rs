//! Camera device seam.

use async_trait::async_trait;

use super::constraints::{ConstraintProfile, Resolution};
use super::photo::EncodedImage;

/// Source of camera streams.
#[async_trait]
pub trait MediaDevices: Send {
    /// Requests video-only access with one constraint profile.
    async fn get_user_media(
        &mut self,
        profile: &ConstraintProfile,
    ) -> Result<Box<dyn MediaStream>, MediaError>;
}

/// A live camera stream.
pub trait MediaStream: Send + std::fmt::Debug {
    /// Stream identifier, for logs.
    fn id(&self) -> &str;

    /// Frame size, if the stream knows it yet.
    fn dimensions(&self) -> Option<Resolution>;

    /// Snapshots the current frame at `size`.
    fn grab_frame(&mut self, size: Resolution) -> Result<EncodedImage, MediaError>;

    /// Stops every track. Idempotent.
    fn stop(&mut self);

    /// False once stopped.
    fn is_live(&self) -> bool;
}

/// Failure from the camera or the file picker.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MediaError {
    /// The player refused camera access.
    #[display("Camera permission denied")]
    PermissionDenied,

    /// No camera is available.
    #[display("No camera device found")]
    DeviceNotFound,

    /// A camera exists but cannot satisfy the profile.
    #[display("Camera cannot satisfy constraint '{}'", _0)]
    Overconstrained(String),

    /// Capture requested without a bound stream.
    #[display("No active camera stream")]
    NoActiveStream,

    /// The stream produced no frame.
    #[display("Camera frame unavailable: {}", _0)]
    FrameUnavailable(String),

    /// The selected file is not a supported image.
    #[display("Unsupported image file: {}", _0)]
    UnsupportedImage(String),

    /// The selected file is empty.
    #[display("Empty file: {}", _0)]
    EmptyFile(String),

    /// Reading the file or device failed.
    #[display("I/O error: {}", _0)]
    Io(String),
}

impl std::error::Error for MediaError {}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => MediaError::PermissionDenied,
            std::io::ErrorKind::NotFound => MediaError::DeviceNotFound,
            _ => MediaError::Io(err.to_string()),
        }
    }
}

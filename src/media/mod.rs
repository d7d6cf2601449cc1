//! Camera and file-upload adapter.

mod capture;
mod constraints;
mod device;
mod photo;
mod still;

pub use capture::{MediaCapture, VideoSink};
pub use constraints::{ConstraintProfile, FacingMode, Resolution};
pub use device::{MediaDevices, MediaError, MediaStream};
pub use photo::{EncodedImage, ImageFormat, PhotoFile, PhotoPayload, png_dimensions};
pub use still::{StillImageDevices, StillImageStream};

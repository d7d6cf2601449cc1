//! Camera device that serves a still image as its feed.
//!
//! Used by the terminal front-end, where no real camera exists, and by
//! tests to script acquisition outcomes.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::constraints::{ConstraintProfile, FacingMode, Resolution};
use super::device::{MediaDevices, MediaError, MediaStream};
use super::photo::{EncodedImage, png_dimensions};

#[derive(Debug, Clone)]
enum StillSource {
    Unavailable,
    Denied,
    File(PathBuf),
    Memory(Vec<u8>),
}

/// A single fixed-direction camera whose frames are one image.
#[derive(Debug, Clone)]
pub struct StillImageDevices {
    source: StillSource,
    facing: FacingMode,
    attempts: Vec<ConstraintProfile>,
    opened: usize,
}

impl StillImageDevices {
    fn with_source(source: StillSource, facing: FacingMode) -> Self {
        Self {
            source,
            facing,
            attempts: Vec::new(),
            opened: 0,
        }
    }

    /// No camera at all: every request fails with [`MediaError::DeviceNotFound`].
    pub fn unavailable() -> Self {
        Self::with_source(StillSource::Unavailable, FacingMode::User)
    }

    /// A camera the player refuses: every request fails with
    /// [`MediaError::PermissionDenied`].
    pub fn denied() -> Self {
        Self::with_source(StillSource::Denied, FacingMode::User)
    }

    /// Camera feed read from an image file on each request.
    pub fn from_file(path: impl Into<PathBuf>, facing: FacingMode) -> Self {
        Self::with_source(StillSource::File(path.into()), facing)
    }

    /// Camera feed from in-memory image bytes.
    pub fn from_bytes(bytes: Vec<u8>, facing: FacingMode) -> Self {
        Self::with_source(StillSource::Memory(bytes), facing)
    }

    /// Builds the device described by the camera config.
    pub fn from_config(config: &crate::config::CameraConfig) -> Self {
        match config.still_image() {
            Some(path) => Self::from_file(path.clone(), *config.facing()),
            None => Self::unavailable(),
        }
    }

    /// Every profile requested so far, in order.
    pub fn attempts(&self) -> &[ConstraintProfile] {
        &self.attempts
    }

    /// Number of streams handed out.
    pub fn opened(&self) -> usize {
        self.opened
    }
}

#[async_trait]
impl MediaDevices for StillImageDevices {
    #[instrument(skip(self), fields(facing = %self.facing))]
    async fn get_user_media(
        &mut self,
        profile: &ConstraintProfile,
    ) -> Result<Box<dyn MediaStream>, MediaError> {
        self.attempts.push(*profile);

        let bytes = match &self.source {
            StillSource::Unavailable => return Err(MediaError::DeviceNotFound),
            StillSource::Denied => return Err(MediaError::PermissionDenied),
            _ if !profile.accepts_facing(self.facing) => {
                return Err(MediaError::Overconstrained("facingMode".into()));
            }
            StillSource::File(path) => tokio::fs::read(path).await?,
            StillSource::Memory(bytes) => bytes.clone(),
        };

        let image = EncodedImage::sniffed(bytes).ok_or(MediaError::DeviceNotFound)?;
        self.opened += 1;
        let id = format!("still-{}", self.opened);
        debug!(stream_id = %id, format = %image.format, "Opened still image stream");

        Ok(Box::new(StillImageStream {
            id,
            dimensions: png_dimensions(&image.bytes).map(|(w, h)| Resolution::new(w, h)),
            image,
            live: true,
        }))
    }
}

/// Stream returned by [`StillImageDevices`].
#[derive(Debug)]
pub struct StillImageStream {
    id: String,
    image: EncodedImage,
    dimensions: Option<Resolution>,
    live: bool,
}

impl MediaStream for StillImageStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimensions(&self) -> Option<Resolution> {
        self.dimensions
    }

    fn grab_frame(&mut self, size: Resolution) -> Result<EncodedImage, MediaError> {
        if !self.live {
            return Err(MediaError::FrameUnavailable(format!("{} is stopped", self.id)));
        }
        debug!(stream_id = %self.id, %size, "Grabbing frame");
        Ok(self.image.clone())
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

//! Camera acquisition with ordered fallback, and frame capture.

use tracing::{debug, info, instrument, warn};

use super::constraints::{ConstraintProfile, Resolution};
use super::device::{MediaDevices, MediaError, MediaStream};
use super::photo::PhotoPayload;

/// A stream bound to the preview surface.
///
/// Previews are always muted and play inline.
#[derive(Debug)]
pub struct VideoSink {
    stream: Box<dyn MediaStream>,
    profile: ConstraintProfile,
    muted: bool,
    plays_inline: bool,
}

impl VideoSink {
    fn bind(stream: Box<dyn MediaStream>, profile: ConstraintProfile) -> Self {
        Self {
            stream,
            profile,
            muted: true,
            plays_inline: true,
        }
    }

    /// Profile the stream was acquired with.
    pub fn profile(&self) -> ConstraintProfile {
        self.profile
    }

    /// Frame size reported by the stream.
    pub fn dimensions(&self) -> Option<Resolution> {
        self.stream.dimensions()
    }

    /// Always true for a bound preview.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Always true for a bound preview.
    pub fn plays_inline(&self) -> bool {
        self.plays_inline
    }
}

/// Owns the single camera stream of the session.
#[derive(Debug)]
pub struct MediaCapture<D> {
    devices: D,
    sink: Option<VideoSink>,
    fallback_size: Resolution,
}

impl<D: MediaDevices> MediaCapture<D> {
    /// Creates an adapter with no active stream.
    pub fn new(devices: D, fallback_size: Resolution) -> Self {
        Self {
            devices,
            sink: None,
            fallback_size,
        }
    }

    /// The device source.
    pub fn devices(&self) -> &D {
        &self.devices
    }

    /// Bound preview, if streaming.
    pub fn sink(&self) -> Option<&VideoSink> {
        self.sink.as_ref()
    }

    /// True while a live stream is bound.
    pub fn is_streaming(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| sink.stream.is_live())
    }

    /// Acquires a stream, trying each profile of
    /// [`ConstraintProfile::FALLBACK_CHAIN`] until one succeeds.
    ///
    /// Any stream already bound is stopped first. On total failure the last
    /// error is returned.
    #[instrument(skip(self))]
    pub async fn start_camera(&mut self) -> Result<ConstraintProfile, MediaError> {
        self.stop();

        let mut last_error = MediaError::DeviceNotFound;
        for profile in ConstraintProfile::FALLBACK_CHAIN {
            match self.devices.get_user_media(&profile).await {
                Ok(stream) => {
                    info!(%profile, stream_id = stream.id(), "Camera stream acquired");
                    self.sink = Some(VideoSink::bind(stream, profile));
                    return Ok(profile);
                }
                Err(error) => {
                    debug!(%profile, %error, "Constraint profile failed, trying next");
                    last_error = error;
                }
            }
        }

        warn!(error = %last_error, "All constraint profiles failed");
        Err(last_error)
    }

    /// Snapshots the current frame and stops the stream.
    ///
    /// Uses the fallback size when the stream reports no dimensions. If the
    /// snapshot fails the stream stays bound so the player can retry.
    #[instrument(skip(self))]
    pub fn capture_photo(&mut self) -> Result<PhotoPayload, MediaError> {
        let sink = self.sink.as_mut().ok_or(MediaError::NoActiveStream)?;
        let size = sink.stream.dimensions().unwrap_or(self.fallback_size);
        let frame = sink.stream.grab_frame(size)?;
        info!(%size, format = %frame.format, "Frame captured");

        self.stop();
        Ok(PhotoPayload::from_image(&frame))
    }

    /// Stops and releases the bound stream, if any.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            debug!(stream_id = sink.stream.id(), "Stopping camera stream");
            sink.stream.stop();
        }
    }
}

impl<D> Drop for MediaCapture<D> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.stream.stop();
        }
    }
}

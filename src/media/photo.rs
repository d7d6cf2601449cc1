//! Image payloads: encoded frames, uploaded files and data URLs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, instrument};

use super::device::MediaError;

/// Image container formats recognized by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
    /// GIF87a/GIF89a.
    Gif,
    /// RIFF WebP.
    Webp,
    /// Windows bitmap.
    Bmp,
}

impl ImageFormat {
    /// MIME type for data URLs.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    /// Detects the format from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, ..] => Some(Self::Png),
            [0xff, 0xd8, 0xff, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// Reads width and height from a PNG IHDR chunk.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if ImageFormat::sniff(bytes) != Some(ImageFormat::Png) || bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes.get(16..20)?.try_into().ok()?);
    let height = u32::from_be_bytes(bytes.get(20..24)?.try_into().ok()?);
    Some((width, height))
}

/// Encoded image bytes with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Container format.
    pub format: ImageFormat,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Wraps bytes after checking their format.
    pub fn sniffed(bytes: Vec<u8>) -> Option<Self> {
        let format = ImageFormat::sniff(&bytes)?;
        Some(Self { format, bytes })
    }
}

/// A file chosen in the upload fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    /// File name, for messages.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    /// Creates a file record.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Decodes the file into a displayable payload.
    #[instrument(skip(self), fields(name = %self.name, len = self.bytes.len()))]
    pub fn decode(&self) -> Result<PhotoPayload, MediaError> {
        if self.bytes.is_empty() {
            return Err(MediaError::EmptyFile(self.name.clone()));
        }
        let format = ImageFormat::sniff(&self.bytes)
            .ok_or_else(|| MediaError::UnsupportedImage(self.name.clone()))?;
        debug!(%format, "Decoded uploaded image");
        Ok(PhotoPayload::encode(format, &self.bytes))
    }
}

/// A photo as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPayload(String);

impl PhotoPayload {
    /// Encodes raw image bytes.
    pub fn encode(format: ImageFormat, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes)))
    }

    /// Encodes a captured frame.
    pub fn from_image(image: &EncodedImage) -> Self {
        Self::encode(image.format, &image.bytes)
    }

    /// Wraps an existing data URL without validation.
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The data URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type between `data:` and `;`.
    pub fn mime(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("application/octet-stream")
    }

    /// Decodes the base64 body back into bytes.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        let (_, body) = self.0.split_once(";base64,")?;
        STANDARD.decode(body).ok()
    }
}

impl std::fmt::Display for PhotoPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_PNG: [u8; 24] = [
        0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0,
        0x01, 0x40, 0, 0, 0, 0xf0,
    ];

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(&TINY_PNG), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(&[0xff, 0xd8, 0xff, 0xe0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(b"hello"), None);
    }

    #[test]
    fn test_png_dimensions() {
        assert_eq!(png_dimensions(&TINY_PNG), Some((320, 240)));
        assert_eq!(png_dimensions(&TINY_PNG[..20]), None);
        assert_eq!(png_dimensions(b"GIF89a"), None);
    }

    #[test]
    fn test_decode_file() {
        let payload = PhotoFile::new("me.png", TINY_PNG.to_vec())
            .decode()
            .expect("PNG decodes");
        assert!(payload.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(payload.mime(), "image/png");
        assert_eq!(payload.bytes(), Some(TINY_PNG.to_vec()));
    }

    #[test]
    fn test_decode_rejects_non_images() {
        let err = PhotoFile::new("notes.txt", b"hello".to_vec()).decode().unwrap_err();
        assert_eq!(err, MediaError::UnsupportedImage("notes.txt".into()));

        let err = PhotoFile::new("empty.png", Vec::new()).decode().unwrap_err();
        assert_eq!(err, MediaError::EmptyFile("empty.png".into()));
    }
}

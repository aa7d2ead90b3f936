/// File reading and media type detection
///
/// Files are read on the tokio executor so the UI thread never blocks on disk.
/// The media type is derived from the extension first and the file contents second,
/// the same way a browser labels a picked file.
use bytes::Bytes;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::{Origin, SelectError};

/// Media type used when nothing better is known
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A file read from disk, not yet validated as an image
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Full path of the file
    pub path: PathBuf,
    /// Filename only (e.g., "slide_04.png")
    pub name: String,
    /// Detected media type (e.g., "image/png")
    pub media_type: String,
    /// Raw file contents
    pub bytes: Bytes,
    /// How the file reached us
    pub origin: Origin,
}

impl LoadedFile {
    /// Build a file from in-memory bytes
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: impl Into<Bytes>, origin: Origin) -> Self {
        let path = path.into();
        let bytes = bytes.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let media_type = detect_media_type(&path, &bytes);

        LoadedFile {
            path,
            name,
            media_type,
            bytes,
            origin,
        }
    }

    /// Whether the file carries an image media type
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

/// Read a picked or dropped file
pub async fn read_file(path: PathBuf, origin: Origin) -> Result<LoadedFile, SelectError> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| SelectError::Read {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    tracing::debug!("📂 Read {} ({})", path.display(), human_size(bytes.len()));

    Ok(LoadedFile::from_bytes(path, bytes, origin))
}

/// Detect the media type of a file from its extension, falling back to its contents
pub fn detect_media_type(path: &Path, bytes: &[u8]) -> String {
    ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| OCTET_STREAM.to_string())
}

/// `image/*` check
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Pixel dimensions of an encoded image, if its header can be decoded
pub fn read_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Format a byte count for display (e.g., "312.4 KB")
pub fn human_size(len: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let len = len as f64;
    if len >= MB {
        format!("{:.1} MB", len / MB)
    } else if len >= KB {
        format!("{:.1} KB", len / KB)
    } else {
        format!("{} B", len as usize)
    }
}

/// Encode a tiny solid-colour PNG
#[cfg(test)]
pub(crate) fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    use image::{ImageBuffer, Rgb};

    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgb([200, 30, 30]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("encode test PNG");
    buffer
}

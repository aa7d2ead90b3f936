/// Image data shared between the controller and the view
///
/// Both structs keep the encoded bytes together with an iced image handle,
/// which is the displayable reference the view renders.
use bytes::Bytes;
use iced::widget::image::Handle;
use std::path::PathBuf;
use std::time::Duration;

use crate::media::{self, LoadedFile};

/// The image the user picked or dropped
#[derive(Debug, Clone)]
pub struct SelectedImage {
    /// Full path of the source file
    pub path: PathBuf,
    /// Filename only (e.g., "slide_04.png")
    pub name: String,
    /// Detected media type, sent as the content type of the upload
    pub media_type: String,
    /// Encoded file contents
    pub bytes: Bytes,
    /// Pixel dimensions, None if the header could not be decoded
    pub dimensions: Option<(u32, u32)>,
    /// Handle for the preview widget
    pub handle: Handle,
}

impl SelectedImage {
    /// Build a selection from a file already known to be an image
    pub fn from_file(file: LoadedFile) -> Self {
        let dimensions = media::read_dimensions(&file.bytes);
        let handle = Handle::from_bytes(file.bytes.clone());

        Self {
            path: file.path,
            name: file.name,
            media_type: file.media_type,
            bytes: file.bytes,
            dimensions,
            handle,
        }
    }

    /// One-line summary for the preview caption
    pub fn summary(&self) -> String {
        describe(&self.name, self.bytes.len(), self.dimensions)
    }
}

/// The annotated image returned by the inference service
#[derive(Debug, Clone)]
pub struct ResultImage {
    /// Response body, displayed unmodified
    pub bytes: Bytes,
    /// Content-Type of the response, if the server sent one
    pub media_type: Option<String>,
    /// Pixel dimensions, None if the body could not be decoded
    pub dimensions: Option<(u32, u32)>,
    /// Wall time from sending the request to receiving the whole body
    pub elapsed: Duration,
    /// Handle for the result widget
    pub handle: Handle,
}

impl ResultImage {
    /// Wrap a response body
    pub fn new(bytes: Bytes, media_type: Option<String>, elapsed: Duration) -> Self {
        let dimensions = media::read_dimensions(&bytes);
        let handle = Handle::from_bytes(bytes.clone());

        Self {
            bytes,
            media_type,
            dimensions,
            elapsed,
            handle,
        }
    }

    /// One-line summary for the result caption
    pub fn summary(&self) -> String {
        format!(
            "{} · {:.1}s",
            describe("Heat map", self.bytes.len(), self.dimensions),
            self.elapsed.as_secs_f32()
        )
    }
}

fn describe(label: &str, len: usize, dimensions: Option<(u32, u32)>) -> String {
    match dimensions {
        Some((w, h)) => format!("{label} · {w}×{h} · {}", media::human_size(len)),
        None => format!("{label} · {}", media::human_size(len)),
    }
}

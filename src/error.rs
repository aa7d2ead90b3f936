/// Error types for the application
///
/// Every error here is `Clone` so it can travel inside iced messages.
/// Underlying I/O and HTTP errors are flattened to their display text.
use std::path::PathBuf;
use thiserror::Error;

/// Where a candidate image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Native file picker
    Picker,
    /// Dropped onto the window
    Drop,
}

/// Failure to accept a file as the selected image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("Please select a valid image file")]
    NotAnImage { origin: Origin, media_type: String },

    #[error("Failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
}

impl SelectError {
    /// Rejection for a file that does not carry an image media type
    pub fn not_an_image(origin: Origin, media_type: impl Into<String>) -> Self {
        SelectError::NotAnImage {
            origin,
            media_type: media_type.into(),
        }
    }

    /// Media type of a file rejected for not being an image
    pub fn media_type(&self) -> Option<&str> {
        match self {
            SelectError::NotAnImage { media_type, .. } => Some(media_type),
            SelectError::Read { .. } => None,
        }
    }

    /// User-facing message, worded for how the file arrived
    pub fn message(&self) -> String {
        match self {
            SelectError::NotAnImage { origin: Origin::Drop, .. } => {
                "Please drop a valid image file".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Failure of a detection attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("Please select an image first")]
    NoImage,

    #[error("A detection request is already in progress")]
    Busy,

    #[error("Invalid endpoint URL '{input}': {reason}")]
    InvalidEndpoint { input: String, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("Server error: {code} {reason}{}", .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Status {
        code: u16,
        reason: String,
        detail: Option<String>,
    },

    #[error("Server returned an empty response")]
    EmptyBody,
}

/// Failure to load settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Malformed settings file {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid endpoint URL '{input}': {reason}")]
    Endpoint { input: String, reason: String },
}

/// Anything that ends up in the error banner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("{}", .0.message())]
    Select(#[from] SelectError),

    #[error(transparent)]
    Detect(#[from] DetectError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_image_wording_follows_origin() {
        let picked = SelectError::not_an_image(Origin::Picker, "text/plain");
        let dropped = SelectError::not_an_image(Origin::Drop, "text/plain");

        assert_eq!(AppError::from(picked).to_string(), "Please select a valid image file");
        assert_eq!(AppError::from(dropped).to_string(), "Please drop a valid image file");
    }

    #[test]
    fn test_rejection_keeps_media_type() {
        let err = SelectError::not_an_image(Origin::Drop, "application/octet-stream");
        assert_eq!(err.media_type(), Some("application/octet-stream"));

        let read = SelectError::Read {
            path: PathBuf::from("gone.png"),
            reason: "No such file or directory".into(),
        };
        assert_eq!(read.media_type(), None);
    }

    #[test]
    fn test_status_message_carries_code_and_detail() {
        let plain = DetectError::Status {
            code: 500,
            reason: "Internal Server Error".into(),
            detail: None,
        };
        assert_eq!(plain.to_string(), "Server error: 500 Internal Server Error");

        let detailed = DetectError::Status {
            code: 400,
            reason: "Bad Request".into(),
            detail: Some("File must be an image".into()),
        };
        assert_eq!(
            detailed.to_string(),
            "Server error: 400 Bad Request (File must be an image)"
        );
    }
}

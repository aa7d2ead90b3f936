/// Application settings
///
/// Settings are resolved in layers, lowest precedence first:
/// - Built-in defaults (see `DEFAULT_ENDPOINT`)
/// - JSON settings file (`<config dir>/cell-inspector/settings.json` or `--config`)
/// - `CELL_INSPECTOR_ENDPOINT` environment variable / `--endpoint` flag (parsed by clap)
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Demo deployment of the heat-map inference service.
///
/// Used when neither the settings file, the environment nor the command line
/// names an endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://ai-powered-microscopic-cell-anomaly-gofs.onrender.com/generate-heatmap/";

/// Multipart field the service reads the upload from
pub const DEFAULT_FIELD_NAME: &str = "file";

/// Placeholder filename attached to every upload
pub const DEFAULT_UPLOAD_FILE_NAME: &str = "cell_image.png";

/// Resolved application settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Inference endpoint that receives the multipart POST
    pub endpoint: Url,
    /// Name of the multipart file field
    pub field_name: String,
    /// Filename sent with the file part
    pub upload_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL"),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            upload_file_name: DEFAULT_UPLOAD_FILE_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve settings from the settings file and an optional endpoint override.
    ///
    /// `explicit_path` is the `--config` flag. When it is `None` the default
    /// location is used and a missing file just means defaults.
    pub fn load(
        explicit_path: Option<&Path>,
        endpoint_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut settings = match explicit_path {
            Some(path) => Self::read_file(path)?,
            None => match default_settings_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(raw) = endpoint_override {
            settings.endpoint = parse_endpoint(raw).map_err(|reason| ConfigError::Endpoint {
                input: raw.to_string(),
                reason,
            })?;
        }

        // The file may carry any URL scheme; only http(s) can be POSTed to
        check_scheme(&settings.endpoint).map_err(|reason| ConfigError::Endpoint {
            input: settings.endpoint.to_string(),
            reason,
        })?;

        Ok(settings)
    }

    /// Read and parse a settings file
    pub fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_json(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Default location of the settings file
/// - Linux: ~/.config/cell-inspector/settings.json
/// - macOS: ~/Library/Application Support/cell-inspector/settings.json
/// - Windows: %APPDATA%\cell-inspector\settings.json
pub fn default_settings_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
    path.push("cell-inspector");
    path.push("settings.json");
    Some(path)
}

/// Parse user input into an absolute http(s) URL
pub fn parse_endpoint(input: &str) -> Result<Url, String> {
    let url = Url::parse(input.trim()).map_err(|e| e.to_string())?;
    check_scheme(&url)?;
    Ok(url)
}

fn check_scheme(url: &Url) -> Result<(), String> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{other}', expected http or https")),
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Flat directory where captured pictures are stored.
    pub pictures_folder: PathBuf,
    /// Capture inactivity before the idle slideshow starts.
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Duration,
    /// How long each picture stays up in idle mode.
    #[serde(with = "humantime_serde")]
    pub picture_duration: Duration,
    /// How far back the idle rotation reaches before wrapping.
    pub max_idle_pictures: usize,
    /// Extension (lowercase, no dot) the capture path writes and the
    /// filename classifier accepts.
    pub accepted_extension: String,
    /// Image shown while the pictures folder is empty. Must exist at startup.
    pub no_pictures_placeholder: PathBuf,
    /// Image shown after a failed capture attempt. Must exist at startup.
    pub camera_error_placeholder: PathBuf,
    /// Optional notice image describing the quarantine folder.
    pub invalid_format_placeholder: Option<PathBuf>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.idle_timeout > Duration::ZERO,
            "idle-timeout must be positive"
        );
        ensure!(
            self.picture_duration > Duration::ZERO,
            "picture-duration must be positive"
        );
        ensure!(
            self.max_idle_pictures > 0,
            "max-idle-pictures must be greater than zero"
        );
        ensure!(
            !self.accepted_extension.is_empty()
                && self
                    .accepted_extension
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric()),
            "accepted-extension must be a bare extension like \"png\""
        );
        Ok(self)
    }

    /// Sibling directory that the quarantine pass relocates invalid files into.
    pub fn quarantine_folder(&self) -> PathBuf {
        let name = self
            .pictures_folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pictures".to_owned());
        self.pictures_folder
            .with_file_name(format!("{name}-non_valid_format"))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            pictures_folder: PathBuf::from("pictures"),
            idle_timeout: Duration::from_secs(4),
            picture_duration: Duration::from_secs(1),
            max_idle_pictures: 10,
            accepted_extension: "png".to_owned(),
            no_pictures_placeholder: PathBuf::from("default/no_pictures.png"),
            camera_error_placeholder: PathBuf::from("default/camera_error.png"),
            invalid_format_placeholder: None,
        }
    }
}

//! Flat-folder listing and timestamp file names for stored pictures.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use walkdir::WalkDir;

/// List every file directly inside `folder`, sorted ascending by name.
///
/// The fixed-width timestamp names make lexicographic order chronological,
/// so the last entry is always the most recent capture. A missing folder
/// yields an empty listing; that is the normal first-run state, not an
/// error. Foreign names are included deliberately so the presenter
/// tolerates them until a quarantine pass runs.
pub fn list_pictures(folder: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    out.sort();
    out
}

/// File name the capture path writes for a photo taken at `t`.
///
/// Round trip: every name produced here passes
/// [`crate::classify::is_valid_name`] for the same extension.
pub fn timestamp_name(t: DateTime<Local>, ext: &str) -> String {
    format!("{}.{}", t.format("%Y-%m-%d-%H-%M-%S"), ext)
}

//! Filename validity classification and the quarantine pass.
//!
//! Classification separates machine-generated capture names from foreign
//! files that ended up in the pictures folder. Invalid names are relocated,
//! never deleted, and the pass runs only on demand, not per tick.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Error;
use crate::scan;

/// True iff `name` is something the capture path could have produced: the
/// accepted extension plus a stem of exactly six hyphen-separated all-digit
/// segments (`YYYY-MM-DD-HH-MM-SS`).
///
/// Segment values are not range-checked (a month of `99` passes). The
/// classifier only has to tell generated names from accidental files, not
/// validate calendars.
pub fn is_valid_name(name: &str, ext: &str) -> bool {
    let Some(stem) = name
        .strip_suffix(ext)
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };
    let mut segments = 0usize;
    for segment in stem.split('-') {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        segments += 1;
    }
    segments == 6
}

/// Move every invalidly named entry in `folder` into `quarantine`, creating
/// that directory the first time something actually needs to move.
///
/// Returns the number of relocated files. Re-running with nothing new to
/// move is a no-op, and nothing is ever deleted.
pub fn quarantine_invalid_pictures(
    folder: &Path,
    quarantine: &Path,
    ext: &str,
) -> Result<usize, Error> {
    let mut moved = 0usize;
    for path in scan::list_pictures(folder) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_valid_name(name, ext) {
            continue;
        }
        fs::create_dir_all(quarantine)?;
        let dest = quarantine_destination(quarantine, name);
        debug!(from = %path.display(), to = %dest.display(), "relocating invalid name");
        fs::rename(&path, &dest)?;
        moved += 1;
    }
    if moved > 0 {
        info!(moved, folder = %folder.display(), "quarantine pass relocated files");
    }
    Ok(moved)
}

/// Pick a destination inside `quarantine` that keeps the original name when
/// free and appends a counter when a previous pass already parked a file
/// under it. Renaming over an occupied name would destroy the earlier file.
fn quarantine_destination(quarantine: &Path, name: &str) -> PathBuf {
    let mut dest = quarantine.join(name);
    let mut n = 1u32;
    while dest.exists() {
        dest = quarantine.join(format!("{name}.{n}"));
        n += 1;
    }
    dest
}

//! Camera collaborator boundary and capture persistence.
//!
//! The crate ships no hardware driver; the kiosk frontend owns the concrete
//! device and implements [`CaptureSource`] over it. What lives here is the
//! seam, the timestamp-named persistence of captured frames, and the
//! one-shot trigger path that reports the outcome to the presenter.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local};
use image::RgbImage;
use tracing::{info, warn};

use crate::config::Configuration;
use crate::error::Error;
use crate::presenter::{Presenter, RenderTarget};
use crate::scan;

/// A source of captured frames.
pub trait CaptureSource {
    /// Grab a single frame from the device.
    fn capture_frame(&mut self) -> Result<RgbImage>;
}

/// Persist a captured frame under its timestamp name inside `folder`.
pub fn store_capture(
    folder: &Path,
    frame: &RgbImage,
    taken_at: DateTime<Local>,
    ext: &str,
) -> Result<PathBuf, Error> {
    let path = folder.join(scan::timestamp_name(taken_at, ext));
    frame.save(&path)?;
    info!(path = %path.display(), "stored capture");
    Ok(path)
}

/// Run one user-triggered capture attempt end to end: grab a frame, store
/// it, and report the outcome to the presenter exactly once.
///
/// Failures are non-fatal. A failed grab or save leaves the folder alone
/// and surfaces as the presenter's camera-error frame until the user tries
/// again or the kiosk goes idle.
pub fn trigger_capture<S, T>(
    source: &mut S,
    presenter: &mut Presenter<T>,
    cfg: &Configuration,
) -> Option<PathBuf>
where
    S: CaptureSource,
    T: RenderTarget,
{
    let stored = match source.capture_frame() {
        Ok(frame) => {
            match store_capture(
                &cfg.pictures_folder,
                &frame,
                Local::now(),
                &cfg.accepted_extension,
            ) {
                Ok(path) => Some(path),
                Err(err) => {
                    warn!(error = %err, "storing capture failed");
                    None
                }
            }
        }
        Err(err) => {
            warn!(error = %err, "capture failed");
            None
        }
    };
    presenter.report_capture_outcome(stored.is_some());
    stored
}

//! Picture-presentation state machine.
//!
//! The presenter is level-triggered: every tick it re-derives what belongs
//! on screen from the folder contents and elapsed time, rather than keeping
//! an edge-triggered transition log. Missed ticks therefore never need
//! reconciling; the next tick simply computes the right frame again.

use std::path::PathBuf;
use std::time::Instant;

use image::RgbaImage;
use image::imageops::FilterType;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::error::Error;
use crate::scan;

/// Abstract drawable surface the presenter blits into each tick.
///
/// The windowing system behind it is someone else's concern; the presenter
/// only needs the current size and a way to place pixels.
pub trait RenderTarget {
    /// Current drawable size in pixels (width, height).
    fn size(&self) -> (u32, u32);
    /// Draw `image` with its top-left corner at `origin`.
    fn blit(&mut self, image: &RgbaImage, origin: (u32, u32));
}

/// What a single tick decided to put on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Folder is empty; show the fixed placeholder.
    NoPictures,
    /// Last reported capture failed; show the camera-failure placeholder.
    CameraError,
    /// Show the most recent capture.
    Latest(PathBuf),
    /// Idle slideshow, rotating backward through history.
    IdleCycle(PathBuf),
}

/// Owns all display timing state and the per-tick render decision.
///
/// All mutation happens on the tick thread, except
/// [`Presenter::report_capture_outcome`] which the trigger handler calls
/// once per capture attempt.
#[derive(Debug)]
pub struct Presenter<T: RenderTarget> {
    cfg: Configuration,
    target: T,
    idle: bool,
    picture_index: usize,
    last_picture_time: Instant,
    last_idle_picture_time: Instant,
    camera_error: bool,
}

impl<T: RenderTarget> Presenter<T> {
    /// Build a presenter over `target`.
    ///
    /// Creates the pictures folder when absent (an empty folder is the
    /// normal first-run state). Fails when the folder path exists but is
    /// not a directory, or when any configured placeholder image is
    /// missing; the kiosk cannot start without something to show.
    pub fn new(cfg: Configuration, target: T, now: Instant) -> Result<Self, Error> {
        if cfg.pictures_folder.exists() && !cfg.pictures_folder.is_dir() {
            return Err(Error::NotADirectory(cfg.pictures_folder.clone()));
        }
        std::fs::create_dir_all(&cfg.pictures_folder)?;

        let mut required = vec![
            cfg.no_pictures_placeholder.clone(),
            cfg.camera_error_placeholder.clone(),
        ];
        if let Some(notice) = &cfg.invalid_format_placeholder {
            required.push(notice.clone());
        }
        for placeholder in required {
            if !placeholder.is_file() {
                return Err(Error::MissingPlaceholder(placeholder));
            }
        }

        Ok(Self {
            cfg,
            target,
            idle: false,
            picture_index: 0,
            last_picture_time: now,
            last_idle_picture_time: now,
            camera_error: false,
        })
    }

    /// Record the outcome of a user-triggered capture attempt.
    ///
    /// Must be called exactly once per attempt, success or failure. This is
    /// the only mutation entrypoint outside the tick.
    pub fn report_capture_outcome(&mut self, succeeded: bool) {
        self.record_capture(succeeded, Instant::now());
    }

    /// [`Presenter::report_capture_outcome`] with an explicit clock.
    pub fn record_capture(&mut self, succeeded: bool, now: Instant) {
        self.camera_error = !succeeded;
        self.picture_index = 0;
        self.last_picture_time = now;
        debug!(succeeded, "capture attempt recorded");
    }

    /// Per-frame entrypoint: pick a frame and draw it to the render target.
    pub fn decide_and_render(&mut self) {
        self.render_tick(Instant::now());
    }

    /// [`Presenter::decide_and_render`] with an explicit clock.
    pub fn render_tick(&mut self, now: Instant) {
        let pictures = scan::list_pictures(&self.cfg.pictures_folder);
        let frame = self.decide(now, &pictures);
        self.render(&frame);
    }

    /// Pick the frame for this tick, in priority order: empty folder,
    /// camera error, latest capture, idle rotation.
    ///
    /// `pictures` is the current folder listing, sorted ascending by name.
    pub fn decide(&mut self, now: Instant, pictures: &[PathBuf]) -> Frame {
        let was_idle = self.idle;
        self.idle = now.duration_since(self.last_picture_time) > self.cfg.idle_timeout;
        if self.idle && !was_idle {
            // Idle always shows slideshow content, never the error frame,
            // and the rotation restarts from the most recent capture.
            self.camera_error = false;
            self.last_idle_picture_time = now;
        }

        if pictures.is_empty() {
            return Frame::NoPictures;
        }
        if self.camera_error {
            return Frame::CameraError;
        }
        if !self.idle {
            return Frame::Latest(pictures[pictures.len() - 1].clone());
        }

        if now.duration_since(self.last_idle_picture_time) > self.cfg.picture_duration {
            self.picture_index += 1;
            if self.picture_index >= self.cfg.max_idle_pictures
                || self.picture_index >= pictures.len()
            {
                self.picture_index = 0;
            }
            self.last_idle_picture_time = now;
        }
        // The folder can shrink between advance points; never index past
        // the oldest entry.
        let index = self.picture_index.min(pictures.len() - 1);
        Frame::IdleCycle(pictures[pictures.len() - 1 - index].clone())
    }

    /// Draw the chosen frame, scaled to exactly fill the target.
    fn render(&mut self, frame: &Frame) {
        let path = match frame {
            Frame::NoPictures => self.cfg.no_pictures_placeholder.clone(),
            Frame::CameraError => self.cfg.camera_error_placeholder.clone(),
            Frame::Latest(p) | Frame::IdleCycle(p) => p.clone(),
        };
        let (width, height) = self.target.size();
        match image::open(&path) {
            Ok(img) => {
                // Fill exactly; aspect ratio is deliberately not preserved,
                // and nothing is cached across ticks.
                let scaled = img.resize_exact(width, height, FilterType::Triangle);
                self.target.blit(&scaled.to_rgba8(), (0, 0));
            }
            Err(err) => {
                // A foreign file can be the chosen entry until a quarantine
                // pass runs; that must never take the kiosk down.
                warn!(path = %path.display(), error = %err, "skipping undecodable picture");
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn camera_error(&self) -> bool {
        self.camera_error
    }

    pub fn picture_index(&self) -> usize {
        self.picture_index
    }

    pub fn config(&self) -> &Configuration {
        &self.cfg
    }

    /// Consume the presenter and return the render target, e.g. to read
    /// back an offscreen buffer.
    pub fn into_target(self) -> T {
        self.target
    }
}

/// Software render target backed by an RGBA pixel buffer.
///
/// Used by the `preview` command and by tests; real kiosk frontends
/// implement [`RenderTarget`] over their display surface instead.
pub struct BufferTarget {
    pixels: RgbaImage,
}

impl BufferTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

impl RenderTarget for BufferTarget {
    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn blit(&mut self, image: &RgbaImage, origin: (u32, u32)) {
        image::imageops::replace(
            &mut self.pixels,
            image,
            i64::from(origin.0),
            i64::from(origin.1),
        );
    }
}

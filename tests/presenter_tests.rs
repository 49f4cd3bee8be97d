use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use exhibit_kiosk::config::Configuration;
use exhibit_kiosk::error::Error;
use exhibit_kiosk::presenter::{Presenter, RenderTarget};
use image::RgbaImage;
use tempfile::{TempDir, tempdir};

/// Render target that records every blit instead of drawing.
#[derive(Debug, Default)]
struct RecordingTarget {
    size: (u32, u32),
    blits: Vec<((u32, u32), (u32, u32))>,
}

impl RecordingTarget {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            blits: Vec::new(),
        }
    }
}

impl RenderTarget for RecordingTarget {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn blit(&mut self, image: &RgbaImage, origin: (u32, u32)) {
        self.blits.push((image.dimensions(), origin));
    }
}

fn write_png(path: &Path) {
    RgbaImage::new(2, 2).save(path).unwrap();
}

fn kiosk_config(tmp: &TempDir) -> Configuration {
    let cfg = Configuration {
        pictures_folder: tmp.path().join("pictures"),
        no_pictures_placeholder: tmp.path().join("no_pictures.png"),
        camera_error_placeholder: tmp.path().join("camera_error.png"),
        ..Configuration::default()
    };
    write_png(&cfg.no_pictures_placeholder);
    write_png(&cfg.camera_error_placeholder);
    cfg
}

#[test]
fn construction_creates_the_pictures_folder() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    assert!(!cfg.pictures_folder.exists());

    let presenter = Presenter::new(cfg, RecordingTarget::new(8, 8), Instant::now()).unwrap();
    assert!(presenter.config().pictures_folder.is_dir());
}

#[test]
fn construction_rejects_a_file_at_the_folder_path() {
    let tmp = tempdir().unwrap();
    let mut cfg = kiosk_config(&tmp);
    cfg.pictures_folder = tmp.path().join("pictures");
    fs::write(&cfg.pictures_folder, b"not a directory").unwrap();

    let err = Presenter::new(cfg, RecordingTarget::new(8, 8), Instant::now()).unwrap_err();
    assert!(matches!(err, Error::NotADirectory(_)));
}

#[test]
fn construction_fails_without_required_placeholders() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    fs::remove_file(&cfg.camera_error_placeholder).unwrap();

    let err = Presenter::new(cfg, RecordingTarget::new(8, 8), Instant::now()).unwrap_err();
    match err {
        Error::MissingPlaceholder(path) => {
            assert!(path.ends_with("camera_error.png"));
        }
        other => panic!("expected MissingPlaceholder, got {other}"),
    }
}

#[test]
fn construction_fails_when_configured_notice_is_missing() {
    let tmp = tempdir().unwrap();
    let mut cfg = kiosk_config(&tmp);
    cfg.invalid_format_placeholder = Some(tmp.path().join("notice.png"));

    let err = Presenter::new(cfg, RecordingTarget::new(8, 8), Instant::now()).unwrap_err();
    assert!(matches!(err, Error::MissingPlaceholder(_)));
}

#[test]
fn empty_folder_renders_the_placeholder_scaled() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    let t0 = Instant::now();
    let mut presenter = Presenter::new(cfg, RecordingTarget::new(64, 48), t0).unwrap();

    presenter.render_tick(t0 + Duration::from_millis(16));

    let target = presenter.into_target();
    assert_eq!(target.blits, vec![((64, 48), (0, 0))]);
}

#[test]
fn latest_capture_renders_scaled_to_target() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    let t0 = Instant::now();
    let mut presenter = Presenter::new(cfg, RecordingTarget::new(64, 48), t0).unwrap();
    write_png(
        &presenter
            .config()
            .pictures_folder
            .join("2024-01-01-12-00-00.png"),
    );

    presenter.render_tick(t0 + Duration::from_millis(16));

    let target = presenter.into_target();
    // Scaled to fill the target exactly, drawn at the origin.
    assert_eq!(target.blits, vec![((64, 48), (0, 0))]);
}

#[test]
fn failed_capture_renders_error_until_idle() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    let t0 = Instant::now();
    let mut presenter = Presenter::new(cfg, RecordingTarget::new(16, 16), t0).unwrap();
    write_png(
        &presenter
            .config()
            .pictures_folder
            .join("2024-01-01-12-00-00.png"),
    );

    presenter.record_capture(false, t0);
    presenter.render_tick(t0 + Duration::from_secs(1));
    assert!(presenter.camera_error());
    assert!(!presenter.is_idle());

    // Past the idle timeout the error is dropped in favor of the slideshow.
    presenter.render_tick(t0 + Duration::from_secs(10));
    assert!(presenter.is_idle());
    assert!(!presenter.camera_error());

    let target = presenter.into_target();
    assert_eq!(target.blits.len(), 2);
}

#[test]
fn undecodable_entry_is_skipped_without_failing_the_tick() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    let t0 = Instant::now();
    let mut presenter = Presenter::new(cfg, RecordingTarget::new(16, 16), t0).unwrap();
    fs::write(
        presenter.config().pictures_folder.join("notes.txt"),
        b"not an image",
    )
    .unwrap();

    // notes.txt sorts last and is chosen as the latest entry; the tick must
    // survive the decode failure and simply draw nothing.
    presenter.render_tick(t0 + Duration::from_millis(16));

    let target = presenter.into_target();
    assert!(target.blits.is_empty());
}

#[test]
fn idle_slideshow_walks_through_stored_captures() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    let t0 = Instant::now();
    let mut presenter = Presenter::new(cfg, RecordingTarget::new(16, 16), t0).unwrap();
    for name in [
        "2024-01-01-12-00-00.png",
        "2024-01-01-12-00-01.png",
        "2024-01-01-12-00-02.png",
    ] {
        write_png(&presenter.config().pictures_folder.join(name));
    }

    let idle_at = t0 + Duration::from_secs(10);
    let step = Duration::from_millis(1100);

    presenter.render_tick(idle_at);
    assert_eq!(presenter.picture_index(), 0);
    presenter.render_tick(idle_at + step);
    assert_eq!(presenter.picture_index(), 1);
    presenter.render_tick(idle_at + step * 2);
    assert_eq!(presenter.picture_index(), 2);
    // Wrap back to the most recent capture.
    presenter.render_tick(idle_at + step * 3);
    assert_eq!(presenter.picture_index(), 0);

    let target = presenter.into_target();
    assert_eq!(target.blits.len(), 4);
}

#[test]
fn every_tick_picks_exactly_one_branch() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    let t0 = Instant::now();
    let mut presenter = Presenter::new(cfg, RecordingTarget::new(8, 8), t0).unwrap();
    write_png(
        &presenter
            .config()
            .pictures_folder
            .join("2024-01-01-12-00-00.png"),
    );

    // Drive the tick across every timing regime; each tick blits at most
    // once and never panics.
    presenter.record_capture(false, t0);
    for ms in [0u64, 500, 1_000, 4_500, 5_600, 6_700, 60_000] {
        presenter.render_tick(t0 + Duration::from_millis(ms));
        assert!(!(presenter.is_idle() && presenter.camera_error()));
    }
    let target = presenter.into_target();
    assert_eq!(target.blits.len(), 7);
}

fn stored(folder: &Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| folder.join(n)).collect()
}

#[test]
fn decide_priority_prefers_empty_folder_over_error() {
    let tmp = tempdir().unwrap();
    let cfg = kiosk_config(&tmp);
    let t0 = Instant::now();
    let mut presenter = Presenter::new(cfg, RecordingTarget::new(8, 8), t0).unwrap();
    let folder = presenter.config().pictures_folder.clone();

    presenter.record_capture(false, t0);
    let frame = presenter.decide(t0 + Duration::from_secs(1), &[]);
    assert_eq!(frame, exhibit_kiosk::Frame::NoPictures);

    // With entries present the error takes over.
    let frame = presenter.decide(
        t0 + Duration::from_secs(2),
        &stored(&folder, &["2024-01-01-12-00-00.png"]),
    );
    assert_eq!(frame, exhibit_kiosk::Frame::CameraError);
}

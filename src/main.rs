//! Binary entrypoint for the exhibit kiosk maintenance CLI.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use exhibit_kiosk::config::Configuration;
use exhibit_kiosk::presenter::{BufferTarget, Presenter};
use exhibit_kiosk::{classify, scan};

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "exhibit-kiosk", about = "Photo-exhibit kiosk maintenance tools")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Relocate invalidly named files into the quarantine folder
    Quarantine,
    /// Validate the configuration and report folder statistics
    Check,
    /// Run one render tick offscreen and write the frame to a PNG
    Preview {
        /// Output path for the rendered frame
        #[arg(short, long, value_name = "FILE", default_value = "preview.png")]
        out: PathBuf,

        /// Offscreen target width in pixels
        #[arg(long, default_value_t = 1920)]
        width: u32,

        /// Offscreen target height in pixels
        #[arg(long, default_value_t = 1080)]
        height: u32,
    },
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("exhibit_kiosk={}", level).parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = Configuration::from_yaml_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?
        .validated()
        .context("validating configuration")?;

    match cli.command {
        Command::Quarantine => quarantine(&cfg),
        Command::Check => check(&cfg),
        Command::Preview { out, width, height } => preview(cfg, &out, width, height),
    }
}

fn quarantine(cfg: &Configuration) -> Result<()> {
    let moved = classify::quarantine_invalid_pictures(
        &cfg.pictures_folder,
        &cfg.quarantine_folder(),
        &cfg.accepted_extension,
    )
    .context("running quarantine pass")?;
    info!(
        moved,
        quarantine = %cfg.quarantine_folder().display(),
        "quarantine pass finished"
    );
    Ok(())
}

fn check(cfg: &Configuration) -> Result<()> {
    for placeholder in [&cfg.no_pictures_placeholder, &cfg.camera_error_placeholder]
        .into_iter()
        .chain(cfg.invalid_format_placeholder.as_ref())
    {
        if placeholder.is_file() {
            info!(path = %placeholder.display(), "placeholder present");
        } else {
            warn!(path = %placeholder.display(), "placeholder missing");
        }
    }

    let pictures = scan::list_pictures(&cfg.pictures_folder);
    let invalid = pictures
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .filter(|name| !classify::is_valid_name(name, &cfg.accepted_extension))
        .count();
    info!(
        folder = %cfg.pictures_folder.display(),
        total = pictures.len(),
        invalid,
        idle_timeout = %humantime::format_duration(cfg.idle_timeout),
        picture_duration = %humantime::format_duration(cfg.picture_duration),
        "folder status"
    );
    if let Some(latest) = pictures.last() {
        info!(path = %latest.display(), "most recent capture");
    }
    Ok(())
}

fn preview(cfg: Configuration, out: &std::path::Path, width: u32, height: u32) -> Result<()> {
    let target = BufferTarget::new(width, height);
    let mut presenter =
        Presenter::new(cfg, target, Instant::now()).context("constructing presenter")?;
    presenter.decide_and_render();
    presenter
        .into_target()
        .into_image()
        .save(out)
        .with_context(|| format!("writing preview to {}", out.display()))?;
    info!(path = %out.display(), "preview frame written");
    Ok(())
}

//! Command-line interface for inspecting repro bundles.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::bundle::{BundleDir, validate_bundle};
use crate::config::ViewerConfig;
use crate::ingest::{LogFilter, normalize_frames, normalize_inputs, parse_log_text};
use crate::model::{FrameSummary, LogLevel, MouseEventKind};
use crate::playback::ViewerSession;
use crate::timeline::KeyHoldSegment;
use crate::util::format::{format_bytes, format_duration, format_time_ms};

#[derive(Debug, Parser)]
#[command(name = "reproscope", version, about = "Inspect recorded QA repro bundles")]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a digest of a bundle: session info, frame stats, input timeline.
    Inspect {
        /// Path to the bundle directory.
        bundle: PathBuf,
        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Check a bundle for internal consistency.
    Validate {
        /// Path to the bundle directory.
        bundle: PathBuf,
        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the engine log stream, optionally filtered.
    Logs {
        /// Path to the bundle directory.
        bundle: PathBuf,
        /// Keep only these levels.
        #[arg(long, value_delimiter = ',')]
        level: Vec<LevelArg>,
        /// Keep only this exact category.
        #[arg(long)]
        category: Option<String>,
        /// Keep only messages containing this text (case-insensitive).
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Verbose,
    Log,
    Warning,
    Error,
}

impl From<LevelArg> for LogLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Verbose => LogLevel::Verbose,
            LevelArg::Log => LogLevel::Log,
            LevelArg::Warning => LogLevel::Warning,
            LevelArg::Error => LogLevel::Error,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Inspect { bundle, json } => inspect(&bundle, json),
        Command::Validate { bundle, json } => validate(&bundle, json),
        Command::Logs {
            bundle,
            level,
            category,
            search,
        } => logs(&bundle, level, category, search),
    }
}

/// Everything `inspect --json` emits about a bundle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectDigest {
    bundle_id: String,
    map_name: String,
    platform: String,
    duration_ms: f64,
    frame_summary: FrameSummary,
    key_hold_segments: Vec<KeyHoldSegment>,
    mouse_click_count: usize,
    gamepad_press_count: usize,
    log_entry_count: usize,
    log_categories: Vec<String>,
}

fn load_session(path: &Path) -> Result<(BundleDir, ViewerSession)> {
    let config = ViewerConfig::load();
    let bundle = BundleDir::open(path)?;

    let inputs = normalize_inputs(bundle.read_inputs()?);
    let frames = normalize_frames(bundle.read_frames()?, config.target_fps);
    let logs = match bundle.read_log_text()? {
        Some(text) => parse_log_text(&text),
        None => Default::default(),
    };

    let session = ViewerSession::new(bundle.manifest().duration_ms(), inputs, frames, logs);
    Ok((bundle, session))
}

fn inspect(path: &Path, json: bool) -> Result<()> {
    let (bundle, session) = load_session(path)?;
    let manifest = bundle.manifest();

    if json {
        let digest = InspectDigest {
            bundle_id: manifest.bundle_id.clone(),
            map_name: manifest.map_name().to_string(),
            platform: format!("{:?}", manifest.platform()),
            duration_ms: manifest.duration_ms(),
            frame_summary: session.frames().summary,
            key_hold_segments: session.segments().to_vec(),
            mouse_click_count: mouse_click_count(&session),
            gamepad_press_count: gamepad_press_count(&session),
            log_entry_count: session.logs().entries.len(),
            log_categories: session.logs().categories.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&digest)?);
        return Ok(());
    }

    println!("Bundle: {}", manifest.bundle_id);
    if !manifest.map_name().is_empty() {
        println!("  Map: {}", manifest.map_name());
    }
    println!("  Platform: {:?}", manifest.platform());
    if let Some(captured) = manifest.timestamp() {
        println!("  Captured: {}", captured.to_rfc3339());
    }
    println!(
        "  Duration: {} ({:.1}ms)",
        format_duration(manifest.duration_ms()),
        manifest.duration_ms()
    );
    if let Some(video) = bundle.video_artifact() {
        let size = video
            .size_bytes
            .map(format_bytes)
            .unwrap_or_else(|| "unknown size".to_string());
        println!(
            "  Video: {} ({}), {} frames",
            video.filename, size, manifest.total_frames
        );
    }

    let summary = &session.frames().summary;
    println!(
        "\nFrames: avg {:.1} FPS, min {:.1}, max {:.1}, worst frame {:.1}ms, stutters {}",
        summary.avg_fps,
        summary.min_fps,
        summary.max_fps,
        summary.p99_frame_time_ms,
        summary.stutter_count
    );

    if session.segments().is_empty() {
        println!("\nNo keyboard input recorded.");
    } else {
        println!("\nKey holds ({}):", session.segments().len());
        for segment in session.segments() {
            let keys: Vec<&str> = segment.keys.iter().map(String::as_str).collect();
            println!(
                "  [{} - {}] {}",
                format_time_ms(segment.start_ms),
                format_time_ms(segment.end_ms),
                keys.join(" + ")
            );
        }
    }

    println!(
        "\nMouse clicks: {}, gamepad presses: {}",
        mouse_click_count(&session),
        gamepad_press_count(&session)
    );
    println!(
        "Logs: {} entries, categories: {}",
        session.logs().entries.len(),
        if session.logs().categories.is_empty() {
            "none".to_string()
        } else {
            session.logs().categories.join(", ")
        }
    );

    Ok(())
}

fn mouse_click_count(session: &ViewerSession) -> usize {
    session
        .inputs()
        .mouse
        .iter()
        .filter(|m| m.kind == MouseEventKind::Down)
        .count()
}

fn gamepad_press_count(session: &ViewerSession) -> usize {
    session.inputs().gamepad.iter().filter(|g| g.is_press()).count()
}

fn validate(path: &Path, json: bool) -> Result<()> {
    let bundle = BundleDir::open(path)?;
    let report = validate_bundle(&bundle);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    if !report.valid {
        bail!("bundle failed validation");
    }
    Ok(())
}

fn logs(
    path: &Path,
    level: Vec<LevelArg>,
    category: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let bundle = BundleDir::open(path)?;
    let Some(text) = bundle.read_log_text()? else {
        println!("No log artifact in bundle.");
        return Ok(());
    };

    let data = parse_log_text(&text);
    let filter = LogFilter {
        levels: if level.is_empty() {
            None
        } else {
            Some(level.into_iter().map(LogLevel::from).collect())
        },
        category,
        search,
    };

    for entry in filter.apply(&data.entries) {
        println!(
            "[{}|{}] {}: {}",
            format_time_ms(entry.timestamp_ms),
            entry.level,
            entry.category,
            entry.message
        );
    }
    Ok(())
}

//! Turret controller fed by a detection recording.
//!
//! ```text
//! turret --config turret.toml --replay run.json
//! turret --replay run.json --dry-run --log turret_track=debug
//! ```
//!
//! A replay run is finite: it stops at the end of the recording or after
//! `--max-frames`. No signal handler is installed, so Ctrl-C terminates the
//! process immediately rather than between frames; at most one frame's
//! datagrams are lost, and the firmware keeps its last state.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use turret_track::integration::{ReplayDetector, ReplayFrames, load_replay};
use turret_track::{CommandLink, MemoryLink, TrackerPipeline, TurretConfig, UdpCommandLink};

/// Drive the turret from recorded detections.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML config file; built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON detection recording to replay.
    #[arg(long)]
    replay: PathBuf,
    /// Override the actuator host.
    #[arg(long)]
    host: Option<String>,
    /// Override the actuator UDP port.
    #[arg(long)]
    port: Option<u16>,
    /// Override the target class id.
    #[arg(long)]
    target_class: Option<u32>,
    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,
    /// Print commands instead of sending them.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Log filter, e.g. `turret_track=debug`. Falls back to RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("turret_track=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => TurretConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TurretConfig::default(),
    };
    if let Some(host) = args.host.clone() {
        config.link.host = host;
    }
    if let Some(port) = args.port {
        config.link.port = port;
    }
    if let Some(class) = args.target_class {
        config.tracking.target_class = class;
    }
    config.validate().context("invalid configuration")?;

    let (mut frames, detector) = load_replay(&args.replay)
        .with_context(|| format!("cannot open frame source {}", args.replay.display()))?;
    info!(
        frames = frames.len(),
        target_class = config.tracking.target_class,
        "replay loaded"
    );

    // Never raised here; library callers share it behind an `Arc`.
    let stop = AtomicBool::new(false);

    if args.dry_run {
        let pipeline = run(&config, &args, detector, MemoryLink::new(), &mut frames, &stop);
        for command in pipeline.link().sent() {
            println!("{command}");
        }
    } else {
        let link = UdpCommandLink::connect(&config.link.host, config.link.port)
            .context("opening command link")?;
        info!(target = %link.target(), "sending commands");
        run(&config, &args, detector, link, &mut frames, &stop);
    }

    Ok(())
}

fn run<L: CommandLink>(
    config: &TurretConfig,
    args: &Args,
    detector: ReplayDetector,
    link: L,
    frames: &mut ReplayFrames,
    stop: &AtomicBool,
) -> TrackerPipeline<ReplayDetector, L> {
    let mut pipeline = TrackerPipeline::new(detector, link, config.tracker_config());
    if let Some(limit) = args.max_frames {
        pipeline = pipeline.with_frame_limit(limit);
    }
    pipeline.run(frames, stop);
    pipeline
}

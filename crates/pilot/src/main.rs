//! Line Follower - Main Entry Point
//!
//! Usage: `line-follower [config.toml]`

use std::path::PathBuf;

use anyhow::{bail, Context};
use camera_capture::{CaptureService, FrameSource, ImageSequenceSource};
use motion::SimulatedMotors;
use obstacle_monitor::FixedDistance;
use pilot::{init_logging, ControlLoop, PilotConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = PilotConfig::load(config_path.as_deref()).context("loading configuration")?;
    init_logging(&config.log_level)?;

    info!("=== Line Follower v{} ===", env!("CARGO_PKG_VERSION"));

    let calibration = config.load_calibration().context("loading calibration")?;

    let Some(frames_dir) = config.camera.frames_dir.clone() else {
        bail!("camera.frames_dir is not set; no camera source available");
    };
    let replay = ImageSequenceSource::open(&frames_dir)
        .with_context(|| format!("opening frames in {}", frames_dir.display()))?
        .with_size(config.camera.width, config.camera.height)
        .looping(config.camera.loop_frames);

    let (capture, source): (Option<CaptureService>, Box<dyn FrameSource + Send>) = if config.camera.threaded {
        let (service, latest) = CaptureService::spawn(replay, config.camera.fps);
        (Some(service), Box::new(latest))
    } else {
        (None, Box::new(replay))
    };

    let sensor = FixedDistance::new(config.bench_distance_cm)?;
    let mut pilot = ControlLoop::new(&config, calibration, source, sensor, SimulatedMotors::new())?;

    let result = pilot
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    // Motors are released before the camera
    drop(pilot);
    drop(capture);

    let outcome = result?;
    info!("Line follower exited: {:?}", outcome);
    Ok(())
}

//! GenICam Video CLI
//!
//! Command-line interface for exercising the camera lifecycle and
//! acquisition loop against the built-in mock SDK.

use clap::Parser;
use genicam_video::{CameraConfig, ChannelSink, FileConfig, MockSdk, VideoCamera};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Drive a (mock) GenICam camera and report delivered frames.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Device identifier (overrides the config file).
    #[arg(short, long)]
    device: Option<String>,

    /// Minimum inter-frame interval in seconds (overrides the config file).
    #[arg(short, long)]
    interval: Option<f64>,

    /// Exposure time to set before acquiring, in seconds.
    #[arg(short, long)]
    exposure: Option<f64>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("GenICam Video v{}", genicam_video::VERSION);
    info!("This is a demonstration using the mock camera SDK");

    let mut file_config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                std::process::exit(1);
            }
        },
        None => FileConfig {
            camera: CameraConfig::for_device("mock-cam-0"),
            ..Default::default()
        },
    };
    if let Some(device) = args.device {
        file_config.camera.device_id = device;
    }
    if let Some(interval) = args.interval {
        file_config.camera.min_interval = interval;
    }

    let delivery = file_config.delivery.clone();
    let (sink, frames) = ChannelSink::bounded(delivery.queue_depth);

    // The mock SDK discovers whatever device the config names and
    // produces frames at ~100 fps; delivery is bounded by the
    // configured minimum interval.
    let sdk = MockSdk::new()
        .with_devices(vec![file_config.camera.device_id.clone()])
        .with_frame_period(Duration::from_millis(10));
    let mut camera = match VideoCamera::new(sdk, file_config.camera, sink) {
        Ok(camera) => camera,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = camera.open() {
        eprintln!("Failed to open camera: {e}");
        std::process::exit(1);
    }

    if let Some(exposure) = args.exposure {
        match camera.set_exposure_time(exposure) {
            Ok(()) => info!("Exposure time set to {exposure} s"),
            Err(e) => warn!("Failed to set exposure time: {e}"),
        }
    }

    // Ctrl-C ends a continuous run
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || stop_flag.store(true, Ordering::Release)) {
        warn!("Failed to install Ctrl-C handler: {e}");
    }

    info!("Receiving frames...");

    let mut received: u64 = 0;
    while !stop.load(Ordering::Acquire) {
        match frames.recv_timeout(Duration::from_millis(200)) {
            Ok(frame) => {
                received += 1;
                info!(
                    "Frame {} ({}x{}, seq {})",
                    received,
                    frame.width(),
                    frame.height(),
                    frame.sequence()
                );
                if !delivery.continuous && received >= u64::from(delivery.frame_count) {
                    break;
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    match camera.get_exposure_time() {
        Ok(exposure) => info!("Final exposure time: {exposure} s"),
        Err(e) => warn!("Could not read exposure time: {e}"),
    }

    camera.close();
    info!("Done. Delivered {received} frames");
}

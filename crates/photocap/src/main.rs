//! `photocap` - CLI for the capture pipeline
//!
//! This binary drives capture sessions and inspects the local capture
//! sequence and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::time::Duration;

use clap::Parser;

use photocap::cli::{session, CaptureCommand, Cli, ClearCommand, Command, ConfigCommand};
use photocap::{init_logging, CapturePipeline, Config, LocalImageStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Capture(capture_cmd) => handle_capture(config, capture_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Clear(clear_cmd) => handle_clear(&config, &clear_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_capture(mut config: Config, cmd: CaptureCommand) -> anyhow::Result<()> {
    if let Some(device) = cmd.device {
        config.capture.device = device;
    }
    let mut pipeline = CapturePipeline::from_config(&config)?;

    match cmd.frames {
        Some(frames) => run_scripted(&mut pipeline, frames, cmd.interval_ms).await,
        None => {
            session::run(&mut pipeline).await?;
            Ok(())
        }
    }
}

async fn run_scripted(
    pipeline: &mut CapturePipeline,
    frames: u32,
    interval_ms: u64,
) -> anyhow::Result<()> {
    if let Err(err) = pipeline.start_capture() {
        if err.is_device_unavailable() {
            eprintln!("Camera access was denied or is not available.");
        }
        return Err(err.into());
    }

    for n in 0..frames {
        if let Some(count) = pipeline.capture()? {
            println!("Images captured: {count}");
        }
        if n + 1 < frames {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }

    pipeline.stop_capture();
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = LocalImageStore::open(config.slot_path())?;
    if json {
        let status = serde_json::json!({
            "slot_path": config.slot_path(),
            "images": store.count(),
            "sync_enabled": config.sync.enabled,
            "sync_endpoint": config.sync.endpoint,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("photocap status");
        println!("---------------");
        println!("Slot:          {}", config.slot_path().display());
        println!("Images:        {}", store.count());
        println!(
            "Sync:          {}",
            if config.sync.enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!("Endpoint:      {}", config.sync.endpoint);
    }
    Ok(())
}

fn handle_clear(config: &Config, cmd: &ClearCommand) -> anyhow::Result<()> {
    if !cmd.yes {
        println!("This will delete the local capture sequence.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let mut store = LocalImageStore::open(config.slot_path())?;
    let had = store.count();
    store.clear()?;
    println!("Cleared {had} image(s).");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Slot path:     {}", config.slot_path().display());
                println!("  Slot name:     {}", config.storage.slot_name);
                println!();
                println!("[Capture]");
                println!("  Device:        {}", config.capture.device);
                println!(
                    "  Raster:        {}x{}",
                    config.capture.width, config.capture.height
                );
                println!();
                println!("[Sync]");
                println!("  Enabled:       {}", config.sync.enabled);
                println!("  Endpoint:      {}", config.sync.endpoint);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

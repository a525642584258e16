//! Interactive capture session.
//!
//! A line-oriented loop on stdin driving the pipeline: capture, clear, or
//! quit. Help visibility is session state, not a global.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::Result;
use crate::pipeline::CapturePipeline;

/// Help panel visibility, owned by the session and handed to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpPanel {
    visible: bool,
}

impl HelpPanel {
    /// Flip visibility; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Check if the panel is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

const HELP_TEXT: &str = "\
  c (or Enter)  capture the current frame
  k             clear the stored sequence
  h             toggle this help
  q             stop streaming and quit";

/// Run the interactive loop until `q` or end of input.
///
/// Starts the stream, drives one pipeline cycle per `c` line, and releases
/// the device on the way out.
///
/// # Errors
///
/// Returns an error if the device cannot be acquired, a capture fails, or
/// stdin cannot be read.
pub async fn run(pipeline: &mut CapturePipeline) -> Result<()> {
    if let Err(err) = pipeline.start_capture() {
        if err.is_device_unavailable() {
            eprintln!("Camera access was denied or is not available.");
        }
        return Err(err);
    }

    println!(
        "Streaming. Images captured: {}. Press 'h' for help.",
        pipeline.count()
    );

    let mut help = HelpPanel::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "c" | "" => match pipeline.capture()? {
                Some(count) => println!("Images captured: {count}"),
                None => println!("Not streaming."),
            },
            "k" => {
                pipeline.clear()?;
                println!("Images captured: 0");
            }
            "h" => {
                if help.toggle() {
                    println!("{HELP_TEXT}");
                }
            }
            "q" => break,
            other => println!("Unknown command '{other}' (press 'h' for help)"),
        }
    }

    pipeline.stop_capture();
    Ok(())
}

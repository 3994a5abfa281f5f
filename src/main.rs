use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use attention_review_rs::selection::{select_frames, SelectionParams};
use attention_review_rs::trace::read_pose_log;

#[derive(Parser, Debug)]
#[command(name = "attention_review")]
#[command(about = "Select high-variability frames of a head-pose log for manual review", long_about = None)]
struct Args {
    /// Path to the pose log (comma-separated, 10 or 18 fields per line)
    log: PathBuf,

    /// Keep at most this many frames, ranked by score
    #[arg(long)]
    max_frames: Option<usize>,

    /// Minimum spacing between selected frames
    #[arg(long, default_value = "30")]
    spacing: usize,

    /// Half-window radius for the local statistics pass
    #[arg(long, default_value = "20")]
    window: usize,

    /// Write the selection as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("[{}] Attention review starting", ts_now());
    println!("  Log: {}", args.log.display());
    println!("  Spacing: {} frames", args.spacing);
    println!("  Window radius: {}", args.window);
    if let Some(max) = args.max_frames {
        println!("  Max frames: {}", max);
    }

    let samples = read_pose_log(&args.log)?;
    println!("[{}] Loaded {} pose samples", ts_now(), samples.len());

    let params = SelectionParams {
        window_radius: args.window,
        min_spacing: args.spacing,
        max_count: args.max_frames,
        ..SelectionParams::default()
    };
    let selected = select_frames(&samples, &params)?;

    println!("[{}] Selected {} frames for review", ts_now(), selected.len());
    for frame in &selected {
        println!("  frame {:>8}  score {:.4}", frame.frame_id, frame.score);
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&selected)?;
        std::fs::write(path, json)?;
        println!("[{}] Wrote selection to {}", ts_now(), path.display());
    }

    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

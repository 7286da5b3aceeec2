//! Gallery
//!
//! Interactive 3D photo gallery: up to seven framed images on a reflective
//! floor. Click a frame to fly to it, click it again or empty space to fly
//! back. Backspace walks back through visited frames, Shift+Backspace
//! forward, Escape quits.

mod app;

use clap::Parser;
use std::path::PathBuf;

/// 3D photo gallery viewer
#[derive(Parser, Debug)]
#[command(name = "gallery")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Images to hang, in slot order (paths or file:// urls)
    images: Vec<String>,

    /// JSON config file; command line values override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Location to open at, e.g. /item/<id>
    #[arg(short, long)]
    route: Option<String>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Default log filter when RUST_LOG is unset (e.g. debug, gallery_scene=trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Vertical field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Camera damping rate per second
    #[arg(long)]
    damping: Option<f32>,
}

fn main() {
    // Tracing is initialized in app::prepare, once the log level is known.
    let args = Args::parse();

    if let Err(e) = app::run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

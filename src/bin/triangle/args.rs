use std::path::PathBuf;

use clap::Parser;

use triangle_drag::geometry::{SURFACE_HEIGHT, SURFACE_WIDTH};

/// Red triangle with a draggable top vertex
#[derive(Debug, Parser)]
pub struct Args {
    /// Width of the drawing surface in pixels
    #[arg(long, default_value_t = SURFACE_WIDTH)]
    pub width: u32,
    /// Height of the drawing surface in pixels
    #[arg(long, default_value_t = SURFACE_HEIGHT)]
    pub height: u32,
    /// Log filter in env_logger syntax, overrides RUST_LOG
    #[arg(long)]
    pub log: Option<String>,
    /// Write the first frame to a PNG file and exit
    #[arg(long)]
    pub screenshot: Option<PathBuf>,
}

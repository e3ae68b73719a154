use std::path::PathBuf;

use clap::Parser;

/// Minimalist multi-window image viewer.
#[derive(Parser, Debug)]
#[command(name = "quickview", version, about)]
pub struct Cli {
    /// Image files to open; a file picker is shown when none are given.
    pub images: Vec<PathBuf>,
}

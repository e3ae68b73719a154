#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod cli;
mod decor;
mod dialog;
mod error;
mod geometry;
mod loader;
mod registry;
mod viewer;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();
    app::run(cli.images)
}

mod algorithm;
mod app;
mod color;
mod config;
mod grid;
mod input;
mod logging;
mod render;
mod stats;

use anyhow::Result;
use clap::Parser;
use config::{Args, Settings};

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_args(args, &algorithm::Registry::builtin())?;
    logging::init(&settings)?;
    tracing::debug!(?settings, "starting");
    app::run(settings)
}

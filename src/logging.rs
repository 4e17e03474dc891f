use crate::config::{Mode, Settings};
use anyhow::{Context, Result};
use std::fs::File;
use std::sync::Mutex;
use tracing::Level;

/// Headless runs log to stderr. The interactive UI owns the screen, so it only
/// logs when `--log-file` is given.
pub(crate) fn init(settings: &Settings) -> Result<()> {
    let level = if settings.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    if let Some(path) = &settings.log_file {
        let file = File::create(path)
            .with_context(|| format!("could not create log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else if matches!(settings.mode, Mode::Headless { .. }) {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

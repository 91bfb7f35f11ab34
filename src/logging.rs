// Copyright (c) 2026 rezky_nightky

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::EnvFilter;

pub const FILTER_ENV: &str = "SNOWDRIFT_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. The screen belongs to the animation, so
/// nothing is logged unless a file is given.
pub fn init(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_env_filter(filter())
        .init();

    Ok(())
}
